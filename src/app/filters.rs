// IMACX Logistica - app/filters.rs
//
// Filter controller for the logistics list view. Owns the filter state,
// the debounce scheduler that feeds it, the memoised engine, and the
// current sort.
//
// Debouncing is global, not per field: the scheduler has one pending slot,
// so edits to different fields inside one window coalesce into a single
// update carrying the last submitted (field, value) pair.

use crate::core::debounce::{Clock, Debouncer, SystemClock};
use crate::core::filter::{FilterEngine, FilterField, FilterState};
use crate::core::model::{ClientLookup, LogisticsRecord};
use crate::core::sort::{sort_records, SortColumn, SortState};
use std::sync::Arc;
use std::time::Duration;

/// A filter edit waiting for the debounce window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterUpdate {
    pub field: String,
    pub value: String,
}

/// Filter/sort controller for the logistics list.
#[derive(Debug)]
pub struct LogisticsFilters<C: Clock = SystemClock> {
    filters: FilterState,
    debouncer: Debouncer<FilterUpdate, C>,
    engine: FilterEngine,
    sort: Option<SortState>,
}

impl LogisticsFilters<SystemClock> {
    pub fn new(debounce: Duration) -> Self {
        Self::with_clock(debounce, SystemClock)
    }
}

impl<C: Clock> LogisticsFilters<C> {
    pub fn with_clock(debounce: Duration, clock: C) -> Self {
        Self {
            filters: FilterState::default(),
            debouncer: Debouncer::with_clock(debounce, clock),
            engine: FilterEngine::new(),
            sort: None,
        }
    }

    /// Schedule a debounced update of `field`. The field name is not
    /// validated; unknown names are stored and ignored by matching.
    pub fn set_filter_value(&mut self, field: &str, value: &str) {
        if FilterField::from_key(field).is_none() {
            tracing::debug!(field, "Filter set on unknown field; it will not match anything");
        }
        self.debouncer.schedule(FilterUpdate {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    /// Apply the pending update if its window has elapsed. Returns true if
    /// the filter state changed.
    pub fn tick(&mut self) -> bool {
        match self.debouncer.poll() {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    /// Apply the pending update now. Returns true if the filter state changed.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    fn apply(&mut self, update: FilterUpdate) -> bool {
        let changed = self.filters.set(&update.field, &update.value);
        if changed {
            tracing::debug!(field = %update.field, "Filter updated");
        }
        changed
    }

    /// Whether an update is waiting for the debounce window.
    pub fn has_pending_update(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drop any pending update and reset every filter.
    pub fn clear_filters(&mut self) {
        self.debouncer.cancel();
        self.filters.clear();
        tracing::debug!("Filters cleared");
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active().count()
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    /// Clicking a column header: same column flips the direction, a new
    /// column starts ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = Some(match self.sort {
            Some(current) if current.column == column => SortState {
                column,
                direction: current.direction.flipped(),
            },
            _ => SortState {
                column,
                direction: Default::default(),
            },
        });
    }

    /// Records matching the current filters. Same `Arc` as last time while
    /// the cache key is unchanged.
    pub fn filtered_records(
        &mut self,
        records: &Arc<[LogisticsRecord]>,
        lookup: &ClientLookup,
    ) -> Arc<[LogisticsRecord]> {
        self.engine.filtered_records(records, &self.filters, lookup)
    }

    /// Filtered records in the current sort order.
    pub fn visible_records(
        &mut self,
        records: &Arc<[LogisticsRecord]>,
        lookup: &ClientLookup,
    ) -> Vec<LogisticsRecord> {
        let filtered = self.filtered_records(records, lookup);
        match self.sort {
            Some(sort) => sort_records(&filtered, sort, lookup),
            None => filtered.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debounce::ManualClock;
    use crate::core::model::{FolhaObra, ItemBase, RefNumber};
    use crate::core::sort::SortDirection;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn controller() -> (LogisticsFilters<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (LogisticsFilters::with_clock(DEBOUNCE, clock.clone()), clock)
    }

    fn make_record(id: &str, fo: &str, cliente: &str, data: &str) -> LogisticsRecord {
        LogisticsRecord {
            id: id.to_string(),
            data: data.to_string(),
            items_base: Some(ItemBase {
                folhas_obras: Some(FolhaObra {
                    numero_fo: Some(RefNumber::from(fo)),
                    cliente: Some(cliente.to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn records() -> Arc<[LogisticsRecord]> {
        vec![
            make_record("1", "100", "Acme", "2024-02-01"),
            make_record("2", "200", "Beta", "2024-01-01"),
        ]
        .into()
    }

    #[test]
    fn test_update_applies_after_window() {
        let (mut c, clock) = controller();
        c.set_filter_value("fo", "1");
        assert!(!c.tick());
        assert!(c.has_pending_update());
        clock.advance(DEBOUNCE);
        assert!(c.tick());
        assert_eq!(c.filters().get("fo"), Some("1"));
        assert!(!c.has_pending_update());
    }

    #[test]
    fn test_rapid_edits_across_fields_coalesce() {
        let (mut c, clock) = controller();
        c.set_filter_value("fo", "1");
        clock.advance(Duration::from_millis(100));
        c.set_filter_value("cliente", "acme");
        clock.advance(DEBOUNCE);
        assert!(c.tick());
        assert_eq!(c.filters().get("fo"), None);
        assert_eq!(c.filters().get("cliente"), Some("acme"));
    }

    #[test]
    fn test_identical_value_is_noop() {
        let (mut c, _clock) = controller();
        c.set_filter_value("fo", "1");
        assert!(c.flush());
        c.set_filter_value("fo", "1");
        assert!(!c.flush());
    }

    /// An effectively infinite window never fires on tick but still flushes.
    #[test]
    fn test_unbounded_debounce_does_not_panic() {
        let clock = ManualClock::new();
        let mut c = LogisticsFilters::with_clock(Duration::MAX, clock.clone());
        c.set_filter_value("fo", "1");
        clock.advance(Duration::from_secs(86_400));
        assert!(!c.tick());
        assert!(c.flush());
        assert_eq!(c.filters().get("fo"), Some("1"));
    }

    /// Wall-clock controller, as the CLI builds it.
    #[test]
    fn test_system_clock_controller_accepts_max_delay() {
        let mut c = LogisticsFilters::new(Duration::MAX);
        c.set_filter_value("fo", "1");
        assert!(c.has_pending_update());
        assert!(c.flush());
    }

    #[test]
    fn test_clear_cancels_pending_update() {
        let (mut c, clock) = controller();
        c.set_filter_value("fo", "1");
        c.flush();
        c.set_filter_value("cliente", "beta");
        c.clear_filters();
        clock.advance(DEBOUNCE);
        assert!(!c.tick());
        assert!(!c.has_active_filters());
    }

    #[test]
    fn test_filtered_records_reference_stable() {
        let (mut c, _clock) = controller();
        let records = records();
        let lookup = ClientLookup::new();
        c.set_filter_value("cliente", "beta");
        c.flush();
        let first = c.filtered_records(&records, &lookup);
        let second = c.filtered_records(&records, &lookup);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(c.active_filter_count(), 1);
    }

    #[test]
    fn test_unknown_field_is_stored_but_inert() {
        let (mut c, _clock) = controller();
        c.set_filter_value("typo_field", "zzz");
        assert!(c.flush());
        assert_eq!(c.filters().get("typo_field"), Some("zzz"));
        let records = records();
        assert_eq!(c.filtered_records(&records, &ClientLookup::new()).len(), 2);
    }

    #[test]
    fn test_toggle_sort_and_visible_order() {
        let (mut c, _clock) = controller();
        let records = records();
        let lookup = ClientLookup::new();

        c.toggle_sort(SortColumn::Data);
        assert_eq!(c.sort().map(|s| s.direction), Some(SortDirection::Asc));
        let visible = c.visible_records(&records, &lookup);
        assert_eq!(visible[0].id, "2");

        c.toggle_sort(SortColumn::Data);
        assert_eq!(c.sort().map(|s| s.direction), Some(SortDirection::Desc));
        let visible = c.visible_records(&records, &lookup);
        assert_eq!(visible[0].id, "1");

        c.toggle_sort(SortColumn::Fo);
        assert_eq!(
            c.sort(),
            Some(SortState {
                column: SortColumn::Fo,
                direction: SortDirection::Asc
            })
        );
    }
}
