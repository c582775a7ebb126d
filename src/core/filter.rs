// IMACX Logistica - core/filter.rs
//
// Per-column filter engine for logistics records.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::memo::Memo;
use crate::core::model::{ClientLookup, LogisticsRecord};
use crate::util::constants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Filter fields
// =============================================================================

/// The columns the logistics list can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Orc,
    Fo,
    Guia,
    Tipo,
    Cliente,
    Item,
    LocalRecolha,
    LocalEntrega,
    Transportadora,
    Notas,
    Saiu,
}

impl FilterField {
    /// Returns all variants in column order.
    pub fn all() -> &'static [FilterField] {
        &[
            FilterField::Orc,
            FilterField::Fo,
            FilterField::Guia,
            FilterField::Tipo,
            FilterField::Cliente,
            FilterField::Item,
            FilterField::LocalRecolha,
            FilterField::LocalEntrega,
            FilterField::Transportadora,
            FilterField::Notas,
            FilterField::Saiu,
        ]
    }

    /// Key used in the filter state map.
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::Orc => "orc",
            FilterField::Fo => "fo",
            FilterField::Guia => "guia",
            FilterField::Tipo => "tipo",
            FilterField::Cliente => "cliente",
            FilterField::Item => "item",
            FilterField::LocalRecolha => "local_recolha",
            FilterField::LocalEntrega => "local_entrega",
            FilterField::Transportadora => "transportadora",
            FilterField::Notas => "notas",
            FilterField::Saiu => "saiu",
        }
    }

    /// Parse a filter key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<FilterField> {
        Self::all().iter().copied().find(|field| field.key() == key)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Filter state
// =============================================================================

/// Field name -> free-text query. Blank values are inert.
///
/// Keys are not validated: unknown keys are stored but never match against
/// anything, so they never exclude a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    values: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query for `field`, if one was ever set.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Store `value` for `field`. Returns false if it was already the
    /// stored value.
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        if self.get(field) == Some(value) {
            return false;
        }
        self.values.insert(field.to_string(), value.to_string());
        true
    }

    /// Set a known field.
    pub fn with(mut self, field: FilterField, value: &str) -> Self {
        self.set(field.key(), value);
        self
    }

    /// Reset all fields.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Entries whose value is not blank, with the value trimmed.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (field.as_str(), value.trim()))
            .filter(|(_, value)| !value.is_empty())
    }

    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Stable textual form of the whole map, blank entries included.
    pub fn serialized(&self) -> String {
        // Serialising a map of strings cannot fail.
        serde_json::to_string(&self.values).unwrap_or_default()
    }
}

// =============================================================================
// Compiled predicates
// =============================================================================

/// Required state of the effective shipped flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shipped {
    Yes,
    No,
    Any,
}

impl Shipped {
    fn from_query(query: &str) -> Self {
        if constants::SHIPPED_YES_QUERIES.contains(&query) {
            Shipped::Yes
        } else if constants::SHIPPED_NO_QUERIES.contains(&query) {
            Shipped::No
        } else {
            Shipped::Any
        }
    }
}

/// One active filter with its query already lower-cased.
#[derive(Debug)]
struct Predicate {
    field: FilterField,
    query: String,
}

impl Predicate {
    fn matches(&self, record: &LogisticsRecord, lookup: &ClientLookup) -> bool {
        match self.field {
            FilterField::Orc => contains(&record.numero_orc(), &self.query),
            FilterField::Fo => contains(&record.numero_fo(), &self.query),
            FilterField::Guia => contains_opt(record.guia.as_deref(), &self.query),
            FilterField::Tipo => contains(record.tipo(), &self.query),
            FilterField::Cliente => contains(record.cliente_name(lookup), &self.query),
            FilterField::Item => contains(record.descricao(), &self.query),
            FilterField::LocalRecolha => contains(record.recolha_name(lookup), &self.query),
            FilterField::LocalEntrega => contains(record.entrega_name(lookup), &self.query),
            FilterField::Transportadora => {
                contains_opt(record.transportadora.as_deref(), &self.query)
            }
            FilterField::Notas => contains_opt(record.notas.as_deref(), &self.query),
            FilterField::Saiu => match Shipped::from_query(&self.query) {
                Shipped::Yes => record.effective_saiu(),
                Shipped::No => !record.effective_saiu(),
                Shipped::Any => true,
            },
        }
    }
}

/// Case-insensitive substring test. `query` must already be lower-case.
fn contains(value: &str, query: &str) -> bool {
    value.to_lowercase().contains(query)
}

fn contains_opt(value: Option<&str>, query: &str) -> bool {
    contains(value.unwrap_or(""), query)
}

/// Turn the active entries of `filters` into predicates. Unknown keys are
/// dropped here, which is what makes them match everything.
fn compile(filters: &FilterState) -> Vec<Predicate> {
    filters
        .active()
        .filter_map(|(key, value)| {
            let Some(field) = FilterField::from_key(key) else {
                tracing::trace!(field = key, "Ignoring unknown filter field");
                return None;
            };
            Some(Predicate {
                field,
                query: value.to_lowercase(),
            })
        })
        .collect()
}

fn matches_all(record: &LogisticsRecord, predicates: &[Predicate], lookup: &ClientLookup) -> bool {
    predicates.iter().all(|p| p.matches(record, lookup))
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Indices are into the original slice and preserve its order.
pub fn apply_filters(
    records: &[LogisticsRecord],
    filters: &FilterState,
    lookup: &ClientLookup,
) -> Vec<usize> {
    let predicates = compile(filters);
    if predicates.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, &predicates, lookup))
        .map(|(idx, _)| idx)
        .collect()
}

// =============================================================================
// Memoised engine
// =============================================================================

/// Inputs the cached result depends on.
///
/// Only lengths are compared for the record set and the lookup table, so a
/// same-length replacement with different content reuses the stale result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCacheKey {
    pub record_count: usize,
    pub filters: String,
    pub lookup_len: usize,
}

impl FilterCacheKey {
    pub fn new(records: &[LogisticsRecord], filters: &FilterState, lookup: &ClientLookup) -> Self {
        Self {
            record_count: records.len(),
            filters: filters.serialized(),
            lookup_len: lookup.len(),
        }
    }
}

/// Filters records and returns the previous result by reference while the
/// cache key is unchanged.
#[derive(Debug, Default)]
pub struct FilterEngine {
    cache: Memo<FilterCacheKey, Arc<[LogisticsRecord]>>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records matching every active filter, in input order.
    ///
    /// With no active filter the input `Arc` itself is returned. Callers can
    /// compare results with `Arc::ptr_eq` to skip redundant work.
    pub fn filtered_records(
        &mut self,
        records: &Arc<[LogisticsRecord]>,
        filters: &FilterState,
        lookup: &ClientLookup,
    ) -> Arc<[LogisticsRecord]> {
        let key = FilterCacheKey::new(records, filters, lookup);
        self.cache.get_or_compute(key, || {
            let predicates = compile(filters);
            if predicates.is_empty() {
                return Arc::clone(records);
            }
            let result: Arc<[LogisticsRecord]> = records
                .iter()
                .filter(|record| matches_all(record, &predicates, lookup))
                .cloned()
                .collect();
            tracing::debug!(
                total = records.len(),
                matched = result.len(),
                active_filters = predicates.len(),
                "Filtered logistics records"
            );
            result
        })
    }

    /// Forget the cached result so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{FolhaObra, ItemBase, RefNumber};

    fn matches_one(record: &LogisticsRecord, filters: &FilterState, lookup: &ClientLookup) -> bool {
        apply_filters(std::slice::from_ref(record), filters, lookup) == vec![0]
    }

    fn make_record(id: &str, numero_fo: &str, cliente: &str) -> LogisticsRecord {
        LogisticsRecord {
            id: id.to_string(),
            data: "2024-03-01".to_string(),
            items_base: Some(ItemBase {
                descricao: Some(format!("Item {id}")),
                brindes: Some(false),
                folhas_obras: Some(FolhaObra {
                    numero_fo: Some(RefNumber::from(numero_fo)),
                    cliente: Some(cliente.to_string()),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        }
    }

    fn with_saiu(mut record: LogisticsRecord, saiu: bool) -> LogisticsRecord {
        record.saiu = Some(saiu);
        record
    }

    fn ids(records: &[LogisticsRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let records = vec![make_record("1", "100", "Acme"), make_record("2", "200", "Beta")];
        let result = apply_filters(&records, &FilterState::default(), &ClientLookup::new());
        assert_eq!(result, vec![0, 1]);
    }

    #[test]
    fn test_whitespace_only_values_are_inert() {
        let records = vec![make_record("1", "100", "Acme")];
        let filters = FilterState::new()
            .with(FilterField::Fo, "   ")
            .with(FilterField::Cliente, "");
        assert!(filters.is_empty());
        assert_eq!(apply_filters(&records, &filters, &ClientLookup::new()), vec![0]);
    }

    #[test]
    fn test_fo_case_insensitive() {
        let records = vec![
            make_record("1", "ABC123", "Acme"),
            make_record("2", "abc123", "Acme"),
            make_record("3", "XYZ999", "Acme"),
        ];
        let filters = FilterState::new().with(FilterField::Fo, "123");
        assert_eq!(apply_filters(&records, &filters, &ClientLookup::new()), vec![0, 1]);
        let filters = FilterState::new().with(FilterField::Fo, "  AbC ");
        assert_eq!(apply_filters(&records, &filters, &ClientLookup::new()), vec![0, 1]);
    }

    #[test]
    fn test_saiu_queries() {
        let records = vec![
            with_saiu(make_record("1", "1", "A"), true),
            with_saiu(make_record("2", "2", "B"), false),
            make_record("3", "3", "C"),
        ];
        let lookup = ClientLookup::new();
        let run = |q: &str| apply_filters(&records, &FilterState::new().with(FilterField::Saiu, q), &lookup);
        assert_eq!(run("sim"), vec![0]);
        assert_eq!(run("S"), vec![0]);
        assert_eq!(run("não"), vec![1, 2]);
        assert_eq!(run("NAO"), vec![1, 2]);
        assert_eq!(run("n"), vec![1, 2]);
        assert_eq!(run("xyz"), vec![0, 1, 2]);
    }

    /// The job sheet's shipped flag wins over the record's own flag.
    #[test]
    fn test_saiu_uses_job_sheet_flag_first() {
        let mut record = with_saiu(make_record("1", "1", "A"), false);
        if let Some(fo) = record.items_base.as_mut().and_then(|i| i.folhas_obras.as_mut()) {
            fo.saiu = Some(true);
        }
        let filters = FilterState::new().with(FilterField::Saiu, "sim");
        assert!(matches_one(&record, &filters, &ClientLookup::new()));
    }

    #[test]
    fn test_local_recolha_lookup_and_fallback() {
        let mut by_id = make_record("1", "1", "A");
        by_id.id_local_recolha = Some("w1".to_string());
        let mut manual = make_record("2", "2", "B");
        manual.local_recolha = Some("Manual Entry".to_string());
        let records = vec![by_id, manual];

        let mut lookup = ClientLookup::new();
        lookup.insert("w1".to_string(), "Warehouse A".to_string());

        let filters = FilterState::new().with(FilterField::LocalRecolha, "warehouse");
        assert_eq!(apply_filters(&records, &filters, &lookup), vec![0]);
        let filters = FilterState::new().with(FilterField::LocalRecolha, "manual");
        assert_eq!(apply_filters(&records, &filters, &lookup), vec![1]);
    }

    #[test]
    fn test_cliente_resolved_through_lookup() {
        let mut record = make_record("1", "1", "typed name");
        if let Some(fo) = record.items_base.as_mut().and_then(|i| i.folhas_obras.as_mut()) {
            fo.id_cliente = Some("c9".to_string());
        }
        let mut lookup = ClientLookup::new();
        lookup.insert("c9".to_string(), "Gráfica Central".to_string());
        let filters = FilterState::new().with(FilterField::Cliente, "GRÁFICA");
        assert!(matches_one(&record, &filters, &lookup));
        let filters = FilterState::new().with(FilterField::Cliente, "typed");
        assert!(!matches_one(&record, &filters, &lookup));
    }

    #[test]
    fn test_tipo_labels() {
        let print = make_record("1", "1", "A");
        let mut gift = make_record("2", "2", "B");
        if let Some(item) = gift.items_base.as_mut() {
            item.brindes = Some(true);
        }
        let records = vec![print, gift];
        let lookup = ClientLookup::new();
        let filters = FilterState::new().with(FilterField::Tipo, "brin");
        assert_eq!(apply_filters(&records, &filters, &lookup), vec![1]);
        let filters = FilterState::new().with(FilterField::Tipo, "print");
        assert_eq!(apply_filters(&records, &filters, &lookup), vec![0]);
    }

    /// A record with no item/job sheet still has a tipo ("Print").
    #[test]
    fn test_missing_nested_fields_match_as_empty() {
        let bare = LogisticsRecord {
            id: "bare".to_string(),
            ..Default::default()
        };
        let lookup = ClientLookup::new();
        let filters = FilterState::new().with(FilterField::Fo, "1");
        assert!(!matches_one(&bare, &filters, &lookup));
        let filters = FilterState::new().with(FilterField::Tipo, "print");
        assert!(matches_one(&bare, &filters, &lookup));
    }

    #[test]
    fn test_unknown_field_matches_everything() {
        let records = vec![make_record("1", "100", "Acme")];
        let mut filters = FilterState::new();
        filters.set("numero_fo", "does-not-exist");
        assert!(!filters.is_empty());
        assert_eq!(apply_filters(&records, &filters, &ClientLookup::new()), vec![0]);
    }

    #[test]
    fn test_combined_filters_are_anded() {
        let records = vec![make_record("1", "100", "Acme"), make_record("2", "200", "Beta")];
        let lookup = ClientLookup::new();

        let filters = FilterState::new()
            .with(FilterField::Fo, "1")
            .with(FilterField::Cliente, "acme");
        assert_eq!(apply_filters(&records, &filters, &lookup), vec![0]);

        let filters = FilterState::new()
            .with(FilterField::Fo, "1")
            .with(FilterField::Cliente, "beta");
        assert!(apply_filters(&records, &filters, &lookup).is_empty());

        let filters = FilterState::new().with(FilterField::Fo, "2");
        assert_eq!(apply_filters(&records, &filters, &lookup), vec![1]);
    }

    #[test]
    fn test_set_reports_unchanged_value() {
        let mut filters = FilterState::new();
        assert!(filters.set("fo", "12"));
        assert!(!filters.set("fo", "12"));
        assert!(filters.set("fo", "123"));
        assert_eq!(filters.get("fo"), Some("123"));
    }

    #[test]
    fn test_engine_no_filter_returns_input_arc() {
        let records: Arc<[LogisticsRecord]> =
            vec![make_record("1", "100", "Acme"), make_record("2", "200", "Beta")].into();
        let mut engine = FilterEngine::new();
        let result = engine.filtered_records(&records, &FilterState::new(), &ClientLookup::new());
        assert!(Arc::ptr_eq(&result, &records));
    }

    #[test]
    fn test_engine_returns_cached_arc_for_same_key() {
        let records: Arc<[LogisticsRecord]> =
            vec![make_record("1", "100", "Acme"), make_record("2", "200", "Beta")].into();
        let lookup = ClientLookup::new();
        let filters = FilterState::new().with(FilterField::Cliente, "beta");
        let mut engine = FilterEngine::new();

        let first = engine.filtered_records(&records, &filters, &lookup);
        let second = engine.filtered_records(&records, &filters.clone(), &lookup);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(ids(&first), vec!["2"]);

        let changed = FilterState::new().with(FilterField::Cliente, "acme");
        let third = engine.filtered_records(&records, &changed, &lookup);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(ids(&third), vec!["1"]);
    }

    #[test]
    fn test_engine_recomputes_when_lookup_grows() {
        let mut record = make_record("1", "100", "");
        if let Some(fo) = record.items_base.as_mut().and_then(|i| i.folhas_obras.as_mut()) {
            fo.id_cliente = Some("c1".to_string());
        }
        let records: Arc<[LogisticsRecord]> = vec![record].into();
        let filters = FilterState::new().with(FilterField::Cliente, "acme");
        let mut engine = FilterEngine::new();

        let mut lookup = ClientLookup::new();
        assert!(engine.filtered_records(&records, &filters, &lookup).is_empty());
        lookup.insert("c1".to_string(), "Acme".to_string());
        assert_eq!(engine.filtered_records(&records, &filters, &lookup).len(), 1);
    }

    /// The cache key only sees lengths; callers must `invalidate` after in-place swaps.
    #[test]
    fn test_engine_reuses_stale_result_for_same_length_records() {
        let filters = FilterState::new().with(FilterField::Cliente, "acme");
        let lookup = ClientLookup::new();
        let mut engine = FilterEngine::new();

        let before: Arc<[LogisticsRecord]> = vec![make_record("1", "1", "Acme")].into();
        let after: Arc<[LogisticsRecord]> = vec![make_record("2", "2", "Beta")].into();
        let first = engine.filtered_records(&before, &filters, &lookup);
        let second = engine.filtered_records(&after, &filters, &lookup);
        assert!(Arc::ptr_eq(&first, &second));

        engine.invalidate();
        assert!(engine.filtered_records(&after, &filters, &lookup).is_empty());
    }
}
