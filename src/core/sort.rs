// IMACX Logistica - core/sort.rs
//
// Column sorting for the logistics list. Always produces a new vector;
// ties keep their input order.

use crate::core::model::{ClientLookup, LogisticsRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Data,
    Fo,
    Orc,
    Cliente,
    Guia,
    Transportadora,
    LocalRecolha,
    LocalEntrega,
    Saiu,
    Concluido,
}

impl SortColumn {
    pub fn all() -> &'static [SortColumn] {
        &[
            SortColumn::Data,
            SortColumn::Fo,
            SortColumn::Orc,
            SortColumn::Cliente,
            SortColumn::Guia,
            SortColumn::Transportadora,
            SortColumn::LocalRecolha,
            SortColumn::LocalEntrega,
            SortColumn::Saiu,
            SortColumn::Concluido,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortColumn::Data => "data",
            SortColumn::Fo => "fo",
            SortColumn::Orc => "orc",
            SortColumn::Cliente => "cliente",
            SortColumn::Guia => "guia",
            SortColumn::Transportadora => "transportadora",
            SortColumn::LocalRecolha => "local_recolha",
            SortColumn::LocalEntrega => "local_entrega",
            SortColumn::Saiu => "saiu",
            SortColumn::Concluido => "concluido",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| format!("unknown sort column '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
        }
    }
}

/// Active sort: a column and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl FromStr for SortState {
    type Err = String;

    /// Parses `column` or `column:asc|desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column.parse()?, direction.parse()?),
            None => (s.parse()?, SortDirection::Asc),
        };
        Ok(SortState { column, direction })
    }
}

/// Sort key extracted once per record.
#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey {
    /// Parsed dates first, then unparseable ones (None sorts last via the
    /// bool flag).
    Date(bool, Option<NaiveDate>),
    Text(String),
    Flag(bool),
}

fn sort_key(record: &LogisticsRecord, column: SortColumn, lookup: &ClientLookup) -> SortKey {
    match column {
        SortColumn::Data => {
            let date = NaiveDate::parse_from_str(record.data.trim(), "%Y-%m-%d").ok();
            SortKey::Date(date.is_none(), date)
        }
        SortColumn::Fo => SortKey::Text(record.numero_fo().to_lowercase()),
        SortColumn::Orc => SortKey::Text(record.numero_orc().to_lowercase()),
        SortColumn::Cliente => SortKey::Text(record.cliente_name(lookup).to_lowercase()),
        SortColumn::Guia => SortKey::Text(record.guia.as_deref().unwrap_or("").to_lowercase()),
        SortColumn::Transportadora => {
            SortKey::Text(record.transportadora.as_deref().unwrap_or("").to_lowercase())
        }
        SortColumn::LocalRecolha => SortKey::Text(record.recolha_name(lookup).to_lowercase()),
        SortColumn::LocalEntrega => SortKey::Text(record.entrega_name(lookup).to_lowercase()),
        SortColumn::Saiu => SortKey::Flag(record.effective_saiu()),
        SortColumn::Concluido => SortKey::Flag(record.concluido.unwrap_or(false)),
    }
}

/// Return a sorted copy of `records`.
///
/// Records with unparseable dates stay at the end in both directions.
pub fn sort_records(
    records: &[LogisticsRecord],
    sort: SortState,
    lookup: &ClientLookup,
) -> Vec<LogisticsRecord> {
    let mut keyed: Vec<(SortKey, &LogisticsRecord)> = records
        .iter()
        .map(|r| (sort_key(r, sort.column, lookup), r))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a, b, sort.direction));
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

fn compare(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    if let (SortKey::Date(a_missing, a_date), SortKey::Date(b_missing, b_date)) = (a, b) {
        // Missing dates go last regardless of direction.
        return a_missing.cmp(b_missing).then_with(|| {
            let ord = a_date.cmp(b_date);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
    let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}
