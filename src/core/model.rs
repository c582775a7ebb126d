// IMACX Logistica - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// The shapes mirror the rows returned by the dashboard backend for the
// logistics list: a delivery/collection line with the base item and its
// job sheet embedded.

use crate::util::constants;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Mapping from entity id (client, warehouse, ...) to display name.
///
/// Owned by the caller; the filter engine only reads it.
pub type ClientLookup = HashMap<String, String>;

// =============================================================================
// Logistics record
// =============================================================================

/// A single delivery/collection line item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogisticsRecord {
    /// Opaque record identifier.
    pub id: String,

    /// Reference to the base item this line ships.
    #[serde(default)]
    pub item_id: String,

    /// ISO calendar date (YYYY-MM-DD).
    #[serde(default)]
    pub data: String,

    /// Shipping-note reference.
    #[serde(default)]
    pub guia: Option<String>,

    /// Pickup location id, resolved through the lookup table.
    #[serde(default)]
    pub id_local_recolha: Option<String>,

    /// Delivery location id, resolved through the lookup table.
    #[serde(default)]
    pub id_local_entrega: Option<String>,

    /// Free-text pickup location, used when no id is set.
    #[serde(default)]
    pub local_recolha: Option<String>,

    /// Free-text delivery location, used when no id is set.
    #[serde(default)]
    pub local_entrega: Option<String>,

    /// Carrier name (free text).
    #[serde(default)]
    pub transportadora: Option<String>,

    #[serde(default)]
    pub notas: Option<String>,

    /// Shipped flag on the line itself.
    #[serde(default)]
    pub saiu: Option<bool>,

    /// Completed flag.
    #[serde(default)]
    pub concluido: Option<bool>,

    #[serde(default)]
    pub items_base: Option<ItemBase>,
}

impl LogisticsRecord {
    /// The embedded job sheet, if both nesting levels are present.
    pub fn folha_obra(&self) -> Option<&FolhaObra> {
        self.items_base.as_ref()?.folhas_obras.as_ref()
    }

    /// Effective shipped flag: job sheet flag, then line flag, then false.
    pub fn effective_saiu(&self) -> bool {
        self.folha_obra()
            .and_then(|fo| fo.saiu)
            .or(self.saiu)
            .unwrap_or(false)
    }

    /// Whether the base item is flagged as a gift/promotional item.
    pub fn is_brindes(&self) -> bool {
        self.items_base
            .as_ref()
            .and_then(|item| item.brindes)
            .unwrap_or(false)
    }

    /// Item type label shown in the list ("Brindes" or "Print").
    pub fn tipo(&self) -> &'static str {
        if self.is_brindes() {
            constants::TIPO_BRINDES
        } else {
            constants::TIPO_PRINT
        }
    }

    /// Base item description, or empty.
    pub fn descricao(&self) -> &str {
        self.items_base
            .as_ref()
            .and_then(|item| item.descricao.as_deref())
            .unwrap_or("")
    }

    /// Job sheet number as text, or empty.
    pub fn numero_fo(&self) -> String {
        self.folha_obra()
            .and_then(|fo| fo.numero_fo.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Budget/quote number as text, or empty.
    pub fn numero_orc(&self) -> String {
        self.folha_obra()
            .and_then(|fo| fo.numero_orc.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Client display name: lookup by `id_cliente`, then the embedded
    /// `cliente` string, then empty.
    pub fn cliente_name<'a>(&'a self, lookup: &'a ClientLookup) -> &'a str {
        let Some(fo) = self.folha_obra() else {
            return "";
        };
        resolve(lookup, fo.id_cliente.as_deref(), fo.cliente.as_deref())
    }

    /// Pickup location display name.
    pub fn recolha_name<'a>(&'a self, lookup: &'a ClientLookup) -> &'a str {
        resolve(
            lookup,
            self.id_local_recolha.as_deref(),
            self.local_recolha.as_deref(),
        )
    }

    /// Delivery location display name.
    pub fn entrega_name<'a>(&'a self, lookup: &'a ClientLookup) -> &'a str {
        resolve(
            lookup,
            self.id_local_entrega.as_deref(),
            self.local_entrega.as_deref(),
        )
    }
}

/// Resolve an id through the lookup table, falling back to a free-text
/// value. Empty names count as missing at each step.
fn resolve<'a>(lookup: &'a ClientLookup, id: Option<&str>, fallback: Option<&'a str>) -> &'a str {
    id.and_then(|id| lookup.get(id))
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .or(fallback.filter(|text| !text.is_empty()))
        .unwrap_or("")
}

// =============================================================================
// Base item and job sheet
// =============================================================================

/// Base item embedded in a logistics record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemBase {
    #[serde(default)]
    pub descricao: Option<String>,

    /// Gift/promotional item flag.
    #[serde(default)]
    pub brindes: Option<bool>,

    #[serde(default)]
    pub folhas_obras: Option<FolhaObra>,
}

/// Job sheet embedded in a base item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FolhaObra {
    #[serde(default)]
    pub numero_orc: Option<RefNumber>,

    #[serde(default)]
    pub numero_fo: Option<RefNumber>,

    /// Client name as typed on the job sheet.
    #[serde(default)]
    pub cliente: Option<String>,

    /// Client id, resolved through the lookup table.
    #[serde(default)]
    pub id_cliente: Option<String>,

    /// Shipped flag on the job sheet. Takes precedence over the line flag.
    #[serde(default)]
    pub saiu: Option<bool>,
}

// =============================================================================
// Reference numbers
// =============================================================================

/// A job-sheet or quote reference. The backend stores some of these as
/// integers and some as text; both are matched as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RefNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RefNumber {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for RefNumber {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}
