// IMACX Logistica - app/dataset.rs
//
// Loads a logistics dataset (records + id->name lookup) from a JSON file.
//
// Accepted shapes:
//   { "records": [ ... ], "lookup": { "id": "name", ... } }
//   [ ... ]                       (records only, empty lookup)

use crate::core::model::{ClientLookup, LogisticsRecord};
use crate::util::constants;
use crate::util::error::LoadError;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Records and the lookup table used to resolve their foreign keys.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Arc<[LogisticsRecord]>,
    pub lookup: ClientLookup,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDataset {
    Full {
        records: Vec<LogisticsRecord>,
        #[serde(default)]
        lookup: ClientLookup,
    },
    RecordsOnly(Vec<LogisticsRecord>),
}

impl From<RawDataset> for Dataset {
    fn from(raw: RawDataset) -> Self {
        let (records, lookup) = match raw {
            RawDataset::Full { records, lookup } => (records, lookup),
            RawDataset::RecordsOnly(records) => (records, ClientLookup::new()),
        };
        Dataset {
            records: records.into(),
            lookup,
        }
    }
}

/// Parse a dataset from JSON text. `path` is used for error context only.
pub fn parse_dataset(content: &str, path: &Path) -> Result<Dataset, LoadError> {
    let raw: RawDataset = serde_json::from_str(content).map_err(|e| LoadError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(raw.into())
}

/// Read and parse a dataset file.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() > constants::MAX_DATASET_FILE_SIZE {
        return Err(LoadError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_DATASET_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dataset = parse_dataset(&content, path)?;

    tracing::info!(
        path = %path.display(),
        records = dataset.records.len(),
        lookup_entries = dataset.lookup.len(),
        "Dataset loaded"
    );
    Ok(dataset)
}
