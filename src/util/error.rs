// IMACX Logistica - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// The filter engine is total and has no error type; errors only arise at
// the I/O edges. Config problems never abort a run: `ConfigError` values
// are rendered into startup warnings by `platform::config`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all IMACX Logistica operations.
#[derive(Debug)]
pub enum ImacxError {
    /// Dataset loading failed.
    Load(LoadError),

    /// Writing results to the output stream failed.
    Output { format: &'static str, source: io::Error },
}

impl fmt::Display for ImacxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "Dataset error: {e}"),
            Self::Output { format, source } => {
                write!(f, "Failed to write {format} output: {source}")
            }
        }
    }
}

impl std::error::Error for ImacxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Output { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset load errors
// ---------------------------------------------------------------------------

/// Errors related to reading a logistics dataset from disk.
#[derive(Debug)]
pub enum LoadError {
    /// I/O error reading the dataset file.
    Io { path: PathBuf, source: io::Error },

    /// The file is not a valid dataset document.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Dataset file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "'{}' is not a valid dataset: {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Dataset '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::FileTooLarge { .. } => None,
        }
    }
}

impl From<LoadError> for ImacxError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ValueOutOfRange { .. } => None,
        }
    }
}

/// Convenience type alias for IMACX Logistica results.
pub type Result<T> = std::result::Result<T, ImacxError>;
