// IMACX Logistica - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "IMACX Logistica";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "imacx-logistica";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Filter debounce
// =============================================================================

/// Debounce delay in milliseconds for text filter input.
pub const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 300;

/// Minimum configurable debounce delay. Zero means updates apply on the
/// next poll.
pub const MIN_FILTER_DEBOUNCE_MS: u64 = 0;

/// Maximum configurable debounce delay (ms).
pub const MAX_FILTER_DEBOUNCE_MS: u64 = 5_000;

// =============================================================================
// Filter vocabulary
// =============================================================================

/// Queries on the `saiu` column that require a shipped record.
pub const SHIPPED_YES_QUERIES: &[&str] = &["sim", "s"];

/// Queries on the `saiu` column that require a not-yet-shipped record.
pub const SHIPPED_NO_QUERIES: &[&str] = &["não", "nao", "n"];

/// Item type label for gift/promotional items.
pub const TIPO_BRINDES: &str = "Brindes";

/// Item type label for standard print jobs.
pub const TIPO_PRINT: &str = "Print";

// =============================================================================
// Dataset limits
// =============================================================================

/// Maximum size of a dataset JSON file in bytes.
pub const MAX_DATASET_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

// =============================================================================
// Display
// =============================================================================

/// Default number of rows printed by the table renderer (0 = unlimited).
pub const DEFAULT_MAX_ROWS: usize = 0;

/// Hard upper bound on the configurable row limit.
pub const ABSOLUTE_MAX_ROWS: usize = 100_000;

/// Widest a single text column may render before truncation.
pub const MAX_COLUMN_WIDTH: usize = 32;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Valid values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
