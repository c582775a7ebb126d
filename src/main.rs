// IMACX Logistica - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Dataset loading
// 4. Filtering/sorting through the list controller and printing the result

use clap::{Parser, ValueEnum};
use imacx_logistica::app::{dataset, filters::LogisticsFilters, render};
use imacx_logistica::core::sort::SortState;
use imacx_logistica::platform::config::{load_config, AppConfig, PlatformPaths};
use imacx_logistica::util::error::{ImacxError, Result};
use imacx_logistica::util::{constants, logging};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// IMACX Logistica - filter and list logistics delivery/collection lines.
///
/// Filters are column=query pairs, AND-combined, matched case-insensitively.
/// Columns: orc, fo, guia, tipo, cliente, item, local_recolha, local_entrega,
/// transportadora, notas, saiu (sim/não).
#[derive(Parser, Debug)]
#[command(name = "imacx-logistica", version, about)]
struct Cli {
    /// Dataset JSON file ({"records": [...], "lookup": {...}} or a bare array).
    dataset: PathBuf,

    /// Column filter as field=query. Repeatable.
    #[arg(short = 'f', long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Sort as column[:asc|desc], e.g. data:desc.
    #[arg(short = 's', long = "sort")]
    sort: Option<SortState>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Config file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=query, got '{s}'"))?;
    Ok((field.trim().to_string(), value.to_string()))
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (config, config_warnings) = load_config(&config_path);

    logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "IMACX Logistica starting"
    );

    if let Err(e) = run(&cli, &config) {
        tracing::error!(error = %e, "IMACX Logistica failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load, filter, sort, and print. Filters go through the list controller so
/// the CLI exercises the same path as an interactive front end.
fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    let dataset = dataset::load_dataset(&cli.dataset)?;

    let mut controller = LogisticsFilters::new(config.filter_debounce);
    for (field, value) in &cli.filters {
        controller.set_filter_value(field, value);
        // Each CLI filter is a complete edit; don't let the debouncer
        // coalesce them.
        controller.flush();
    }
    controller.set_sort(cli.sort);

    let visible = controller.visible_records(&dataset.records, &dataset.lookup);
    tracing::info!(
        total = dataset.records.len(),
        visible = visible.len(),
        active_filters = controller.active_filter_count(),
        "Filtering complete"
    );

    let stdout = std::io::stdout();
    match cli.format {
        OutputFormat::Table => {
            render::write_table(stdout.lock(), &visible, &dataset.lookup, config.max_rows)
                .map_err(|source| ImacxError::Output {
                    format: "table",
                    source,
                })?;
        }
        OutputFormat::Json => {
            render::write_json(stdout.lock(), &visible).map_err(|source| ImacxError::Output {
                format: "JSON",
                source,
            })?;
        }
    }
    Ok(())
}
