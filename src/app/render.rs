// IMACX Logistica - app/render.rs
//
// Text table and JSON output of the visible logistics rows.
// Writes to any Write trait object.

use crate::core::model::{ClientLookup, LogisticsRecord};
use crate::util::constants;
use std::io::{self, Write};

const HEADERS: [&str; 11] = [
    "Data",
    "FO",
    "ORC",
    "Cliente",
    "Item",
    "Tipo",
    "Recolha",
    "Entrega",
    "Transportadora",
    "Guia",
    "Saiu",
];

/// Display cells for one record, in `HEADERS` order.
fn row_cells(record: &LogisticsRecord, lookup: &ClientLookup) -> Vec<String> {
    vec![
        record.data.clone(),
        record.numero_fo(),
        record.numero_orc(),
        record.cliente_name(lookup).to_string(),
        record.descricao().to_string(),
        record.tipo().to_string(),
        record.recolha_name(lookup).to_string(),
        record.entrega_name(lookup).to_string(),
        record.transportadora.clone().unwrap_or_default(),
        record.guia.clone().unwrap_or_default(),
        (if record.effective_saiu() { "Sim" } else { "Não" }).to_string(),
    ]
    .into_iter()
    .map(|cell| truncate(&cell, constants::MAX_COLUMN_WIDTH))
    .collect()
}

/// Cut `text` to at most `max` characters, marking the cut with "…".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Write an aligned text table. `max_rows` of 0 means unlimited.
///
/// Returns the number of rows written.
pub fn write_table<W: Write>(
    mut out: W,
    records: &[LogisticsRecord],
    lookup: &ClientLookup,
    max_rows: usize,
) -> io::Result<usize> {
    let limit = if max_rows == 0 {
        records.len()
    } else {
        max_rows.min(records.len())
    };
    let rows: Vec<Vec<String>> = records[..limit]
        .iter()
        .map(|r| row_cells(r, lookup))
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    write_line(&mut out, &headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, &rule, &widths)?;
    for row in &rows {
        write_line(&mut out, row, &widths)?;
    }

    if limit < records.len() {
        writeln!(out, "... {} more row(s) not shown", records.len() - limit)?;
    }
    out.flush()?;
    Ok(limit)
}

fn write_line<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())
}

/// Write records as a pretty JSON array.
pub fn write_json<W: Write>(out: W, records: &[LogisticsRecord]) -> io::Result<usize> {
    serde_json::to_writer_pretty(out, records).map_err(io::Error::from)?;
    Ok(records.len())
}
