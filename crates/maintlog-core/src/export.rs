//! Tabular flattening of records.
//!
//! Produces the spreadsheet-shaped rows used by CSV export and the narrower
//! rows of the columnar report. External repair cells are blank whenever the
//! record does not need one.

use std::io::Write;
use std::str::FromStr;

use crate::error::{MaintlogError, Result};
use crate::record::MaintenanceRecord;

/// Export output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Jsonl,
    #[default]
    Csv,
}

impl FromStr for ExportFormat {
    type Err = MaintlogError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "jsonl" | "ndjson" => Ok(ExportFormat::Jsonl),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(MaintlogError::InvalidInput(format!(
                "Unknown export format \"{}\" (expected json, jsonl or csv)",
                other
            ))),
        }
    }
}

pub const SHEET_COLUMNS: [&str; 14] = [
    "ID",
    "Machine Name",
    "Section",
    "Sub-part Area",
    "Operator",
    "Maintenance Staff",
    "Duration (Hours)",
    "Description",
    "Materials",
    "External Repair",
    "Vendor Name",
    "External Duration (Days)",
    "Created Date",
    "Created By",
];

pub const REPORT_COLUMNS: [&str; 7] = [
    "Machine",
    "Section",
    "Sub-part",
    "Operator",
    "Duration (h)",
    "External",
    "Date",
];

/// Materials as `name needed/available`, joined by `; `.
pub fn materials_summary(record: &MaintenanceRecord) -> String {
    record
        .materials
        .iter()
        .map(|line| {
            format!(
                "{} {}/{}",
                line.name, line.quantity_needed, line.quantity_available
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Hours without a trailing `.0` for whole numbers.
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.0}", hours)
    } else {
        format!("{}", hours)
    }
}

/// One spreadsheet row, aligned with [`SHEET_COLUMNS`].
pub fn sheet_row(record: &MaintenanceRecord) -> Vec<String> {
    let repair = record.external_repair();
    vec![
        record.id.clone(),
        record.machine_name.clone(),
        record.machine_section.clone(),
        record.sub_part_area.clone(),
        record.operator_name.clone(),
        record.maintenance_staff.clone(),
        format_hours(record.duration_hours),
        record.description.clone(),
        materials_summary(record),
        if repair.is_some() { "Yes" } else { "No" }.to_string(),
        repair.map(|r| r.vendor_name.to_string()).unwrap_or_default(),
        repair
            .map(|r| r.duration_days.to_string())
            .unwrap_or_default(),
        record.created_at.to_rfc3339(),
        record.created_by.clone(),
    ]
}

/// One report row, aligned with [`REPORT_COLUMNS`].
pub fn report_row(record: &MaintenanceRecord) -> Vec<String> {
    vec![
        record.machine_name.clone(),
        record.machine_section.clone(),
        record.sub_part_area.clone(),
        record.operator_name.clone(),
        format_hours(record.duration_hours),
        match record.external_repair() {
            Some(repair) if !repair.vendor_name.is_empty() => format!("Yes ({})", repair.vendor_name),
            Some(_) => "Yes".to_string(),
            None => "No".to_string(),
        },
        record.created_at.format("%Y-%m-%d").to_string(),
    ]
}

/// Write records in the requested format.
///
/// # Errors
///
/// Returns `MaintlogError::Storage` if writing to `out` fails.
pub fn export_records<W: Write>(
    records: &[MaintenanceRecord],
    format: ExportFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records).map_err(export_failed)?;
            writeln!(out)?;
        }
        ExportFormat::Jsonl => {
            for record in records {
                serde_json::to_writer(&mut *out, record).map_err(export_failed)?;
                writeln!(out)?;
            }
        }
        ExportFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .terminator(csv::Terminator::CRLF)
                .from_writer(&mut *out);
            writer.write_record(SHEET_COLUMNS).map_err(csv_failed)?;
            for record in records {
                writer.write_record(sheet_row(record)).map_err(csv_failed)?;
            }
            writer.flush()?;
        }
    }
    out.flush()?;
    Ok(())
}

fn export_failed(err: serde_json::Error) -> MaintlogError {
    MaintlogError::Storage(format!("Export failed: {}", err))
}

fn csv_failed(err: csv::Error) -> MaintlogError {
    MaintlogError::Storage(format!("Export failed: {}", err))
}
