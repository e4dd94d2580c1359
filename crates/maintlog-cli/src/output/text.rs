//! Text and table output formatting for records.

use maintlog_core::export::{format_hours, materials_summary};
use maintlog_core::MaintenanceRecord;

use crate::ui::format::wrap;
use crate::ui::theme::{styled, styles};
use crate::ui::{
    blank_line, format_datetime, header, hint, kv, print, short_id, simple_table, single_line,
    truncate, Column, UiContext,
};

const LIST_COLUMNS: [Column; 7] = [
    Column::new("ID"),
    Column::new("Date"),
    Column::new("Machine"),
    Column::new("Section"),
    Column::new("Sub-part"),
    Column::new("Operator"),
    Column::new("Hours"),
];

/// Human label for an attachment reference. Embedded payloads are
/// summarized instead of dumped.
pub fn attachment_label(reference: &str) -> String {
    match reference.strip_prefix("data:") {
        Some(rest) => {
            let (mime, payload) = rest.split_once(";base64,").unwrap_or((rest, ""));
            let bytes = payload.trim_end_matches('=').len() * 3 / 4;
            format!("embedded {} ({} bytes)", mime, bytes)
        }
        None => reference.to_string(),
    }
}

fn list_row(record: &MaintenanceRecord, pretty: bool) -> Vec<String> {
    let cell = |value: &str| {
        if pretty {
            truncate(&single_line(value), 24)
        } else {
            single_line(value)
        }
    };
    let date = if pretty {
        record.created_at.format("%Y-%m-%d").to_string()
    } else {
        record.created_at.to_rfc3339()
    };
    vec![
        if pretty {
            short_id(&record.id)
        } else {
            record.id.clone()
        },
        date,
        cell(&record.machine_name),
        cell(&record.machine_section),
        cell(&record.sub_part_area),
        cell(&record.operator_name),
        format_hours(record.duration_hours),
    ]
}

/// Print a list of records, newest first.
pub fn print_record_list(
    ctx: &UiContext,
    command: &str,
    context: Option<&str>,
    records: &[&MaintenanceRecord],
    total: usize,
    quiet: bool,
) {
    let pretty = ctx.mode.is_pretty();
    if records.is_empty() {
        if !quiet && pretty {
            print(ctx, &header(ctx, command, context));
            print(ctx, &hint(ctx, "No matching records. Add one with `maintlog add`."));
        }
        return;
    }

    if !quiet && pretty {
        print(ctx, &header(ctx, command, context));
        blank_line(ctx);
    }

    let rows: Vec<Vec<String>> = records.iter().map(|r| list_row(r, pretty)).collect();
    print(ctx, &simple_table(ctx, &LIST_COLUMNS, &rows));

    if !quiet && pretty {
        blank_line(ctx);
        let shown = if records.len() < total {
            format!("Showing {} of {} records", records.len(), total)
        } else {
            format!("{} record{}", total, if total == 1 { "" } else { "s" })
        };
        print(ctx, &styled(&shown, styles::dim(), ctx.color));
    }
}

/// Print one record as a card.
pub fn print_record(ctx: &UiContext, record: &MaintenanceRecord) {
    let pretty = ctx.mode.is_pretty();
    let mut lines = Vec::new();

    if pretty {
        lines.push(styled(&record.machine_name, styles::bold(), ctx.color));
    }
    lines.push(kv(ctx, "ID", &record.id));
    lines.push(kv(ctx, "Machine", &record.machine_name));
    lines.push(kv(ctx, "Section", &record.machine_section));
    lines.push(kv(ctx, "Sub-part Area", &record.sub_part_area));
    if !record.machine_details.is_empty() {
        lines.push(kv(ctx, "Details", &single_line(&record.machine_details)));
    }
    lines.push(kv(ctx, "Operator", &record.operator_name));
    lines.push(kv(ctx, "Maintenance Staff", &record.maintenance_staff));
    lines.push(kv(ctx, "Duration (h)", &format_hours(record.duration_hours)));

    if pretty && !record.materials.is_empty() {
        lines.push(kv(ctx, "Materials", ""));
        for line in &record.materials {
            let short = line.quantity_available < line.quantity_needed;
            let entry = format!(
                "  - {} {}/{}",
                line.name, line.quantity_needed, line.quantity_available
            );
            lines.push(if short {
                styled(&entry, styles::yellow(), ctx.color)
            } else {
                entry
            });
        }
    } else if !record.materials.is_empty() {
        lines.push(kv(ctx, "Materials", &materials_summary(record)));
    }

    match record.external_repair() {
        Some(repair) => {
            lines.push(kv(ctx, "External Repair", "Yes"));
            lines.push(kv(ctx, "Vendor", repair.vendor_name));
            lines.push(kv(
                ctx,
                "External Duration (days)",
                &repair.duration_days.to_string(),
            ));
            if let Some(quotation) = repair.quotation_ref {
                lines.push(kv(ctx, "Quotation", &attachment_label(quotation)));
            }
        }
        None => lines.push(kv(ctx, "External Repair", "No")),
    }

    if let Some(image) = record.image_ref.as_deref() {
        lines.push(kv(ctx, "Image", &attachment_label(image)));
    }

    lines.push(kv(ctx, "Created", &format_datetime(&record.created_at, pretty)));
    lines.push(kv(ctx, "Created By", &record.created_by));

    if !record.description.trim().is_empty() {
        if pretty {
            lines.push(kv(ctx, "Description", ""));
            let width = ctx.width.saturating_sub(4).max(20);
            for line in wrap(&record.description, width) {
                lines.push(format!("  {}", line));
            }
        } else {
            lines.push(kv(ctx, "Description", &single_line(&record.description)));
        }
    }

    print(ctx, &lines.join("\n"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_label_summarizes_data_uri() {
        assert_eq!(
            attachment_label("data:image/png;base64,aGVsbG8="),
            "embedded image/png (5 bytes)"
        );
        assert_eq!(
            attachment_label("https://files.example.com/a.png"),
            "https://files.example.com/a.png"
        );
    }

    #[test]
    fn test_list_row_plain_keeps_full_values() {
        let record: MaintenanceRecord = serde_json::from_value(serde_json::json!({
            "id": "0192f1d2-7c4e-7abc-9def-0123456789ab",
            "machine_name": "Press-1",
            "machine_section": "Line A",
            "sub_part_area": "Motor",
            "operator_name": "Dana",
            "duration_hours": 2.5,
            "created_at": "2025-03-01T08:00:00Z"
        }))
        .unwrap();

        let row = list_row(&record, false);
        assert_eq!(row[0], record.id);
        assert_eq!(row[6], "2.5");

        let row = list_row(&record, true);
        assert_eq!(row[0], "0192f1d2");
        assert_eq!(row[1], "2025-03-01");
    }
}
