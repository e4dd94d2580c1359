use maintlog_core::export::{format_hours, report_row, REPORT_COLUMNS};

use crate::app::AppContext;
use crate::cli::ReportArgs;
use crate::helpers::parse_output_format;
use crate::ui::theme::{styled, styles};
use crate::ui::{blank_line, header, print, table, Column};

pub async fn handle_report(ctx: &AppContext<'_>, args: &ReportArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    let ui_ctx = ctx.ui_context(false, format);

    let mut store = ctx.open_store()?;
    store.load().await;
    store.settle().await;

    let records = store.query(args.search.as_deref().unwrap_or(""));
    let columns: Vec<Column> = REPORT_COLUMNS.iter().map(|h| Column::new(*h)).collect();
    let rows: Vec<Vec<String>> = records.iter().map(|r| report_row(r)).collect();

    let pretty = ui_ctx.mode.is_pretty();
    if pretty && !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "report", args.search.as_deref()));
        blank_line(&ui_ctx);
    }
    if !rows.is_empty() || pretty {
        print(&ui_ctx, &table(&ui_ctx, &columns, &rows));
    }

    if pretty && !ctx.quiet() {
        let hours: f64 = records.iter().map(|r| r.duration_hours).sum();
        let external = records
            .iter()
            .filter(|r| r.external_repair().is_some())
            .count();
        let summary = format!(
            "{} record{}, {} h total, {} external",
            records.len(),
            if records.len() == 1 { "" } else { "s" },
            format_hours(hours),
            external
        );
        blank_line(&ui_ctx);
        print(&ui_ctx, &styled(&summary, styles::dim(), ui_ctx.color));
    }
    Ok(())
}
