use std::fs::File;
use std::io::{self, BufWriter};

use maintlog_core::export::{export_records, ExportFormat};

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::ui::{print, receipt};

pub async fn handle_export(ctx: &AppContext<'_>, args: &ExportArgs) -> anyhow::Result<()> {
    let format: ExportFormat = args.format.parse()?;

    let mut store = ctx.open_store()?;
    store.load().await;
    store.settle().await;
    let records = store.records();

    match args.output.as_deref() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                anyhow::anyhow!("Failed to create export file {}: {}", path.display(), e)
            })?;
            let mut writer = BufWriter::new(file);
            export_records(records, format, &mut writer)?;

            if !ctx.quiet() {
                let ui_ctx = ctx.ui_context(false, None);
                let count = records.len().to_string();
                let path = path.display().to_string();
                print(
                    &ui_ctx,
                    &receipt(
                        &ui_ctx,
                        "Export written",
                        &[("Records", &count), ("Path", &path)],
                    ),
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            export_records(records, format, &mut writer)?;
        }
    }
    Ok(())
}
