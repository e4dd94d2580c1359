use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;
use crate::helpers::{confirm, is_interactive};
use crate::ui::{badge, print, receipt, short_id, Badge};

pub async fn handle_delete(ctx: &AppContext<'_>, args: &DeleteArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false, None);
    let mut store = ctx.open_store()?;
    store.load().await;

    let id = store.resolve_id(&args.id)?;

    if !args.yes {
        if !is_interactive(false) {
            return Err(CliError::invalid_input(
                "Refusing to delete without confirmation\nHint: Pass --yes to delete non-interactively.",
            )
            .into());
        }
        let label = store
            .get(&id)
            .map(|r| format!("{} / {} / {}", r.machine_name, r.machine_section, r.sub_part_area))
            .unwrap_or_default();
        let prompt = format!("Delete record {} ({})?", short_id(&id), label);
        if !confirm(&prompt, false)? {
            if !ctx.quiet() {
                if ui_ctx.mode.is_pretty() {
                    print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Cancelled"));
                } else {
                    println!("status=cancelled");
                }
            }
            return Ok(());
        }
    }

    store.delete(&id)?;
    store.settle().await;

    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Record deleted", &[("ID", &id)]));
    }
    Ok(())
}
