use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::output::{print_json, print_record};

pub async fn handle_show(ctx: &AppContext<'_>, args: &ShowArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, None);
    let mut store = ctx.open_store()?;
    store.load().await;
    store.settle().await;

    let id = store.resolve_id(&args.id)?;
    let record = store.get(&id).ok_or_else(|| {
        CliError::not_found(
            format!("Record {} not found", id),
            "Hint: Run `maintlog list` to find record IDs.",
        )
    })?;

    if ui_ctx.mode.is_json() {
        return print_json(record);
    }
    print_record(&ui_ctx, record);
    Ok(())
}
