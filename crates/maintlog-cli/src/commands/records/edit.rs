use maintlog_core::RecordInput;

use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::{print, receipt, short_id};

use super::form::{apply_attachments, apply_fields};

pub async fn handle_edit(ctx: &AppContext<'_>, args: &EditArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, None);
    let mut store = ctx.open_store()?;
    store.load().await;

    let id = store.resolve_id(&args.id)?;
    let existing = store.get(&id).ok_or_else(|| {
        CliError::not_found(
            format!("Record {} not found", id),
            "Hint: Run `maintlog list` to find record IDs.",
        )
    })?;

    // Edits resubmit the whole form: start from the stored values.
    let mut input = RecordInput::from(existing);
    if args.clear_materials {
        input.materials.clear();
    }
    if args.no_external {
        input.needs_external_repair = false;
        input.vendor_name.clear();
        input.external_duration_days = 0;
    }
    if args.clear_image {
        input.image_ref = None;
    }
    if args.clear_quotation {
        input.quotation_ref = None;
    }
    apply_fields(&args.form, &mut input)?;

    input.validate()?;
    apply_attachments(&store, &args.form, &mut input).await?;

    let record = store.update(&id, input)?;
    store.settle().await;

    if ui_ctx.mode.is_json() {
        return print_json(&record);
    }
    if !ctx.quiet() {
        let shown = if ui_ctx.mode.is_pretty() {
            short_id(&record.id)
        } else {
            record.id.clone()
        };
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Record updated",
                &[("ID", &shown), ("Machine", &record.machine_name)],
            ),
        );
    }
    Ok(())
}
