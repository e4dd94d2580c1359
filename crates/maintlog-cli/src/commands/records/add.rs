use maintlog_core::RecordInput;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::{is_interactive, prompt_text};
use crate::output::print_json;
use crate::ui::{hint, print, receipt, short_id};

use super::form::{apply_attachments, apply_fields};

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, None);
    let mut store = ctx.open_store()?;

    let mut input = RecordInput::default();
    apply_fields(&args.form, &mut input)?;
    if !args.json && is_interactive(args.no_input) {
        prompt_required(&mut input)?;
    }

    // Reject the form before uploading anything.
    input.validate()?;
    apply_attachments(&store, &args.form, &mut input).await?;

    let record = store.create(input)?;
    store.settle().await;

    if ui_ctx.mode.is_json() {
        return print_json(&record);
    }
    if ctx.quiet() {
        return Ok(());
    }

    let id = if ui_ctx.mode.is_pretty() {
        short_id(&record.id)
    } else {
        record.id.clone()
    };
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Record added",
            &[
                ("ID", &id),
                ("Machine", &record.machine_name),
                ("Section", &record.machine_section),
                ("Sub-part", &record.sub_part_area),
            ],
        ),
    );
    if ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &hint(&ui_ctx, &format!("maintlog show {}", id)));
    }
    Ok(())
}

fn prompt_required(input: &mut RecordInput) -> anyhow::Result<()> {
    if input.machine_name.trim().is_empty() {
        input.machine_name = prompt_text("Machine name", None, true)?;
    }
    if input.machine_section.trim().is_empty() {
        input.machine_section = prompt_text("Machine section", None, true)?;
    }
    if input.sub_part_area.trim().is_empty() {
        input.sub_part_area = prompt_text("Sub-part area", None, true)?;
    }
    if input.operator_name.trim().is_empty() {
        input.operator_name = prompt_text("Operator", None, false)?;
    }
    Ok(())
}
