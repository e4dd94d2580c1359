use crate::app::AppContext;
use crate::cli::SearchArgs;
use crate::helpers::parse_output_format;
use crate::output::{print_json, print_record_list, records_json};

pub async fn handle_search(ctx: &AppContext<'_>, args: &SearchArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    let ui_ctx = ctx.ui_context(args.json, format);

    let mut store = ctx.open_store()?;
    store.load().await;
    store.settle().await;

    let matches = store.query(&args.term);
    let total = matches.len();
    let records: Vec<_> = matches
        .into_iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if ui_ctx.mode.is_json() {
        return print_json(&records_json(&records)?);
    }
    let context = args.term.trim();
    print_record_list(
        &ui_ctx,
        "search",
        (!context.is_empty()).then_some(context),
        &records,
        total,
        ctx.quiet(),
    );
    Ok(())
}
