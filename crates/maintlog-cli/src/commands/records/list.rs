use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::helpers::parse_output_format;
use crate::output::{print_json, print_record_list, records_json};

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    let ui_ctx = ctx.ui_context(args.json, format);

    let mut store = ctx.open_store()?;
    store.load().await;
    store.settle().await;

    let limit = if args.all {
        usize::MAX
    } else {
        args.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    };
    let records: Vec<_> = store.records().iter().take(limit).collect();

    if ui_ctx.mode.is_json() {
        return print_json(&records_json(&records)?);
    }
    print_record_list(&ui_ctx, "list", None, &records, store.len(), ctx.quiet());
    Ok(())
}
