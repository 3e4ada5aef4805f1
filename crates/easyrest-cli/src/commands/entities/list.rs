use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{page_json, page_table, print_json, OutputMode};

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let page = service.list(&args.slug, args.page, args.size).await?;

    let mode = OutputMode::from_env(args.json);
    if mode.is_json() {
        return print_json(&page_json(&page)?);
    }

    if page.result.is_empty() {
        if !ctx.quiet() {
            println!(
                "No documents on page {} ({} total).",
                page.page, page.total_count
            );
        }
        return Ok(());
    }

    let schema = service.schema(&args.slug)?;
    println!("{}", page_table(&page, schema, mode));
    Ok(())
}
