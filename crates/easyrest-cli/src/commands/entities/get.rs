use crate::app::AppContext;
use crate::cli::GetArgs;
use crate::output::print_json;

pub async fn handle_get(ctx: &AppContext<'_>, args: &GetArgs) -> anyhow::Result<()> {
    let document = ctx.service()?.get(&args.slug, &args.id).await?;

    if args.json {
        println!("{}", serde_json::to_string(&document)?);
    } else {
        print_json(&document)?;
    }
    Ok(())
}
