use crate::app::AppContext;
use crate::cli::DeleteArgs;

pub async fn handle_delete(ctx: &AppContext<'_>, args: &DeleteArgs) -> anyhow::Result<()> {
    ctx.service()?.delete(&args.slug, &args.id).await?;

    if !ctx.quiet() {
        println!("Deleted {} {}", args.slug, args.id);
    }
    Ok(())
}
