use crate::app::AppContext;
use crate::cli::WriteArgs;
use crate::helpers::read_document;

pub async fn handle_patch(ctx: &AppContext<'_>, args: &WriteArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let data = read_document(args.data.as_deref())?;

    service.partial_update(&args.slug, data, &args.id).await?;

    if !ctx.quiet() {
        println!("Updated {} {}", args.slug, args.id);
    }
    Ok(())
}
