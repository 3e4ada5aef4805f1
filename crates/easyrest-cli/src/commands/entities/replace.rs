use crate::app::AppContext;
use crate::cli::WriteArgs;
use crate::helpers::read_document;

pub async fn handle_replace(ctx: &AppContext<'_>, args: &WriteArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let data = read_document(args.data.as_deref())?;

    service.replace(&args.slug, data, &args.id).await?;

    if !ctx.quiet() {
        println!("Replaced {} {}", args.slug, args.id);
    }
    Ok(())
}
