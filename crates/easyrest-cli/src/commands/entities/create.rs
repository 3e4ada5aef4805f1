use crate::app::AppContext;
use crate::cli::CreateArgs;
use crate::helpers::read_document;

pub async fn handle_create(ctx: &AppContext<'_>, args: &CreateArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let data = read_document(args.data.as_deref())?;

    let id = service.create(&args.slug, data, args.id.as_deref()).await?;

    // The bare id goes to stdout so scripts can capture it.
    println!("{}", id);
    if !ctx.quiet() {
        eprintln!("Created {} {}", args.slug, id);
    }
    Ok(())
}
