use crate::app::AppContext;
use crate::cli::SchemasArgs;
use crate::output::{print_json, schemas_json, schemas_table, OutputMode};

pub fn handle_schemas(ctx: &AppContext<'_>, args: &SchemasArgs) -> anyhow::Result<()> {
    let service = ctx.service()?;

    let mode = OutputMode::from_env(args.json);
    if mode.is_json() {
        return print_json(&schemas_json(service.schemas()));
    }

    if service.registry().is_empty() {
        if !ctx.quiet() {
            println!("No schemas declared.");
        }
        return Ok(());
    }
    println!("{}", schemas_table(service.schemas(), mode));
    Ok(())
}
