use crate::app::AppContext;
use crate::cli::SchemaShowArgs;
use crate::output::{print_json, schema_json};

/// Print the declared JSON Schema for a slug, the shape clients validate against.
pub fn handle_schema(ctx: &AppContext<'_>, args: &SchemaShowArgs) -> anyhow::Result<()> {
    let schema = ctx.service()?.schema(&args.slug)?;
    print_json(&schema_json(schema))
}
