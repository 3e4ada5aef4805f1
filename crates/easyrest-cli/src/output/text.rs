//! Text and table output formatting.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

use easyrest_core::storage::DEFAULT_ID_FIELD;
use easyrest_core::{Document, PageResult, Schema};

use super::mode::OutputMode;

/// Render one page of documents.
///
/// Columns are the identity field followed by the schema's declared
/// properties, in declaration order.
pub fn page_table(page: &PageResult, schema: &Schema, mode: OutputMode) -> String {
    let columns = columns_for(schema);
    let rows: Vec<Vec<String>> = page
        .result
        .iter()
        .map(|document| row_for(document, &columns))
        .collect();

    if mode.is_pretty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.clone());
        for row in rows {
            table.add_row(row);
        }
        let shown = page.result.len();
        format!(
            "{}\nPage {} (size {}): {} of {} documents",
            table, page.page, page.size, shown, page.total_count
        )
    } else {
        rows.iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render the declared schemas: slug, name, enabled operations.
pub fn schemas_table<'a>(schemas: impl Iterator<Item = &'a Schema>, mode: OutputMode) -> String {
    let rows: Vec<Vec<String>> = schemas
        .map(|schema| {
            let handlers: Vec<&str> = schema
                .enabled_handlers()
                .iter()
                .map(|handler| handler.as_str())
                .collect();
            vec![
                schema.slug().to_string(),
                schema.name().to_string(),
                handlers.join(","),
            ]
        })
        .collect();

    if mode.is_pretty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Slug", "Name", "Operations"]);
        for row in rows {
            table.add_row(row);
        }
        table.to_string()
    } else {
        rows.iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn columns_for(schema: &Schema) -> Vec<String> {
    let mut columns = vec![DEFAULT_ID_FIELD.to_string()];
    if let Some(properties) = schema
        .json_schema()
        .get("properties")
        .and_then(Value::as_object)
    {
        columns.extend(
            properties
                .keys()
                .filter(|name| name.as_str() != DEFAULT_ID_FIELD)
                .cloned(),
        );
    }
    columns
}

fn row_for(document: &Document, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| cell(document.get(column)))
        .collect()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            "users",
            "User",
            json!({
                "properties": {
                    "name": {"type": "string"},
                    "tags": {"type": "array"},
                    "age": {"type": "integer"}
                }
            }),
        )
        .unwrap()
    }

    fn page() -> PageResult {
        PageResult {
            result: vec![
                json!({"id": "u1", "name": "karl", "age": 40, "tags": ["a", "b"]})
                    .as_object()
                    .cloned()
                    .unwrap(),
                json!({"id": "u2", "name": "ana"}).as_object().cloned().unwrap(),
            ],
            page: 0,
            size: 30,
            total_count: 2,
        }
    }

    #[test]
    fn test_plain_rows_follow_declared_columns() {
        let out = page_table(&page(), &schema(), OutputMode::Plain);
        assert_eq!(out, "u1\tkarl\t[\"a\",\"b\"]\t40\nu2\tana\t\t");
    }

    #[test]
    fn test_pretty_table_has_header_and_footer() {
        let out = page_table(&page(), &schema(), OutputMode::Pretty);
        assert!(out.contains("name"));
        assert!(out.contains("karl"));
        assert!(out.ends_with("Page 0 (size 30): 2 of 2 documents"));
    }

    #[test]
    fn test_schemas_plain() {
        let schemas = [schema()];
        let out = schemas_table(schemas.iter(), OutputMode::Plain);
        assert_eq!(
            out,
            "users\tUser\tlist,create,get,replace,partial_update,delete"
        );
    }
}
