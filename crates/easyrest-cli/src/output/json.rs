//! JSON output formatting.

use serde::Serialize;
use serde_json::Value;

use easyrest_core::{PageResult, Schema};

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Listing in its wire shape: `{result, page, size, totalCount}`.
pub fn page_json(page: &PageResult) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(page)?)
}

/// A schema in its declaration shape.
pub fn schema_json(schema: &Schema) -> Value {
    schema.to_declaration()
}

pub fn schemas_json<'a>(schemas: impl Iterator<Item = &'a Schema>) -> Vec<Value> {
    schemas.map(schema_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_json_uses_total_count_key() {
        let page = PageResult {
            result: vec![],
            page: 1,
            size: 2,
            total_count: 4,
        };
        assert_eq!(
            page_json(&page).unwrap(),
            json!({"result": [], "page": 1, "size": 2, "totalCount": 4})
        );
    }
}
