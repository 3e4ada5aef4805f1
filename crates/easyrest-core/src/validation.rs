//! Document validation against a schema's JSON Schema (Draft 7).
//!
//! Schemas are compiled once, when the [`Schema`] is built. Every violation
//! produces one message; messages for nested values are prefixed with the
//! JSON pointer of the offending value. `format` is annotation only.

use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::schema::Schema;

/// Compile a raw JSON Schema value into a Draft 7 validator.
pub(crate) fn compile(json_schema: &Value) -> Result<Validator, String> {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .should_validate_formats(false)
        .build(json_schema)
        .map_err(|e| e.to_string())
}

/// Validate a document against a registered schema.
///
/// Returns the violations in the order the validator reports them; an
/// empty vector means valid.
pub fn validate(document: &Value, schema: &Schema) -> Vec<String> {
    schema
        .validator()
        .iter_errors(document)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            if pointer.is_empty() {
                error.to_string()
            } else {
                format!("{}: {}", pointer, error)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn check(json_schema: Value, document: Value) -> Vec<String> {
        let schema = Schema::new("mock", "Mock", json_schema).unwrap();
        validate(&document, &schema)
    }

    fn mock() -> Value {
        json!({
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["name"]
        })
    }

    #[test]
    fn test_valid_document_has_no_errors() {
        assert!(check(mock(), json!({"name": "karl", "age": 28})).is_empty());
    }

    #[test]
    fn test_unknown_properties_are_allowed_by_default() {
        assert!(check(mock(), json!({"name": "karl", "nickname": "k"})).is_empty());
    }

    #[test]
    fn test_one_message_per_violation() {
        let mut errors = check(mock(), json!({"age": "twenty eight"}));
        errors.sort();
        assert_eq!(
            errors,
            vec![
                "\"name\" is a required property".to_string(),
                "/age: \"twenty eight\" is not of type \"integer\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_violations_carry_pointer() {
        let schema = json!({
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"zip": {"type": "string", "minLength": 5}}
                },
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        });
        let mut errors = check(schema, json!({"address": {"zip": "123"}, "tags": ["a", 2]}));
        errors.sort();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("/address/zip: "));
        assert_eq!(errors[1], "/tags/1: 2 is not of type \"string\"");
    }

    #[test]
    fn test_numeric_minimum() {
        let schema = json!({"properties": {"age": {"type": "integer", "minimum": 0}}});
        assert_eq!(
            check(schema, json!({"age": -1})),
            vec!["/age: -1 is less than the minimum of 0".to_string()]
        );
    }

    #[test]
    fn test_additional_properties_false() {
        let schema = json!({
            "properties": {"name": {"type": "string"}},
            "additionalProperties": false
        });
        let errors = check(schema, json!({"name": "a", "x": 1}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Additional properties are not allowed"));
    }

    #[test]
    fn test_pattern_is_enforced() {
        let schema = json!({"properties": {"code": {"type": "string", "pattern": "^[a-z]+$"}}});
        assert!(check(schema.clone(), json!({"code": "abc"})).is_empty());

        let errors = check(schema, json!({"code": "123!!"}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("/code: "));
    }

    #[test]
    fn test_any_of_is_enforced() {
        let schema = json!({"properties": {"v": {"anyOf": [{"type": "string"}, {"type": "integer"}]}}});
        assert!(check(schema.clone(), json!({"v": 3})).is_empty());
        assert_eq!(check(schema, json!({"v": [1]})).len(), 1);
    }

    #[test]
    fn test_local_ref_is_resolved() {
        let schema = json!({
            "definitions": {"n": {"type": "integer"}},
            "properties": {"v": {"$ref": "#/definitions/n"}}
        });
        assert!(check(schema.clone(), json!({"v": 1})).is_empty());
        assert_eq!(
            check(schema, json!({"v": "x"})),
            vec!["/v: \"x\" is not of type \"integer\"".to_string()]
        );
    }

    #[test]
    fn test_conditional_keywords_are_enforced() {
        let schema = json!({
            "if": {"properties": {"kind": {"const": "bot"}}},
            "then": {"required": ["owner"]}
        });
        assert!(check(schema.clone(), json!({"kind": "human"})).is_empty());
        assert_eq!(
            check(schema, json!({"kind": "bot"})),
            vec!["\"owner\" is a required property".to_string()]
        );
    }

    #[test]
    fn test_format_is_annotation_only() {
        let schema = json!({"properties": {"mail": {"type": "string", "format": "email"}}});
        assert!(check(schema, json!({"mail": "not an address"})).is_empty());
    }
}
