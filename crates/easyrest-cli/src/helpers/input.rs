//! Input handling helpers for document payloads.

use std::io::{self, IsTerminal, Read};

use serde_json::Value;

use easyrest_core::Document;

use crate::errors::CliError;

/// Read a document from `--data`, or from stdin when the flag is `-` or absent.
pub fn read_document(data: Option<&str>) -> anyhow::Result<Document> {
    match data {
        Some(raw) if raw != "-" => Ok(parse_document(raw)?),
        explicit => {
            if explicit.is_none() && io::stdin().is_terminal() {
                return Err(CliError::invalid_input(
                    "No document provided; pass --data '<JSON>' or pipe JSON on stdin",
                )
                .into());
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(parse_document(&buffer)?)
        }
    }
}

/// Parse a JSON object. Anything else is invalid input.
pub(crate) fn parse_document(raw: &str) -> Result<Document, CliError> {
    if raw.trim().is_empty() {
        return Err(CliError::invalid_input("Document is empty"));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::invalid_input(format!(
            "Document must be a JSON object, got {}",
            kind(&other)
        ))),
        Err(e) => Err(CliError::invalid_input(format!("Invalid JSON: {}", e))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
