//! Declared entity schemas and the registry that resolves them by slug.
//!
//! A declaration is a JSON Schema object carrying three extra keys: `name`,
//! `slug` and the optional `enabled_handlers`. Everything else in the object
//! is kept verbatim and compiled into a Draft 7 validator.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RegistryError, SchemaError, ServiceError};
use crate::validation;

/// An operation the service can perform on a schema's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handler {
    List,
    Create,
    Get,
    Replace,
    PartialUpdate,
    Delete,
}

impl Handler {
    pub const ALL: [Handler; 6] = [
        Handler::List,
        Handler::Create,
        Handler::Get,
        Handler::Replace,
        Handler::PartialUpdate,
        Handler::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Handler::List => "list",
            Handler::Create => "create",
            Handler::Get => "get",
            Handler::Replace => "replace",
            Handler::PartialUpdate => "partial_update",
            Handler::Delete => "delete",
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw schema declaration as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDeclaration {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_handlers: Option<Vec<Handler>>,
    /// Remaining JSON Schema keywords (`properties`, `required`, ...).
    #[serde(flatten)]
    pub json_schema: Map<String, Value>,
}

/// Top-level declaration document: `{"name": ..., "schemas": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDeclaration {
    #[serde(default)]
    pub name: String,
    pub schemas: Vec<SchemaDeclaration>,
}

impl ApiDeclaration {
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Convert every declaration and build a registry from them.
    pub fn into_registry(self) -> Result<SchemaRegistry, SchemaError> {
        let schemas = self
            .schemas
            .into_iter()
            .map(Schema::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaRegistry::new(schemas)?)
    }
}

/// A registered entity type. Immutable once built.
#[derive(Clone)]
pub struct Schema {
    slug: String,
    name: String,
    json_schema: Value,
    validator: Arc<Validator>,
    enabled_handlers: BTreeSet<Handler>,
}

impl Schema {
    /// Create a schema with every handler enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] when `json_schema` is not a valid
    /// Draft 7 schema.
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        json_schema: Value,
    ) -> Result<Self, SchemaError> {
        let slug = slug.into();
        let validator = validation::compile(&json_schema).map_err(|message| {
            SchemaError::Compile {
                slug: slug.clone(),
                message,
            }
        })?;
        Ok(Self {
            slug,
            name: name.into(),
            json_schema,
            validator: Arc::new(validator),
            enabled_handlers: Handler::ALL.into_iter().collect(),
        })
    }

    pub fn with_handlers(mut self, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.enabled_handlers = handlers.into_iter().collect();
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn json_schema(&self) -> &Value {
        &self.json_schema
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn enabled_handlers(&self) -> &BTreeSet<Handler> {
        &self.enabled_handlers
    }

    pub fn handles(&self, handler: Handler) -> bool {
        self.enabled_handlers.contains(&handler)
    }

    /// Render the schema back into its declaration form.
    pub fn to_declaration(&self) -> Value {
        let mut out = match &self.json_schema {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        out.insert("name".to_string(), Value::String(self.name.clone()));
        out.insert("slug".to_string(), Value::String(self.slug.clone()));
        out.insert(
            "enabled_handlers".to_string(),
            Value::Array(
                self.enabled_handlers
                    .iter()
                    .map(|h| Value::String(h.as_str().to_string()))
                    .collect(),
            ),
        );
        Value::Object(out)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("json_schema", &self.json_schema)
            .field("enabled_handlers", &self.enabled_handlers)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
            && self.name == other.name
            && self.json_schema == other.json_schema
            && self.enabled_handlers == other.enabled_handlers
    }
}

impl TryFrom<SchemaDeclaration> for Schema {
    type Error = SchemaError;

    fn try_from(decl: SchemaDeclaration) -> Result<Self, Self::Error> {
        let invalid = |message: &str| SchemaError::Invalid {
            slug: decl.slug.clone(),
            message: message.to_string(),
        };

        if let Some(properties) = decl.json_schema.get("properties") {
            if !properties.is_object() {
                return Err(invalid("properties must be an object"));
            }
        }
        if let Some(required) = decl.json_schema.get("required") {
            let all_strings = required
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false);
            if !all_strings {
                return Err(invalid("required must be an array of strings"));
            }
        }

        let schema = Schema::new(
            decl.slug.clone(),
            decl.name.clone(),
            Value::Object(decl.json_schema.clone()),
        )?;
        Ok(match decl.enabled_handlers {
            Some(handlers) => schema.with_handlers(handlers),
            None => schema,
        })
    }
}

/// Read-only slug → schema mapping, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build a registry. Slugs must be unique and non-empty.
    pub fn new(schemas: Vec<Schema>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(schemas.len());
        for (position, schema) in schemas.iter().enumerate() {
            if schema.slug.trim().is_empty() {
                return Err(RegistryError::EmptySlug {
                    name: schema.name.clone(),
                });
            }
            if index.insert(schema.slug.clone(), position).is_some() {
                return Err(RegistryError::DuplicateSlug(schema.slug.clone()));
            }
        }
        Ok(Self { schemas, index })
    }

    pub fn get(&self, slug: &str) -> Option<&Schema> {
        self.index.get(slug).map(|&position| &self.schemas[position])
    }

    /// Look up `slug` and check that `handler` is enabled for it.
    pub fn resolve(&self, slug: &str, handler: Handler) -> Result<&Schema, ServiceError> {
        let schema = self
            .get(slug)
            .ok_or_else(|| ServiceError::UnknownSchema(slug.to_string()))?;
        if !schema.handles(handler) {
            return Err(ServiceError::HandlerDisabled {
                slug: slug.to_string(),
                handler,
            });
        }
        Ok(schema)
    }

    /// Schemas in declaration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
