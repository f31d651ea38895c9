//! Structural schemas for collection documents

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};

/// Field path used when the document itself is the offending value
pub const ROOT_FIELD: &str = "$root";

/// A single field-level violation of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Dot-joined path of the offending field (e.g. `address.city`)
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Capability to check a document against a structural contract.
///
/// An empty violation list means the document conforms. Implementations
/// must be pure: no I/O, no interior mutation.
pub trait DocumentSchema: Send + Sync {
    /// Validate one document, reporting one entry per violated field
    fn validate(&self, document: &Value) -> Vec<FieldViolation>;

    /// The underlying definition, if the schema has a JSON representation
    fn describe(&self) -> Option<&Value> {
        None
    }
}

/// A [`DocumentSchema`] backed by a compiled JSON Schema (draft 7)
pub struct JsonSchemaDefinition {
    definition: Value,
    compiled: JSONSchema,
}

impl JsonSchemaDefinition {
    /// Compile a JSON Schema definition for `collection`
    pub fn compile(collection: &str, definition: Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&definition)
            .map_err(|e| SchemaError::InvalidSchema {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            definition,
            compiled,
        })
    }

    /// Parse and compile a definition from JSON text
    pub fn parse(collection: &str, content: &str) -> Result<Self> {
        let definition: Value = serde_json::from_str(content)?;
        Self::compile(collection, definition)
    }

    /// Raw definition
    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// Fingerprint of the definition
    pub fn checksum(&self) -> Checksum {
        Checksum::from_json(&self.definition)
    }
}

impl std::fmt::Debug for JsonSchemaDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaDefinition")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl DocumentSchema for JsonSchemaDefinition {
    fn validate(&self, document: &Value) -> Vec<FieldViolation> {
        match self.compiled.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let mut path = pointer_segments(&error.instance_path.to_string());
                    let message = match &error.kind {
                        ValidationErrorKind::Required { property } => {
                            let name = property
                                .as_str()
                                .map_or_else(|| property.to_string(), String::from);
                            path.push(name);
                            "Required".to_string()
                        }
                        _ => error.to_string(),
                    };
                    FieldViolation::new(field_path(&path), message)
                })
                .collect(),
        }
    }

    fn describe(&self) -> Option<&Value> {
        Some(&self.definition)
    }
}

/// Split a JSON pointer (`/a/0/b`) into unescaped segments
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn field_path(segments: &[String]) -> String {
    if segments.is_empty() {
        ROOT_FIELD.to_string()
    } else {
        segments.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adult_schema() -> JsonSchemaDefinition {
        JsonSchemaDefinition::compile(
            "people",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "number", "minimum": 18 },
                    "address": {
                        "type": "object",
                        "properties": { "city": { "type": "string" } },
                        "required": ["city"]
                    }
                },
                "required": ["name", "age"]
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_conforming_document() {
        let schema = adult_schema();
        assert!(schema.validate(&json!({"id": "1", "name": "John", "age": 30})).is_empty());
    }

    #[test]
    fn test_minimum_refinement() {
        let schema = adult_schema();
        let violations = schema.validate(&json!({"id": "2", "name": "Minor", "age": 16}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "age");
        assert!(!violations[0].message.is_empty());
    }

    #[test]
    fn test_missing_and_nested_fields() {
        let schema = adult_schema();
        let violations = schema.validate(&json!({"age": 40, "address": {}}));
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"address.city"));
        assert!(violations.iter().all(|v| v.message == "Required"));
    }

    #[test]
    fn test_non_object_reports_root() {
        let schema = adult_schema();
        let violations = schema.validate(&json!("not a document"));
        assert_eq!(violations[0].field, ROOT_FIELD);
    }

    #[test]
    fn test_invalid_definition_is_rejected() {
        let err = JsonSchemaDefinition::compile("users", json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }));
    }

    #[test]
    fn test_pointer_unescaping() {
        assert_eq!(pointer_segments(""), Vec::<String>::new());
        assert_eq!(pointer_segments("/a~1b/0/c~0d"), vec!["a/b", "0", "c~d"]);
    }
}
