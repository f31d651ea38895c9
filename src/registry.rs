//! Schema Registry
//!
//! Maps each recognized collection to exactly one structural schema. The
//! built-in definitions are embedded from `schemas/` at compile time; a
//! directory of `<collection>.schema.json` files may override any of them.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use include_dir::{include_dir, Dir};

use crate::checksum::Checksum;
use crate::collection::{Collection, RecognizedCollections};
use crate::error::{Result, SchemaError};
use crate::schema::{DocumentSchema, JsonSchemaDefinition};

static BUILTIN_SCHEMAS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// Where a registered schema came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Builtin,
    File(PathBuf),
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::Builtin => write!(f, "builtin"),
            SchemaSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A registered schema with its fingerprint
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub collection: Collection,
    pub schema: Arc<JsonSchemaDefinition>,
    pub checksum: Checksum,
    pub source: SchemaSource,
}

impl SchemaEntry {
    fn new(collection: Collection, schema: JsonSchemaDefinition, source: SchemaSource) -> Self {
        let checksum = schema.checksum();
        Self {
            collection,
            schema: Arc::new(schema),
            checksum,
            source,
        }
    }
}

/// Static lookup table from collection to schema
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    recognized: RecognizedCollections,
    entries: BTreeMap<Collection, SchemaEntry>,
}

impl SchemaRegistry {
    /// Registry of the embedded definitions for every recognized collection
    pub fn builtin(recognized: RecognizedCollections) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for collection in recognized.iter() {
            entries.insert(collection, load_builtin(collection)?);
        }
        Ok(Self { recognized, entries })
    }

    /// Registry preferring `<dir>/<collection>.schema.json` over the builtin
    pub fn from_directory(
        dir: impl AsRef<Path>,
        recognized: RecognizedCollections,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let mut entries = BTreeMap::new();

        for collection in recognized.iter() {
            let path = dir.join(collection.schema_file());
            let entry = if path.is_file() {
                let content = fs::read_to_string(&path)?;
                let schema = JsonSchemaDefinition::parse(collection.as_str(), &content)?;
                tracing::debug!(
                    collection = %collection,
                    path = %path.display(),
                    "loaded schema override"
                );
                SchemaEntry::new(collection, schema, SchemaSource::File(path))
            } else {
                load_builtin(collection)?
            };
            entries.insert(collection, entry);
        }

        Ok(Self { recognized, entries })
    }

    /// Look up the schema for a collection name.
    ///
    /// Names outside the recognized set yield `None`.
    pub fn get_schema_for_collection(&self, name: &str) -> Option<Arc<dyn DocumentSchema>> {
        self.entry(name)
            .map(|e| Arc::clone(&e.schema) as Arc<dyn DocumentSchema>)
    }

    /// Full registry entry for a collection name
    pub fn entry(&self, name: &str) -> Option<&SchemaEntry> {
        self.recognized
            .resolve(name)
            .and_then(|c| self.entries.get(&c))
    }

    /// Recognized collections, in declaration order
    pub fn collections(&self) -> impl Iterator<Item = Collection> + '_ {
        self.entries.keys().copied()
    }

    pub fn recognized(&self) -> &RecognizedCollections {
        &self.recognized
    }

    /// Closest recognized collection name to `query`, if any is close
    pub fn suggest(&self, query: &str) -> Option<Collection> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let query = query.to_lowercase();

        self.collections()
            .filter_map(|c| {
                matcher
                    .fuzzy_match(c.as_str(), &query)
                    .map(|score| (score, c))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, c)| c)
    }

    /// Error text for a name with no schema, with a "did you mean" hint
    pub fn unknown_collection_message(&self, name: &str) -> String {
        match self.suggest(name) {
            Some(c) => format!("Unknown collection: {} (did you mean '{}'?)", name, c),
            None => format!("Unknown collection: {}", name),
        }
    }
}

fn load_builtin(collection: Collection) -> Result<SchemaEntry> {
    let content = BUILTIN_SCHEMAS
        .get_file(collection.schema_file())
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| SchemaError::MissingBuiltin(collection.to_string()))?;
    let schema = JsonSchemaDefinition::parse(collection.as_str(), content)?;
    Ok(SchemaEntry::new(collection, schema, SchemaSource::Builtin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_every_recognized_collection_has_a_schema() {
        let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
        for c in Collection::ALL {
            assert!(registry.get_schema_for_collection(c.as_str()).is_some(), "{}", c);
        }
        assert_eq!(registry.collections().count(), 5);
    }

    #[test]
    fn test_unknown_names_have_no_schema() {
        let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
        for name in ["", "user", "Users", "invoices", "appointments "] {
            assert!(registry.get_schema_for_collection(name).is_none(), "{:?}", name);
        }
    }

    #[test]
    fn test_narrowed_set() {
        let recognized = RecognizedCollections::new([Collection::Appointments]);
        let registry = SchemaRegistry::builtin(recognized).unwrap();
        assert!(registry.get_schema_for_collection("appointments").is_some());
        assert!(registry.get_schema_for_collection("users").is_none());
    }

    #[test]
    fn test_builtin_appointment_schema() {
        let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
        let schema = registry.get_schema_for_collection("appointments").unwrap();

        let ok = json!({
            "id": "a1", "patientId": "p1", "doctorId": "d1",
            "date": "2024-03-01", "time": "09:30", "status": "confirmed"
        });
        assert!(schema.validate(&ok).is_empty());

        let bad = json!({
            "id": "a2", "patientId": "p1", "doctorId": "d1",
            "date": "2024-03-01", "time": "09:30", "status": "rescheduled"
        });
        let violations = schema.validate(&bad);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "status");
    }

    #[test]
    fn test_directory_override() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("users.schema.json"),
            r#"{"type": "object", "required": ["nickname"]}"#,
        )
        .unwrap();

        let registry =
            SchemaRegistry::from_directory(dir.path(), RecognizedCollections::all()).unwrap();
        let users = registry.entry("users").unwrap();
        assert!(matches!(users.source, SchemaSource::File(_)));
        assert_eq!(registry.entry("doctors").unwrap().source, SchemaSource::Builtin);

        let violations = users.schema.validate(&json!({"id": "u1"}));
        assert_eq!(violations[0].field, "nickname");
    }

    #[test]
    fn test_broken_override_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("patients.schema.json"), "{ not json").unwrap();
        let err =
            SchemaRegistry::from_directory(dir.path(), RecognizedCollections::all()).unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn test_suggest() {
        let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
        assert_eq!(registry.suggest("apointments"), Some(Collection::Appointments));
        assert_eq!(registry.suggest("Doctor"), Some(Collection::Doctors));
        assert_eq!(registry.suggest("zzzz"), None);
    }

    #[test]
    fn test_unknown_collection_message() {
        let registry = SchemaRegistry::builtin(RecognizedCollections::all()).unwrap();
        assert_eq!(
            registry.unknown_collection_message("apointments"),
            "Unknown collection: apointments (did you mean 'appointments'?)"
        );
        assert_eq!(registry.unknown_collection_message("zzzz"), "Unknown collection: zzzz");
    }
}
