//! Booking Schemas
//!
//! Structural validation of the document collections behind the
//! appointment-booking platform: users, patients, doctors, appointments and
//! notifications.
//!
//! ## Pipeline
//!
//! ```text
//! caller ──► CollectionValidator::validate_collection_data(name, schema)
//!               │
//!               ├─► DocumentFetcher::get_<collection>()   (async, may fail)
//!               ├─► DocumentSchema::validate(doc)  × N     (sync, in order)
//!               └─► ReportingSink::{info,warn,error}      (side channel)
//!               ▼
//!            Vec<ValidationResult>   valid | invalid | error
//! ```
//!
//! Schemas come from the [`SchemaRegistry`], which embeds one JSON Schema per
//! collection and accepts per-collection overrides from a directory.

pub mod checksum;
pub mod collection;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod registry;
pub mod report;
pub mod schema;
pub mod validator;

pub use checksum::Checksum;
pub use collection::{Collection, RecognizedCollections};
pub use config::{OutputFormat, ValidatorConfig};
pub use error::{FetchError, Result, SchemaError};
pub use fetcher::{fetch_collection, DocumentFetcher, JsonFileFetcher};
pub use registry::{SchemaEntry, SchemaRegistry, SchemaSource};
pub use report::{CollectionReport, ReportingSink, TracingSink, ValidationReport};
pub use schema::{DocumentSchema, FieldViolation, JsonSchemaDefinition};
pub use validator::{
    CollectionValidator, FieldError, ValidationResult, ValidationStatus, ValidationSummary,
};
