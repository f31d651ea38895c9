//! Validator Engine
//!
//! Fetches the raw documents of one collection and classifies each against a
//! schema. Data problems never surface as `Err`: a failed or unusable fetch
//! becomes a single `error` result and every document gets its own result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::collection::RecognizedCollections;
use crate::error::{FetchError, Result, SchemaError};
use crate::fetcher::{fetch_collection, DocumentFetcher};
use crate::registry::SchemaRegistry;
use crate::report::{ReportingSink, TracingSink};
use crate::schema::{DocumentSchema, FieldViolation};

/// Id of the synthetic result produced when the fetch fails
pub const FETCH_ERROR_ID: &str = "fetch-error";

/// Id reported for documents without a usable `id` member
pub const UNKNOWN_DOCUMENT_ID: &str = "unknown";

pub type FieldError = FieldViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    Error,
}

/// Outcome for one document, or the single outcome of a failed fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub id: String,
    pub status: ValidationStatus,
    /// Present only when `status` is `invalid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Present only when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl ValidationResult {
    pub fn valid(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ValidationStatus::Valid,
            errors: None,
            fetch_error: None,
        }
    }

    pub fn invalid(id: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            id: id.into(),
            status: ValidationStatus::Invalid,
            errors: Some(errors),
            fetch_error: None,
        }
    }

    pub fn fetch_failed(reason: impl Into<String>) -> Self {
        Self {
            id: FETCH_ERROR_ID.to_string(),
            status: ValidationStatus::Error,
            errors: None,
            fetch_error: Some(reason.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Tally of a result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
}

impl ValidationSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            s.total += 1;
            match r.status {
                ValidationStatus::Valid => s.valid += 1,
                ValidationStatus::Invalid => s.invalid += 1,
                ValidationStatus::Error => s.errors += 1,
            }
            s
        })
    }

    pub fn all_valid(&self) -> bool {
        self.valid == self.total
    }
}

/// Why a collection produced no documents to validate
#[derive(Debug)]
enum FetchFailure {
    Unsupported(String),
    Raised(FetchError),
    NoData,
    NotAList,
}

impl FetchFailure {
    fn message(&self) -> String {
        match self {
            FetchFailure::Unsupported(name) => format!("Unsupported collection: {}", name),
            FetchFailure::Raised(e) => e.to_string(),
            FetchFailure::NoData => "No data found".to_string(),
            FetchFailure::NotAList => {
                "Invalid data format: expected an array of documents".to_string()
            }
        }
    }
}

/// Runs the fetch-then-validate pipeline for one collection at a time.
///
/// Holds no mutable state; concurrent calls are independent.
pub struct CollectionValidator<F, S = TracingSink> {
    fetcher: F,
    sink: S,
    recognized: RecognizedCollections,
}

impl<F: DocumentFetcher> CollectionValidator<F, TracingSink> {
    /// Validator reporting through `tracing` over every supported collection
    pub fn with_tracing(fetcher: F) -> Self {
        Self::new(fetcher, TracingSink, RecognizedCollections::all())
    }
}

impl<F: DocumentFetcher, S: ReportingSink> CollectionValidator<F, S> {
    pub fn new(fetcher: F, sink: S, recognized: RecognizedCollections) -> Self {
        Self {
            fetcher,
            sink,
            recognized,
        }
    }

    pub fn recognized(&self) -> &RecognizedCollections {
        &self.recognized
    }

    /// Validate every document of `name` against `schema`.
    ///
    /// Returns one result per fetched document in input order, or exactly one
    /// `error` result when the documents could not be obtained.
    pub async fn validate_collection_data(
        &self,
        name: &str,
        schema: &dyn DocumentSchema,
    ) -> Vec<ValidationResult> {
        self.sink
            .info(&format!("Starting validation for collection: {}", name), None);

        let documents = match self.fetch(name).await {
            Ok(documents) => documents,
            Err(failure) => {
                let reason = failure.message();
                self.sink.error(
                    &format!("Failed to fetch data for collection: {}", name),
                    Some(&json!({ "collection": name, "error": reason })),
                );
                return vec![ValidationResult::fetch_failed(reason)];
            }
        };

        self.sink.info(
            &format!("Fetched {} documents from {}", documents.len(), name),
            Some(&json!({ "collection": name, "count": documents.len() })),
        );

        let results: Vec<ValidationResult> = documents
            .iter()
            .map(|document| self.validate_document(document, schema))
            .collect();

        let summary = ValidationSummary::from_results(&results);
        self.sink.info(
            &format!("Validation completed for collection: {}", name),
            Some(&json!({ "collection": name, "summary": summary })),
        );

        results
    }

    /// Validate `name` against the schema the registry holds for it
    pub async fn validate_collection(
        &self,
        name: &str,
        registry: &SchemaRegistry,
    ) -> Result<Vec<ValidationResult>> {
        let schema = registry
            .get_schema_for_collection(name)
            .ok_or_else(|| SchemaError::UnknownCollection(name.to_string()))?;
        Ok(self.validate_collection_data(name, schema.as_ref()).await)
    }

    async fn fetch(&self, name: &str) -> std::result::Result<Vec<Value>, FetchFailure> {
        let collection = self
            .recognized
            .resolve(name)
            .ok_or_else(|| FetchFailure::Unsupported(name.to_string()))?;

        match fetch_collection(&self.fetcher, collection).await {
            Ok(Value::Array(documents)) => Ok(documents),
            Ok(Value::Null) => Err(FetchFailure::NoData),
            Ok(_) => Err(FetchFailure::NotAList),
            Err(e) => Err(FetchFailure::Raised(e)),
        }
    }

    fn validate_document(&self, document: &Value, schema: &dyn DocumentSchema) -> ValidationResult {
        let id = document_id(document);
        let violations = schema.validate(document);

        if violations.is_empty() {
            return ValidationResult::valid(id);
        }

        self.sink.warn(
            &format!("Validation failed for document {}", id),
            Some(&json!({ "id": id, "errors": violations })),
        );
        ValidationResult::invalid(id, violations)
    }
}

fn document_id(document: &Value) -> String {
    match document.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => UNKNOWN_DOCUMENT_ID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id() {
        assert_eq!(document_id(&json!({"id": "abc"})), "abc");
        assert_eq!(document_id(&json!({"id": 42})), "42");
        assert_eq!(document_id(&json!({"id": null})), UNKNOWN_DOCUMENT_ID);
        assert_eq!(document_id(&json!([1, 2])), UNKNOWN_DOCUMENT_ID);
    }

    #[test]
    fn test_result_serialization_shape() {
        let valid = serde_json::to_value(ValidationResult::valid("1")).unwrap();
        assert_eq!(valid, json!({"id": "1", "status": "valid"}));

        let failed = serde_json::to_value(ValidationResult::fetch_failed("boom")).unwrap();
        assert_eq!(failed, json!({"id": "fetch-error", "status": "error", "fetchError": "boom"}));

        let invalid = serde_json::to_value(ValidationResult::invalid(
            "2",
            vec![FieldError::new("age", "too young")],
        ))
        .unwrap();
        assert_eq!(
            invalid,
            json!({"id": "2", "status": "invalid", "errors": [{"field": "age", "message": "too young"}]})
        );
    }

    #[test]
    fn test_summary() {
        let results = vec![
            ValidationResult::valid("1"),
            ValidationResult::invalid("2", vec![FieldError::new("x", "y")]),
            ValidationResult::valid("3"),
        ];
        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary, ValidationSummary { total: 3, valid: 2, invalid: 1, errors: 0 });
        assert!(!summary.all_valid());
    }
}
