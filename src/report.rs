//! Reporting
//!
//! Severity-levelled notifications emitted by the validator at each phase
//! (fire-and-forget), and the JSON report of a multi-collection run.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::fetcher::DocumentFetcher;
use crate::registry::SchemaRegistry;
use crate::validator::{CollectionValidator, ValidationResult, ValidationSummary};

/// Receiver of validation progress notifications
pub trait ReportingSink: Send + Sync {
    /// Phase transitions: start, fetched count, completion
    fn info(&self, message: &str, data: Option<&Value>);
    /// A document failed its schema
    fn warn(&self, message: &str, data: Option<&Value>);
    /// The collection's documents could not be obtained
    fn error(&self, message: &str, data: Option<&Value>);
}

/// Forwards notifications to `tracing` with the payload as a `data` field
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportingSink for TracingSink {
    fn info(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::info!(data = %data, "{}", message),
            None => tracing::info!("{}", message),
        }
    }

    fn warn(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::warn!(data = %data, "{}", message),
            None => tracing::warn!("{}", message),
        }
    }

    fn error(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::error!(data = %data, "{}", message),
            None => tracing::error!("{}", message),
        }
    }
}

impl<S: ReportingSink + ?Sized> ReportingSink for &S {
    fn info(&self, message: &str, data: Option<&Value>) {
        (**self).info(message, data)
    }

    fn warn(&self, message: &str, data: Option<&Value>) {
        (**self).warn(message, data)
    }

    fn error(&self, message: &str, data: Option<&Value>) {
        (**self).error(message, data)
    }
}

impl<S: ReportingSink + ?Sized> ReportingSink for Arc<S> {
    fn info(&self, message: &str, data: Option<&Value>) {
        (**self).info(message, data)
    }

    fn warn(&self, message: &str, data: Option<&Value>) {
        (**self).warn(message, data)
    }

    fn error(&self, message: &str, data: Option<&Value>) {
        (**self).error(message, data)
    }
}

/// Results of one collection within a [`ValidationReport`]
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub summary: ValidationSummary,
    pub results: Vec<ValidationResult>,
}

/// Outcome of validating several collections from one data source
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub data_dir: String,
    pub collections: BTreeMap<String, CollectionReport>,
}

impl ValidationReport {
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            data_dir: data_dir.into(),
            collections: BTreeMap::new(),
        }
    }

    /// Record the results of one collection
    pub fn push(&mut self, name: impl Into<String>, results: Vec<ValidationResult>) {
        let summary = ValidationSummary::from_results(&results);
        self.collections
            .insert(name.into(), CollectionReport { summary, results });
    }

    /// Validate each of `names` in turn.
    ///
    /// Every name is checked against the registry before anything is
    /// fetched, so an unknown name fails the run without partial output.
    pub async fn collect<F, S>(
        validator: &CollectionValidator<F, S>,
        registry: &SchemaRegistry,
        names: &[String],
        data_dir: impl Into<String>,
    ) -> Result<Self>
    where
        F: DocumentFetcher,
        S: ReportingSink,
    {
        if let Some(unknown) = names.iter().find(|n| registry.entry(n).is_none()) {
            return Err(SchemaError::UnknownCollection(unknown.clone()));
        }

        let mut report = Self::new(data_dir);
        for name in names {
            let results = validator.validate_collection(name, registry).await?;
            report.push(name.as_str(), results);
        }
        Ok(report)
    }

    /// True when every result of every collection is `valid`
    pub fn all_valid(&self) -> bool {
        self.collections.values().all(|c| c.summary.all_valid())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
