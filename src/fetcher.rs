//! Fetcher Adapter
//!
//! The persistence access layer the validator reads documents from. Each
//! collection has its own fetch method; [`fetch_collection`] picks one by
//! collection so the supported set stays closed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::Collection;
use crate::error::FetchError;

/// Raw stored documents of one collection.
///
/// Implementations return the documents as a JSON array. `Value::Null`
/// signals that no data exists; any other shape is reported as unusable by
/// the validator. Timeouts and retries belong here, not in the validator.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Documents of the `users` collection
    async fn get_users(&self) -> Result<Value, FetchError>;
    /// Documents of the `patients` collection
    async fn get_patients(&self) -> Result<Value, FetchError>;
    /// Documents of the `doctors` collection
    async fn get_doctors(&self) -> Result<Value, FetchError>;
    /// Documents of the `appointments` collection
    async fn get_appointments(&self) -> Result<Value, FetchError>;
    /// Documents of the `notifications` collection
    async fn get_notifications(&self) -> Result<Value, FetchError>;
}

/// Fetch the documents of `collection` through the matching method
pub async fn fetch_collection<F>(fetcher: &F, collection: Collection) -> Result<Value, FetchError>
where
    F: DocumentFetcher + ?Sized,
{
    match collection {
        Collection::Users => fetcher.get_users().await,
        Collection::Patients => fetcher.get_patients().await,
        Collection::Doctors => fetcher.get_doctors().await,
        Collection::Appointments => fetcher.get_appointments().await,
        Collection::Notifications => fetcher.get_notifications().await,
    }
}

/// Reads exported collections from `<data_dir>/<collection>.json`
#[derive(Debug, Clone)]
pub struct JsonFileFetcher {
    data_dir: PathBuf,
}

impl JsonFileFetcher {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read(&self, collection: Collection) -> Result<Value, FetchError> {
        let path = self.data_dir.join(collection.data_file());
        let shown = path.display().to_string();

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %shown, "no export for collection");
                return Ok(Value::Null);
            }
            Err(source) => return Err(FetchError::Io { path: shown, source }),
        };

        serde_json::from_str(&content).map_err(|source| FetchError::Json { path: shown, source })
    }
}

#[async_trait]
impl DocumentFetcher for JsonFileFetcher {
    async fn get_users(&self) -> Result<Value, FetchError> {
        self.read(Collection::Users).await
    }

    async fn get_patients(&self) -> Result<Value, FetchError> {
        self.read(Collection::Patients).await
    }

    async fn get_doctors(&self) -> Result<Value, FetchError> {
        self.read(Collection::Doctors).await
    }

    async fn get_appointments(&self) -> Result<Value, FetchError> {
        self.read(Collection::Appointments).await
    }

    async fn get_notifications(&self) -> Result<Value, FetchError> {
        self.read(Collection::Notifications).await
    }
}
