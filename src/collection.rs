//! Document collections of the booking platform

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A logical group of documents in the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Accounts of every role (patient, doctor, admin)
    Users,
    /// Patient profiles
    Patients,
    /// Doctor profiles and verification state
    Doctors,
    /// Booked consultations
    Appointments,
    /// In-app notifications
    Notifications,
}

impl Collection {
    /// Every collection the crate knows how to fetch and validate
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Patients,
        Collection::Doctors,
        Collection::Appointments,
        Collection::Notifications,
    ];

    /// Collection name as stored in the data store
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Patients => "patients",
            Collection::Doctors => "doctors",
            Collection::Appointments => "appointments",
            Collection::Notifications => "notifications",
        }
    }

    /// File name of the schema definition for this collection
    pub fn schema_file(&self) -> String {
        format!("{}.schema.json", self.as_str())
    }

    /// File name of the document dump for this collection
    pub fn data_file(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownCollection(s.to_string()))
    }
}

/// Immutable set of collections a registry or validator accepts.
///
/// Injected at construction so tests can narrow the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedCollections(BTreeSet<Collection>);

impl RecognizedCollections {
    /// All supported collections
    pub fn all() -> Self {
        Self(Collection::ALL.into_iter().collect())
    }

    pub fn new(collections: impl IntoIterator<Item = Collection>) -> Self {
        Self(collections.into_iter().collect())
    }

    /// Build from configured names, rejecting unknown ones
    pub fn from_names<I, S>(names: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| n.as_ref().parse::<Collection>())
            .collect::<crate::Result<BTreeSet<_>>>()
            .map(Self)
    }

    /// Resolve a name to a collection in this set
    pub fn resolve(&self, name: &str) -> Option<Collection> {
        name.parse::<Collection>()
            .ok()
            .filter(|c| self.0.contains(c))
    }

    pub fn contains(&self, collection: Collection) -> bool {
        self.0.contains(&collection)
    }

    pub fn iter(&self) -> impl Iterator<Item = Collection> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RecognizedCollections {
    fn default() -> Self {
        Self::all()
    }
}
