//! Configuration for the collection validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (booking-schemas.toml)
//! - Environment variables (BOOKING_SCHEMAS__*)
//!
//! ## Example config file (booking-schemas.toml):
//! ```toml
//! [collections]
//! recognized = ["users", "patients", "doctors", "appointments", "notifications"]
//!
//! [registry]
//! schema_dir = "./schemas"
//!
//! [source]
//! data_dir = "./export"
//!
//! [report]
//! output_format = "json"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collection::{Collection, RecognizedCollections};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub collections: CollectionsConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Which collections may be looked up and validated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_recognized")]
    pub recognized: Vec<String>,
}

/// Schema registry settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory of `<collection>.schema.json` overrides; builtins otherwise
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
}

/// Where exported collection documents are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Print valid documents too, not only failures
    #[serde(default)]
    pub show_valid: bool,
}

/// Output format for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_recognized() -> Vec<String> {
    Collection::ALL.iter().map(|c| c.as_str().to_string()).collect()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            recognized: default_recognized(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering `config_path` over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "booking-schemas.toml",
            ".booking-schemas.toml",
            "config/booking-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "booking", "booking-schemas") {
            let xdg_config = config_dir.config_dir().join("booking-schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BOOKING_SCHEMAS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("collections.recognized")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// The configured collection set
    pub fn recognized_collections(&self) -> crate::Result<RecognizedCollections> {
        RecognizedCollections::from_names(&self.collections.recognized)
    }
}
