//! Collection Validator CLI
//!
//! Validates exported collection documents against the registered schemas.

use std::path::PathBuf;

use anyhow::{bail, Context};
use booking_schemas::{
    CollectionReport, CollectionValidator, JsonFileFetcher, OutputFormat, SchemaError,
    SchemaRegistry, ValidationReport, ValidationStatus, ValidatorConfig,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collection-validator")]
#[command(about = "Validate booking platform collections against their schemas")]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more collections
    Validate {
        /// Collections to validate (default: every recognized collection)
        collections: Vec<String>,

        /// Directory holding <collection>.json exports
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory holding <collection>.schema.json overrides
        #[arg(short, long)]
        schemas: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List recognized collections and their schema checksums
    Schemas {
        #[arg(short, long)]
        schemas: Option<PathBuf>,
    },

    /// Print the schema of one collection
    Show {
        collection: String,

        #[arg(short, long)]
        schemas: Option<PathBuf>,
    },

    /// Inspect or write configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        #[arg(default_value = "booking-schemas.toml")]
        path: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when validation found problems
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config =
        ValidatorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Validate {
            collections,
            data_dir,
            schemas,
            format,
            output,
        } => {
            let registry = open_registry(&config, schemas)?;
            let data_dir = data_dir.unwrap_or_else(|| config.source.data_dir.clone());
            let format = format.unwrap_or(config.report.output_format);

            let names: Vec<String> = if collections.is_empty() {
                registry.collections().map(|c| c.to_string()).collect()
            } else {
                collections
            };

            let validator = CollectionValidator::new(
                JsonFileFetcher::new(&data_dir),
                booking_schemas::TracingSink,
                registry.recognized().clone(),
            );

            let report = match ValidationReport::collect(
                &validator,
                &registry,
                &names,
                data_dir.display().to_string(),
            )
            .await
            {
                Ok(report) => report,
                Err(SchemaError::UnknownCollection(name)) => {
                    bail!("{}", registry.unknown_collection_message(&name))
                }
                Err(e) => return Err(e.into()),
            };

            match format {
                OutputFormat::Text => {
                    for (name, collection) in &report.collections {
                        print_text(name, collection, config.report.show_valid);
                    }
                }
                OutputFormat::Json => println!("{}", report.to_json_pretty()?),
            }

            if let Some(path) = output {
                std::fs::write(&path, report.to_json_pretty()?)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                eprintln!("✅ Report written to {:?}", path);
            }

            Ok(report.all_valid())
        }

        Commands::Schemas { schemas } => {
            let registry = open_registry(&config, schemas)?;
            for collection in registry.collections() {
                if let Some(entry) = registry.entry(collection.as_str()) {
                    let checksum = entry.checksum.short();
                    println!("{:<15} {}  ({})", collection, checksum, entry.source);
                }
            }
            Ok(true)
        }

        Commands::Show { collection, schemas } => {
            let registry = open_registry(&config, schemas)?;
            let Some(entry) = registry.entry(&collection) else {
                bail!("{}", registry.unknown_collection_message(&collection));
            };
            println!("{}", serde_json::to_string_pretty(entry.schema.definition())?);
            Ok(true)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(true)
            }
            ConfigAction::Init { path } => {
                if std::path::Path::new(&path).exists() {
                    bail!("{} already exists", path);
                }
                ValidatorConfig::default().save(&path)?;
                println!("✅ Wrote {}", path);
                Ok(true)
            }
        },
    }
}

fn open_registry(
    config: &ValidatorConfig,
    schemas: Option<PathBuf>,
) -> anyhow::Result<SchemaRegistry> {
    let recognized = config.recognized_collections()?;
    let registry = match schemas.or_else(|| config.registry.schema_dir.clone()) {
        Some(dir) => SchemaRegistry::from_directory(&dir, recognized)
            .with_context(|| format!("loading schemas from {}", dir.display()))?,
        None => SchemaRegistry::builtin(recognized)?,
    };
    Ok(registry)
}

fn print_text(name: &str, collection: &CollectionReport, show_valid: bool) {
    let summary = &collection.summary;
    println!("🔍 {}", name);

    for result in &collection.results {
        match result.status {
            ValidationStatus::Valid => {
                if show_valid {
                    println!("  ✅ {}", result.id);
                }
            }
            ValidationStatus::Invalid => {
                println!("  ❌ {}", result.id);
                for error in result.errors.iter().flatten() {
                    println!("     └─ {}: {}", error.field, error.message);
                }
            }
            ValidationStatus::Error => {
                let reason = result.fetch_error.as_deref().unwrap_or("fetch failed");
                println!("  ⚠️  {}", reason);
            }
        }
    }

    println!(
        "  {} total, {} valid, {} invalid, {} errors\n",
        summary.total, summary.valid, summary.invalid, summary.errors
    );
}
