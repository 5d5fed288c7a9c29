//! sheet-sql: generate SQL from spreadsheet rows

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheet_sql_sdk::cli::commands::{configs, generate, generic, records};
use sheet_sql_sdk::config::AppConfig;
use sheet_sql_sdk::export::SqlGenerator;
use sheet_sql_sdk::models::{GenericOptions, OperationType};
use sheet_sql_sdk::storage::FileSystemStorageBackend;
use sheet_sql_sdk::store::{ConfigStore, WorkRecordStore};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sheet-sql")]
#[command(author, version, about = "Generate SQL statements from spreadsheet rows", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the configuration file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate statements from a mapping request (JSON file, or - for stdin)
    Generate {
        #[arg(long)]
        request: String,
    },

    /// Generate statements straight from row objects
    Generic {
        /// JSON array of row objects (file, or - for stdin)
        #[arg(long)]
        data: String,

        /// INSERT, UPDATE or DELETE
        #[arg(long)]
        operation: String,

        #[arg(long)]
        table: String,

        /// Primary key column (repeatable)
        #[arg(long = "primary-key")]
        primary_keys: Vec<String>,

        /// One statement per row
        #[arg(long)]
        bulk: bool,
    },

    /// Manage saved work records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Manage saved connection and spreadsheet configs
    Configs {
        #[command(subcommand)]
        action: ConfigsAction,
    },
}

#[derive(Subcommand)]
enum RecordsAction {
    /// Save a new record from a JSON document
    Save {
        #[arg(long)]
        input: String,
    },

    /// List records, newest first
    List,

    /// Show one record with its connection config
    Show { id: String },

    /// Delete a record
    Delete { id: String },

    /// Generate statements for one or more records
    Generate {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Print the JSON result instead of SQL text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigsAction {
    /// Save a spreadsheet config from a JSON document
    SaveExcel {
        #[arg(long)]
        input: String,
    },

    /// List saved configs
    List,

    /// Delete a config
    Delete { name: String },

    /// Merge spreadsheet configs, printing JSON or statements for --table
    Merge {
        #[arg(required = true)]
        keys: Vec<String>,

        #[arg(long)]
        table: Option<String>,

        /// insert, update, upsert or delete
        #[arg(long, default_value = "insert")]
        operation: OperationType,
    },
}

/// Initialize logging to stderr
///
/// The log level can be controlled via the `RUST_LOG` environment variable
/// and defaults to `sheet_sql_sdk=info`.
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheet_sql_sdk=info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let output = match cli.command {
        Commands::Generate { request } => generate::handle_generate(&request, &config.generator)?,
        Commands::Generic {
            data,
            operation,
            table,
            primary_keys,
            bulk,
        } => {
            let options = GenericOptions::new(table)
                .with_primary_keys(primary_keys)
                .with_bulk(bulk);
            generic::handle_generic(&data, &operation, &options, &config.generator)?
        }
        Commands::Records { action } => {
            let backend = FileSystemStorageBackend::new(&config.data_dir);
            let store = WorkRecordStore::new(backend.clone());
            match action {
                RecordsAction::Save { input } => records::save(&store, &input).await?,
                RecordsAction::List => records::list(&store).await?,
                RecordsAction::Show { id } => {
                    records::show(&store, &ConfigStore::new(backend), &id).await?
                }
                RecordsAction::Delete { id } => records::delete(&store, &id).await?,
                RecordsAction::Generate { ids, json } => {
                    let generator = SqlGenerator::with_config(config.generator.clone());
                    records::generate(&store, &generator, &ids, json).await?
                }
            }
        }
        Commands::Configs { action } => {
            let store = ConfigStore::new(FileSystemStorageBackend::new(&config.data_dir));
            match action {
                ConfigsAction::SaveExcel { input } => configs::save_excel(&store, &input).await?,
                ConfigsAction::List => configs::list(&store).await?,
                ConfigsAction::Delete { name } => {
                    if store.delete(&name).await? {
                        format!("Deleted {}", name)
                    } else {
                        format!("No config named {}", name)
                    }
                }
                ConfigsAction::Merge {
                    keys,
                    table,
                    operation,
                } => {
                    let generator = SqlGenerator::with_config(config.generator.clone());
                    let target = table.as_deref().map(|t| (t, operation));
                    configs::merge(&store, &generator, &keys, target).await?
                }
            }
        }
    };

    println!("{}", output);
    Ok(())
}
