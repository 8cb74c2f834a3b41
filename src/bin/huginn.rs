//! huginn: email analysis CLI.
//!
//! Analyzes one email with the stored backend configuration and prints the
//! result as JSON. Also manages that configuration and the analysis cache.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use huginn::settings::{Settings, with_env_credential};
use huginn::store::{read_backend_config, require_hosted_credential};
use huginn::{AnalysisRequest, BackendConfig};

/// Huginn email analysis CLI
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Summarize, classify and draft replies for emails")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "HUGINN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one email
    Analyze {
        /// Email subject
        #[arg(short, long)]
        subject: String,
        /// Email body
        #[arg(short, long, conflicts_with = "body_file")]
        body: Option<String>,
        /// Read the body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
    },

    /// Inspect or change the stored backend configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the analysis cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the stored configuration (credential masked)
    Show,

    /// Replace the stored configuration
    Set {
        /// Provider: local, opensource or openai
        #[arg(short, long)]
        provider: String,
        /// API credential (hosted provider)
        #[arg(long)]
        credential: Option<String>,
        /// Endpoint URL (open backend generate URL, or hosted base URL)
        #[arg(long)]
        endpoint: Option<String>,
        /// Model name
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop every cached analysis result
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    info!(
        version = huginn::PKG_VERSION,
        store = %settings.storage.resolved_path().display(),
        "huginn starting"
    );

    let analyzer = settings.analyzer_builder().build().await?;

    match args.command {
        Command::Analyze {
            subject,
            body,
            body_file,
        } => {
            let body = match (body, body_file) {
                (Some(body), _) => body,
                (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
                (None, None) => String::new(),
            };
            let request = AnalysisRequest::new(subject, body);
            let stored = read_backend_config(analyzer.store().as_ref()).await;
            let config = require_hosted_credential(with_env_credential(stored));
            let result = analyzer.analyze(&request, &config).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Config { action } => match action {
            ConfigAction::Show => {
                let config = read_backend_config(analyzer.store().as_ref()).await;
                println!("{}", serde_json::to_string_pretty(&masked(config))?);
            }
            ConfigAction::Set {
                provider,
                credential,
                endpoint,
                model,
            } => {
                let config = BackendConfig {
                    provider,
                    credential,
                    endpoint,
                    model_name: model,
                };
                if config.kind().is_none() {
                    eprintln!(
                        "warning: unknown provider {:?}, analysis will use local",
                        config.provider
                    );
                }
                analyzer.save_config(&config).await?;
                println!("{}", serde_json::to_string_pretty(&masked(config))?);
            }
        },

        Command::Cache {
            action: CacheAction::Clear,
        } => {
            let entries = analyzer.cache().len().await;
            analyzer.clear_cache().await;
            println!("Cleared {entries} cached entries");
        }
    }

    Ok(())
}

fn masked(mut config: BackendConfig) -> BackendConfig {
    if config.credential.is_some() {
        config.credential = Some("***".to_string());
    }
    config
}
