// Command-line entry point: one-shot extraction or HTTP server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use job_extract::{ExtractorConfig, JobExtractor, server::build_app};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "job-extract", version, about = "Extract job postings from email text")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract from a file (or stdin) and print JSON
    Extract {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Skip the remote AI service
        #[arg(long)]
        local: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Serve POST /extract-text
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,job_extract=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ExtractorConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Extract {
            file,
            local,
            pretty,
        } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };

            let config = if local {
                ExtractorConfig {
                    ai_service_url: None,
                    ..config
                }
            } else {
                config
            };
            let extractor = JobExtractor::new(&config).context("Failed to build extractor")?;
            let result = extractor.extract_job_info(&text).await?;

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
        }
        Command::Serve { host, port } => {
            let extractor = JobExtractor::new(&config).context("Failed to build extractor")?;
            let app = build_app(extractor);

            let addr = format!("{host}:{port}");
            tracing::info!("Starting server on {}", addr);
            tracing::info!("Health check: http://localhost:{}/health", port);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .context("Failed to bind to address")?;

            axum::serve(listener, app).await.context("Server error")?;
        }
    }

    Ok(())
}
