//! Wheelhouse CLI binary
//!
//! `wheelhouse serve` scans the pip wheel cache once and serves it as a
//! PEP 503 simple index; `wheelhouse inspect` decodes a single legacy
//! HTTP-cache entry for debugging.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use wheelhouse::envelope::{self, EnvelopeOutcome};
use wheelhouse::{config, run_server};

#[derive(Parser)]
#[command(name = "wheelhouse")]
#[command(about = "Serve the local pip wheel cache as a PEP 503 simple index")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the index server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Pip cache directory (defaults to $PIP_CACHE_DIR, then the
        /// platform cache directory)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Decode a legacy HTTP-cache entry file and print a summary
    Inspect {
        /// Path to one cache entry file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            cache_dir,
        } => {
            let cache_root = config::resolve_cache_root(cache_dir);
            run_server(host, port, cache_root).await
        }

        Commands::Inspect { file } => inspect(&file),
    }
}

fn inspect(file: &Path) -> Result<()> {
    match envelope::inspect_envelope(file)? {
        EnvelopeOutcome::Parsed(response) => {
            println!("Decoded cache entry: {}", file.display());
            if let Some(status) = response.status {
                println!("  status: {} {}", status, response.reason.unwrap_or_default());
            }
            println!("  headers: {}", response.headers.len());
            for (name, value) in &response.headers {
                println!("    {name}: {value}");
            }
            println!("  body: {} byte(s)", response.body.len());
        }
        EnvelopeOutcome::Skip => {
            println!("{}: not a decodable cache envelope", file.display());
        }
        EnvelopeOutcome::UnsupportedVersion(version) => {
            println!("{}: unsupported envelope version {}", file.display(), version);
        }
    }
    Ok(())
}
