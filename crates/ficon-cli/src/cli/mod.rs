//! CLI for the ficon favicon service.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ficon_core::config::{self, FiconConfig};
use ficon_core::store::{BlobStore, MemoryBlobStore, SqliteBlobStore};
use std::path::PathBuf;
use std::sync::Arc;

use commands::{run_config_path, run_get, run_serve, run_show};

/// Top-level CLI for ficon.
#[derive(Debug, Parser)]
#[command(name = "ficon")]
#[command(about = "ficon: favicon resolver with a persistent cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve `GET /?url=...` over HTTP.
    Serve {
        /// Bind address, overriding `listen_addr` from the config file.
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
        /// Keep the cache in memory only; nothing is written to disk.
        #[arg(long)]
        ephemeral: bool,
    },

    /// Resolve the favicon for a URL through the cache and write it out.
    Get {
        /// Absolute HTTP/HTTPS URL of the site.
        url: String,
        /// Skip the well-known paths and only follow the page's icon link.
        #[arg(long)]
        from_html: bool,
        /// Output file (default: the icon's own file name in the current directory).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the cached entry for a host (e.g. `example.com` or `localhost:8080`).
    Show {
        host: String,
    },

    /// Print the path of the configuration file.
    ConfigPath,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::ConfigPath = cli.command {
            return run_config_path();
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { listen, ephemeral } => {
                let blobs = open_store(&cfg, ephemeral).await?;
                let addr = listen.unwrap_or_else(|| cfg.listen_addr.clone());
                run_serve(&cfg, blobs, &addr).await?;
            }
            CliCommand::Get {
                url,
                from_html,
                output,
            } => {
                let blobs = open_store(&cfg, false).await?;
                run_get(&cfg, blobs, &url, from_html, output.as_deref()).await?;
            }
            CliCommand::Show { host } => {
                let blobs = open_store(&cfg, false).await?;
                run_show(&cfg, blobs, &host).await?;
            }
            CliCommand::ConfigPath => run_config_path()?,
        }

        Ok(())
    }
}

/// SQLite store at the configured (or default) path, or an in-memory store.
async fn open_store(cfg: &FiconConfig, ephemeral: bool) -> Result<Arc<dyn BlobStore>> {
    if ephemeral {
        tracing::info!("using in-memory cache");
        return Ok(Arc::new(MemoryBlobStore::new()));
    }
    let store = match &cfg.database_path {
        Some(path) => SqliteBlobStore::open_at(path)
            .await
            .with_context(|| format!("open cache database {}", path.display()))?,
        None => SqliteBlobStore::open_default()
            .await
            .context("open default cache database")?,
    };
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests;
