//! `ficon get`: resolve a favicon through the cache and write it to a file.

use anyhow::{Context, Result};
use ficon_core::config::FiconConfig;
use ficon_core::service::FaviconService;
use ficon_core::store::BlobStore;
use ficon_core::url_model::{icon_filename, Target};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub async fn run_get(
    cfg: &FiconConfig,
    blobs: Arc<dyn BlobStore>,
    url: &str,
    from_html: bool,
    output: Option<&Path>,
) -> Result<()> {
    let target = Target::parse(url)?;
    let service = FaviconService::from_config(cfg, blobs);
    let served = service.serve(&target, from_html).await?;

    let source = served.response.header("X-Icon-URL").unwrap_or_default();
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(icon_filename(source)));
    std::fs::write(&path, &served.response.body)
        .with_context(|| format!("write {}", path.display()))?;

    println!(
        "{} {} ({} bytes, {}) -> {}",
        served.status.as_str(),
        source,
        served.response.body.len(),
        served.response.header("Content-Type").unwrap_or("-"),
        path.display()
    );

    // The process exits after this command, so a refresh started for a stale
    // entry is awaited here instead of being detached.
    if let Some(refresh) = served.refresh {
        if let Err(e) = refresh.await {
            tracing::warn!("background refresh task failed: {e}");
        }
    }
    Ok(())
}
