//! `ficon show`: print the cached entry for a host.

use anyhow::Result;
use ficon_core::config::FiconConfig;
use ficon_core::service::FaviconService;
use ficon_core::store::BlobStore;
use std::sync::Arc;

pub async fn run_show(cfg: &FiconConfig, blobs: Arc<dyn BlobStore>, host: &str) -> Result<()> {
    let service = FaviconService::from_config(cfg, blobs);
    let (entry, freshness) = service.inspect(host).await?;
    let Some(entry) = entry else {
        println!("No cached favicon for {host}.");
        return Ok(());
    };

    println!("{:<14} {}", "HOST", host);
    println!("{:<14} {}", "STATE", freshness.as_str());
    println!("{:<14} {}", "SOURCE", entry.original_url);
    println!(
        "{:<14} {}",
        "CONTENT-TYPE",
        entry.content_type.as_deref().unwrap_or("-")
    );
    println!("{:<14} {}", "SIZE", entry.bytes.len());
    println!("{:<14} {}", "EXPIRES", entry.expire_timestamp);
    Ok(())
}
