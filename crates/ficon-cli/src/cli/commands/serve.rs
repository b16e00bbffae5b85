//! `ficon serve`: run the HTTP endpoint until Ctrl+C.

use anyhow::Result;
use ficon_core::config::FiconConfig;
use ficon_core::service::FaviconService;
use ficon_core::store::BlobStore;
use std::sync::Arc;

use crate::server;

pub async fn run_serve(cfg: &FiconConfig, blobs: Arc<dyn BlobStore>, addr: &str) -> Result<()> {
    let service = FaviconService::from_config(cfg, blobs);
    server::serve(service, cfg.info_url.clone(), addr).await
}
