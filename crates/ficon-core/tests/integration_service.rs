//! Integration test: cache-fronted service over a local site.

mod common;

use common::site_server::{self, Route};
use ficon_core::config::FiconConfig;
use ficon_core::service::{FaviconService, Freshness};
use ficon_core::store::{BlobStore, CacheStatus, MemoryBlobStore, SqliteBlobStore};
use ficon_core::url_model::Target;
use std::sync::Arc;
use std::time::Duration;

fn config(ttl_secs: u64) -> FiconConfig {
    FiconConfig {
        cache_ttl_secs: ttl_secs,
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
        ..FiconConfig::default()
    }
}

#[tokio::test]
async fn miss_then_hit_from_cache() {
    let site = site_server::start(vec![("/favicon.ico", Route::image("image/x-icon", b"ICO"))]);
    let blobs = Arc::new(MemoryBlobStore::new());
    let svc = FaviconService::from_config(&config(3600), blobs.clone());
    let target = Target::parse(&site.url("/some/page")).unwrap();

    let first = svc.serve(&target, false).await.unwrap();
    assert_eq!(first.status, CacheStatus::Miss);
    assert_eq!(first.response.status, 200);
    assert_eq!(first.response.body, b"ICO");
    assert_eq!(first.response.header("Content-Type"), Some("image/x-icon"));
    assert_eq!(
        first.response.header("Content-Disposition"),
        Some("inline; filename=favicon.ico")
    );
    assert_eq!(
        first.response.header("Cache-Control"),
        Some("public, max-age=3600, immutable")
    );
    assert_eq!(first.response.header("X-Cache-Status"), Some("MISS"));
    let icon_url = site.url("/favicon.ico");
    assert_eq!(first.response.header("X-Icon-URL"), Some(icon_url.as_str()));

    assert!(blobs.get(&site.host).await.unwrap().is_some());
    assert_eq!(blobs.len().await, 1);

    let second = svc.serve(&target, false).await.unwrap();
    assert_eq!(second.status, CacheStatus::Hit);
    assert_eq!(second.response.body, b"ICO");
    assert_eq!(site.paths(), vec!["/favicon.ico"], "hit must not touch the network");
}

#[tokio::test]
async fn stale_entry_is_served_then_refreshed() {
    let site = site_server::start(vec![("/favicon.ico", Route::image("image/png", b"v1"))]);
    let svc = FaviconService::from_config(&config(0), Arc::new(MemoryBlobStore::new()));
    let target = Target::parse(&site.base).unwrap();

    let first = svc.serve(&target, false).await.unwrap();
    assert_eq!(first.status, CacheStatus::Miss);

    site.set_route("/favicon.ico", Route::image("image/png", b"v2"));
    let stale = svc.serve(&target, false).await.unwrap();
    assert_eq!(stale.status, CacheStatus::Stale);
    assert_eq!(stale.response.body, b"v1");

    let refresh = stale.refresh.expect("stale serve starts a refresh");
    tokio::time::timeout(Duration::from_secs(30), refresh)
        .await
        .expect("refresh finishes")
        .expect("refresh task does not panic");

    let (entry, freshness) = svc.inspect(&site.host).await.unwrap();
    assert_eq!(entry.unwrap().bytes, b"v2");
    assert_eq!(freshness, Freshness::Stale, "zero ttl expires immediately");
}

#[tokio::test]
async fn respond_reports_not_found_as_text() {
    let site = site_server::start(vec![("/", Route::html("<html></html>"))]);
    let svc = FaviconService::from_config(&config(3600), Arc::new(MemoryBlobStore::new()));

    let res = svc.respond(&site.base, true).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.header("Content-Type"), Some("text/plain; charset=utf-8"));
    let body = String::from_utf8(res.body).unwrap();
    assert_eq!(body, format!("Favicon not found! Tried URLs:\n- {}", site.base));
}

#[tokio::test]
async fn respond_reports_page_failure_as_500() {
    let site = site_server::start(vec![("/", Route::new(502, "Bad Gateway"))]);
    let svc = FaviconService::from_config(&config(3600), Arc::new(MemoryBlobStore::new()));

    let res = svc.respond(&site.base, true).await;
    assert_eq!(res.status, 500);
    assert_eq!(res.body, b"Failed to fetch page: 502 Bad Gateway");
}

#[tokio::test]
async fn sqlite_store_survives_reopen() {
    let site = site_server::start(vec![("/favicon.png", Route::image("image/png", b"PNG"))]);
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("icons.db");
    let target = Target::parse(&site.base).unwrap();

    {
        let store = Arc::new(SqliteBlobStore::open_at(&db).await.unwrap());
        let svc = FaviconService::from_config(&config(3600), store);
        let served = svc.serve(&target, false).await.unwrap();
        assert_eq!(served.status, CacheStatus::Miss);
    }

    let store = Arc::new(SqliteBlobStore::open_at(&db).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 1);
    let svc = FaviconService::from_config(&config(3600), store);
    let served = svc.serve(&target, false).await.unwrap();
    assert_eq!(served.status, CacheStatus::Hit);
    assert_eq!(served.response.body, b"PNG");
    let icon_url = site.url("/favicon.png");
    assert_eq!(served.response.header("X-Icon-URL"), Some(icon_url.as_str()));
}
