//! HTTP adapter: maps `GET /?url=...&from_html` onto the favicon service.

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use ficon_core::service::FaviconService;
use ficon_core::store::ClientResponse;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    service: FaviconService,
    info_url: Arc<str>,
}

/// Query parameters of the icon endpoint. `from_html` is a presence flag.
#[derive(Debug, Default, Deserialize)]
pub struct IconQuery {
    url: Option<String>,
    from_html: Option<String>,
}

pub fn router(service: FaviconService, info_url: String) -> Router {
    let state = AppState {
        service,
        info_url: Arc::from(info_url),
    };
    Router::new()
        .route("/", get(favicon))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(service: FaviconService, info_url: String, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local = listener.local_addr()?;
    tracing::info!(%local, "ficon listening");
    println!("ficon listening on http://{local}/ (Ctrl+C to stop)");

    axum::serve(listener, router(service, info_url))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;
    tracing::info!("ficon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn favicon(State(state): State<AppState>, Query(query): Query<IconQuery>) -> Response {
    let from_html = query.from_html.is_some();
    let Some(url) = query.url.filter(|u| !u.is_empty()) else {
        return (StatusCode::FOUND, [(header::LOCATION, state.info_url.to_string())])
            .into_response();
    };
    into_axum(state.service.respond(&url, from_html).await)
}

fn into_axum(res: ClientResponse) -> Response {
    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, res.body).into_response();
    let headers = response.headers_mut();
    for (name, value) in res.headers {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = name, "dropping header with invalid value"),
        }
    }
    response
}
