//! HTTP surface. Every request assembles and compiles afresh inside its own
//! [`RequestScope`], on the blocking pool.

mod error;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ServerError;

use crate::{
    config::{SiteMeta, blog_path, post_path},
    content::ContentSource,
    feed,
    lookup::{RequestScope, find_by_slug_or_guid, get_body},
    render::{self, HIGHLIGHT_CSS_PATH},
    sitemap,
    transformer::code_block::highlight_css,
};

#[derive(Clone)]
pub struct AppState {
    source: Arc<ContentSource>,
    meta: Arc<SiteMeta>,
}

impl AppState {
    pub fn new(source: ContentSource, meta: SiteMeta) -> Self {
        Self {
            source: Arc::new(source),
            meta: Arc::new(meta),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent(&blog_path()) }))
        .route("/blog", get(listing))
        .route("/blog/rss.xml", get(rss))
        .route("/blog/{key}", get(post))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots))
        .route(HIGHLIGHT_CSS_PATH, get(stylesheet))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> color_eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "serving");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Run `work` on the blocking pool with a fresh scope.
async fn with_scope<T, F>(state: &AppState, work: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce(&RequestScope<'_>, &SiteMeta) -> Result<T, ServerError> + Send + 'static,
{
    let source = Arc::clone(&state.source);
    let meta = Arc::clone(&state.meta);
    tokio::task::spawn_blocking(move || {
        let scope = RequestScope::new(&source);
        work(&scope, &meta)
    })
    .await?
}

async fn listing(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    with_scope(&state, |scope, meta| {
        Ok(Html(render::listing_page(scope.heads()?, meta)))
    })
    .await
}

async fn post(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ServerError> {
    with_scope(&state, move |scope, meta| {
        let head = find_by_slug_or_guid(scope, &key)?
            .ok_or_else(|| ServerError::NotFound(key.clone()))?;

        // Guid links resolve to the canonical slug URL.
        if head.slug != key {
            return Ok(Redirect::permanent(&post_path(&head.slug)).into_response());
        }

        let body = get_body(scope, &head)?;
        Ok(Html(render::post_page(&head, &body, meta)).into_response())
    })
    .await
}

async fn rss(State(state): State<AppState>) -> Result<Response, ServerError> {
    with_scope(&state, |scope, meta| {
        let xml = feed::rss(scope.heads()?, meta);
        Ok(([(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")], xml).into_response())
    })
    .await
}

async fn sitemap_xml(State(state): State<AppState>) -> Result<Response, ServerError> {
    with_scope(&state, |scope, meta| {
        let today = OffsetDateTime::now_utc().date();
        let xml = sitemap::sitemap_xml(scope.heads()?, meta, today);
        Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response())
    })
    .await
}

async fn robots(State(state): State<AppState>) -> String {
    sitemap::robots_txt(&state.meta)
}

async fn stylesheet() -> Response {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], highlight_css()).into_response()
}

#[cfg(test)]
mod tests;
