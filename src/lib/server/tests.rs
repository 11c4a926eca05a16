use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::{AppState, router};
use crate::{
    config::site_meta,
    test_support::{post_source, sample_site, source_for, write_post},
};

fn app(root: &std::path::Path) -> Router {
    router(AppState::new(source_for(root), site_meta()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn root_redirects_to_listing() {
    let site = sample_site();
    let (status, location, _) = get(app(site.path()), "/").await;
    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location.as_deref(), Some("/blog"));
}

#[tokio::test]
async fn listing_and_post_pages() {
    let site = sample_site();

    let (status, _, body) = get(app(site.path()), "/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/blog/2024-01-10-example"));

    let (status, _, body) = get(app(site.path()), "/blog/2024-01-10-example").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1 id=\"example\">Example</h1>"));
}

#[tokio::test]
async fn guid_redirects_to_slug() {
    let site = sample_site();
    let (status, location, _) = get(app(site.path()), "/blog/g1").await;
    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location.as_deref(), Some("/blog/2024-01-10-example"));
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let site = sample_site();
    let (status, _, _) = get(app(site.path()), "/blog/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn broken_content_is_a_server_error() {
    let site = sample_site();
    write_post(
        site.path(),
        "broken",
        "blogPost.mdx",
        &post_source("Broken", "g8", None, &[], ":::note\nnever closed\n"),
    );

    let (status, _, _) = get(app(site.path()), "/blog/broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Other posts still render.
    let (status, _, _) = get(app(site.path()), "/blog/draft").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn syndication_documents() {
    let site = sample_site();

    let (status, _, body) = get(app(site.path()), "/blog/rss.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rss::Channel::read_from(body.as_bytes()).unwrap().items().len(), 2);

    let (status, _, body) = get(app(site.path()), "/sitemap.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<url>").count(), 4);

    let (_, _, body) = get(app(site.path()), "/robots.txt").await;
    assert!(body.contains("Sitemap: https://gajus.com/sitemap.xml"));

    let (status, _, _) = get(app(site.path()), "/highlight.css").await;
    assert_eq!(status, StatusCode::OK);
}
