#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode, header::CONTENT_TYPE};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use draftdesk::server::{AppState, create_router};
use draftdesk::store::{SqliteStore, Store};

pub const TEST_USER_ID: i64 = 1;

/// Router over a fresh in-memory database, wired the same way `serve` does.
pub fn build_test_app() -> Router {
    let store = SqliteStore::in_memory().expect("open in-memory store");
    store.initialize().expect("initialize schema");
    create_router(Arc::new(AppState::new(Arc::new(store), TEST_USER_ID)))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    send(app, request).await
}

pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("build request");
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is JSON")
}

/// Creates a draft and returns the decoded response, asserting it succeeded.
pub async fn create_draft(app: &Router, name: &str, text: &str) -> Value {
    let response = post_json(
        app,
        "/api/drafts",
        serde_json::json!({ "name": name, "text": text }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
