#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use portal_api::config::ServerConfig;
use portal_api::router::build_app_router;
use portal_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults rooted at `root`.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_dir: root.join("data"),
        scripts_dir: root.join("scripts"),
    }
}

/// Build the full application router over a store in `root/data`.
///
/// Every call reopens the same files, so state written through one router
/// is visible to the next.
pub async fn build_test_app(root: &Path) -> Router {
    let config = test_config(root);
    let store = portal_db::open_store(&config.data_dir)
        .await
        .expect("open test store");

    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

/// Fresh temporary root for one test.
pub fn temp_root() -> TempDir {
    TempDir::new().expect("create temp dir")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
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

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

/// A complete gMSA submission matching the web form's field names.
pub fn gmsa_body() -> serde_json::Value {
    serde_json::json!({
        "accountType": "gmsa",
        "accountName": "svcApp",
        "displayName": "App Pool Identity",
        "description": "Runs the intranet app pool",
        "requestorName": "Dana Lee",
        "requestorEmail": "dana@corp.local",
        "costCenter": "CC-1200",
        "targetOU": "OU=Service Accounts,DC=corp,DC=local",
        "serviceType": "IIS",
        "dnsHostname": "web01.corp.local",
        "securityGroupName": "grpSvcApp",
        "createSecurityGroup": true,
        "hostServers": ["WEB01", "WEB02"],
        "passwordIntervalDays": 30,
        "encryptionTypes": ["AES256"],
        "servicePrincipalNames": ""
    })
}

/// A minimal MSA submission for `host`.
pub fn msa_body(host: &str) -> serde_json::Value {
    serde_json::json!({
        "accountType": "msa",
        "accountName": "svcBatch",
        "requestorName": "Sam Ortiz",
        "targetOU": "OU=Service Accounts,DC=corp,DC=local",
        "hostServers": [host]
    })
}
