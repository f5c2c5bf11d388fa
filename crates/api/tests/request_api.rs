//! Integration tests for the `/api/v1/requests` resource.
//!
//! Covers submission (both account types), validation failures, lookup,
//! status changes and script download.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get, gmsa_body, msa_body, patch_json, post_json};
use serde_json::json;

/// Submit `body` and return the created record's JSON.
async fn submit(root: &std::path::Path, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(root).await;
    let response = post_json(app, "/api/v1/requests", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_gmsa_request_returns_pending_record_with_script() {
    let root = common::temp_root();
    let data = submit(root.path(), gmsa_body()).await;

    let id = data["id"].as_str().unwrap();
    assert!(id.starts_with("REQ-"));
    assert_eq!(id.len(), 12);
    assert_eq!(data["status"], "pending");
    assert_eq!(data["accountName"], "svcApp");
    assert_eq!(data["hostServers"], json!(["WEB01", "WEB02"]));
    assert_eq!(data["createdAt"], data["updatedAt"]);

    let script = data["renderedScript"].as_str().unwrap();
    assert!(script.starts_with("# gMSA Creation Script"));
    assert!(script.contains(&format!("# Request ID: {id}")));
    assert!(script.contains("New-ADGroup -Name \"grpSvcApp\""));
    assert!(script.contains("Add-HostToGroup \"WEB01\""));
    assert!(script.contains("Add-HostToGroup \"WEB02\""));
    assert!(!script.contains("$SPNs"));
}

#[tokio::test]
async fn create_msa_request_binds_single_host() {
    let root = common::temp_root();
    let data = submit(root.path(), msa_body("APP01")).await;

    let script = data["renderedScript"].as_str().unwrap();
    assert!(script.starts_with("# MSA Creation Script"));
    assert!(script.contains("RestrictToSingleComputer = $true"));
    assert!(script.contains("Add-ADComputerServiceAccount -Identity \"APP01\""));
}

#[tokio::test]
async fn msa_with_two_hosts_is_rejected() {
    let root = common::temp_root();
    let mut body = msa_body("APP01");
    body["hostServers"] = json!(["APP01", "APP02"]);

    let app = common::build_test_app(root.path()).await;
    let response = post_json(app, "/api/v1/requests", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(root.path()).await;
    let list = body_json(get(app, "/api/v1/requests").await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn gmsa_without_dns_hostname_is_rejected() {
    let root = common::temp_root();
    let mut body = gmsa_body();
    body.as_object_mut().unwrap().remove("dnsHostname");

    let app = common::build_test_app(root.path()).await;
    let response = post_json(app, "/api/v1/requests", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_account_type_is_rejected_by_extractor() {
    let root = common::temp_root();
    let mut body = msa_body("APP01");
    body["accountType"] = json!("user");

    let app = common::build_test_app(root.path()).await;
    let response = post_json(app, "/api/v1/requests", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Listing and lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_requests_in_submission_order() {
    let root = common::temp_root();
    let first = submit(root.path(), gmsa_body()).await;
    let second = submit(root.path(), msa_body("APP01")).await;

    let app = common::build_test_app(root.path()).await;
    let response = get(app, "/api/v1/requests").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![first["id"].clone(), second["id"].clone()]);
}

#[tokio::test]
async fn get_request_by_id() {
    let root = common::temp_root();
    let created = submit(root.path(), msa_body("APP01")).await;
    let id = created["id"].as_str().unwrap();

    let app = common::build_test_app(root.path()).await;
    let response = get(app, &format!("/api/v1/requests/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], created);
}

#[tokio::test]
async fn get_unknown_request_returns_404() {
    let root = common::temp_root();
    let app = common::build_test_app(root.path()).await;
    let response = get(app, "/api/v1/requests/REQ-00000000").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("REQ-00000000"));
}

// ---------------------------------------------------------------------------
// Status changes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_status_sets_status_and_notes() {
    let root = common::temp_root();
    let created = submit(root.path(), gmsa_body()).await;
    let id = created["id"].as_str().unwrap();

    let app = common::build_test_app(root.path()).await;
    let response = patch_json(
        app,
        &format!("/api/v1/requests/{id}/status"),
        json!({ "status": "approved", "notes": "Approved by change board" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["status"], "approved");
    assert_eq!(data["notes"], "Approved by change board");
    assert_eq!(data["renderedScript"], created["renderedScript"]);
    assert_eq!(data["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn update_status_without_notes_keeps_existing_notes() {
    let root = common::temp_root();
    let created = submit(root.path(), msa_body("APP01")).await;
    let uri = format!("/api/v1/requests/{}/status", created["id"].as_str().unwrap());

    let app = common::build_test_app(root.path()).await;
    patch_json(app, &uri, json!({ "status": "approved", "notes": "first" })).await;

    let app = common::build_test_app(root.path()).await;
    let response = patch_json(app, &uri, json!({ "status": "completed" })).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["status"], "completed");
    assert_eq!(data["notes"], "first");
}

#[tokio::test]
async fn update_status_unknown_id_returns_404() {
    let root = common::temp_root();
    let app = common::build_test_app(root.path()).await;
    let response = patch_json(
        app,
        "/api/v1/requests/REQ-DEADBEEF/status",
        json!({ "status": "rejected" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_status_rejects_unknown_status_value() {
    let root = common::temp_root();
    let created = submit(root.path(), msa_body("APP01")).await;
    let uri = format!("/api/v1/requests/{}/status", created["id"].as_str().unwrap());

    let app = common::build_test_app(root.path()).await;
    let response = patch_json(app, &uri, json!({ "status": "archived" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Script download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_script_is_named_attachment() {
    let root = common::temp_root();
    let created = submit(root.path(), gmsa_body()).await;
    let id = created["id"].as_str().unwrap();

    let app = common::build_test_app(root.path()).await;
    let response = get(app, &format!("/api/v1/requests/{id}/script")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"Create-GMSA-svcApp.ps1\""
    );
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    assert_eq!(body_text(response).await, created["renderedScript"]);
}

#[tokio::test]
async fn download_script_unknown_id_returns_404() {
    let root = common::temp_root();
    let app = common::build_test_app(root.path()).await;
    let response = get(app, "/api/v1/requests/REQ-00000000/script").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
