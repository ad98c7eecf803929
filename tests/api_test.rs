mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::*;
use debit_note_service::api::{router, ORGANIZATION_HEADER};
use debit_note_service::DebitNoteService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store = seeded_store();
    router(Arc::new(DebitNoteService::new(Arc::new(store))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn put(uri: &str, org: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(org) = org {
        builder = builder.header(ORGANIZATION_HEADER, org);
    }
    builder.body(Body::from(body)).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(ORGANIZATION_HEADER, ORG)
        .body(Body::empty())
        .unwrap()
}

fn note_uri() -> String {
    format!("/api/debit-notes/{}", NOTE)
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn put_updates_the_note() {
    let (status, body) = send(app(), put(&note_uri(), Some(ORG), update_body().to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Debit note updated successfully");
    assert_eq!(body["savedDebitNote"]["debitNote"], "DN-1");
    assert_eq!(body["savedDebitNote"]["billNumber"], "BILL-100");
    assert_eq!(body["savedDebitNote"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn updated_note_and_journal_are_readable() {
    let app = app();
    let (status, _) = send(app.clone(), put(&note_uri(), Some(ORG), update_body().to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, note) = send(app.clone(), get(&note_uri())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["supplierDebitDate"], "2024-03-06");

    let (status, journal) = send(app, get(&format!("{}/journal", note_uri()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(journal.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn missing_organization_is_unauthorized() {
    let (status, body) = send(app(), put(&note_uri(), None, update_body().to_string())).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthorized" }));
}

#[tokio::test]
async fn malformed_path_id_is_not_found() {
    let (status, body) = send(
        app(),
        put("/api/debit-notes/12345", Some(ORG), update_body().to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Debit note not found");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (status, body) = send(app(), put(&note_uri(), Some(ORG), "{\"items\": 7".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn validation_errors_are_joined() {
    let mut payload = update_body();
    payload["billType"] = json!("Bogus");
    payload["paymentMode"] = json!("Barter");

    let (status, body) = send(app(), put(&note_uri(), Some(ORG), payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Bill Type: Bogus, Invalid Payment Mode: Barter");
}
