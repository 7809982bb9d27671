//! Router behavior that is decided before any query reaches the database.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{call, offline_app};
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn health_and_version() {
    let app = offline_app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "sandwich-api");
    assert_eq!(body["service"], "sandwich shop");
    assert_eq!(
        body["resources"],
        json!(["sandwiches", "resources", "orders", "recipes", "order-details"])
    );
}

#[tokio::test]
async fn unknown_collection_is_404() {
    let app = offline_app();
    let (status, body) = call(&app, Method::GET, "/drinks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = call(&app, Method::DELETE, "/drinks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_rejected() {
    let app = offline_app();
    for (method, uri) in [
        (Method::GET, "/sandwiches/abc"),
        (Method::DELETE, "/orders/1.5"),
        (Method::GET, "/order-details/-"),
    ] {
        let (status, body) = call(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn create_validates_payload() {
    let app = offline_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/sandwiches",
        Some(json!({"sandwich_name": "BLT"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "validation: price is required");

    let (status, _) = call(
        &app,
        Method::POST,
        "/recipes/",
        Some(json!({"sandwich_id": "one", "resource_id": 1, "amount": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(&app, Method::POST, "/orders", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "bad request: body must be a JSON object");
}

#[tokio::test]
async fn update_validates_payload() {
    let app = offline_app();
    let (status, body) = call(
        &app,
        Method::PUT,
        "/resources/1",
        Some(json!({"amount": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "validation: amount must be an integer");
}

/// Send a body as-is, bypassing the JSON encoding done by `call`.
async fn send_raw(
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let resp = offline_app()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let json = Some("application/json");
    let (status, body) = send_raw(Method::POST, "/sandwiches", json, "{bad").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["message"].is_string());

    let (status, body) =
        send_raw(Method::PUT, "/orders/1", json, r#"{"customer_name": "Ada""#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn missing_content_type_is_bad_request() {
    let (status, body) = send_raw(Method::POST, "/resources", None, r#"{"item": "bread"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) =
        send_raw(Method::PUT, "/resources/1", Some("text/plain"), "amount=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn list_filter_must_match_column_type() {
    let app = offline_app();
    let (status, _) = call(&app, Method::GET, "/order-details?order_id=first", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::GET, "/orders?limit=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = offline_app();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/sandwiches")
        .header(header::ORIGIN, "http://shop.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://shop.example");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "PUT");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = offline_app();
    let payload = json!({"customer_name": "x".repeat(70 * 1024)}).to_string();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
