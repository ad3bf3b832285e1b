mod common;

use common::*;

use http::StatusCode;
use podu_backend::types::Environment;

#[tokio::test]
async fn test_health() {
    let setup = TestContext::new();

    let response = setup
        .send_get_request("/health")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "podu-backend");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["maxUploadBytes"], 10 * 1024 * 1024);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let setup = TestContext::new();

    let response = setup
        .send_get_request("/openapi.json")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["paths"]["/api/upload"]["post"].is_object());
    assert!(body["paths"]["/api/foss-tools"]["get"].is_object());
}

#[tokio::test]
async fn test_docs_served_outside_production() {
    let setup = TestContext::in_environment(Environment::Staging);

    let response = setup
        .send_get_request("/docs")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8(read_response_bytes(response).await).unwrap();
    assert!(page.contains("podu API Docs"));
}

#[tokio::test]
async fn test_docs_hidden_in_production() {
    let setup = TestContext::in_environment(Environment::Production);

    for route in ["/docs", "/openapi.json"] {
        let response = setup
            .send_get_request(route)
            .await
            .expect("Failed to send request");

        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "Failed for route: {route}"
        );
    }
}
