mod common;

use common::*;

use http::StatusCode;
use podu_backend::media_storage::mock::MockMediaStorage;

#[tokio::test]
async fn test_list_foss_tools() {
    let setup = TestContext::new();

    let response = setup
        .send_get_request("/api/foss-tools")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "axum");
    assert_eq!(tools[0]["githubUrl"], "https://github.com/tokio-rs/axum");
    assert_eq!(tools[1]["description"], "Asynchronous runtime for Rust");
}

#[tokio::test]
async fn test_list_foss_tools_empty_catalog() {
    let setup =
        TestContext::with_foss_tools(MockMediaStorage::new(TEST_BASE_URL), r#"{"tools": []}"#);

    let response = setup
        .send_get_request("/api/foss-tools")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["tools"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_foss_tools_malformed_catalog() {
    let setup = TestContext::with_foss_tools(MockMediaStorage::new(TEST_BASE_URL), "not json");

    let response = setup
        .send_get_request("/api/foss-tools")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "Failed to load FOSS tools");
}
