mod common;

use common::*;

use http::{header, StatusCode};

#[tokio::test]
async fn test_serve_uploaded_image() {
    let setup = TestContext::new();
    setup
        .media_storage
        .insert_object("AbCdE12345", vec![0x89, b'P', b'N', b'G'], "image/png");

    let response = setup
        .send_get_request("/AbCdE12345")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );

    let bytes = read_response_bytes(response).await;
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_serve_unknown_key() {
    let setup = TestContext::new();

    let response = setup
        .send_get_request("/zzzzzzzzzz")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = parse_response_body(response).await;
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_serve_malformed_key() {
    let setup = TestContext::new();

    let response = setup
        .send_get_request("/favicon.ico")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uploaded_url_resolves_after_upload() {
    let setup = TestContext::new();

    let response = setup
        .send_post_request("/api/upload", create_upload_request("image/gif", 3))
        .await
        .expect("Failed to send request");
    let body = parse_response_body(response).await;
    let key = body["key"].as_str().unwrap().to_string();

    // Simulate the client's direct PUT to the bucket
    setup
        .media_storage
        .insert_object(&key, b"GIF".to_vec(), "image/gif");

    let path = body["url"]
        .as_str()
        .unwrap()
        .strip_prefix(TEST_BASE_URL)
        .unwrap()
        .to_string();

    let response = setup
        .send_get_request(&path)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_response_bytes(response).await, b"GIF".to_vec());
}
