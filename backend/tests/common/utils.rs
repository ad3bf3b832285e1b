use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::json;

pub fn create_upload_request(content_type: &str, size: u64) -> serde_json::Value {
    json!({
        "contentType": content_type,
        "size": size
    })
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Read the raw response body
pub async fn read_response_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
