use axum::Json;
use common_types::MAX_UPLOAD_SIZE_BYTES;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// Commit hash of the current build (if available)
    rev: Option<&'static str>,
    /// Largest image `POST /api/upload` will authorize, in bytes
    max_upload_bytes: u64,
}

/// Liveness probe
///
/// Never touches the bucket; a healthy response says nothing about storage.
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rev: option_env!("GIT_REV"),
        max_upload_bytes: MAX_UPLOAD_SIZE_BYTES,
    })
}
