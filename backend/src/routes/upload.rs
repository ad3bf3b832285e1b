use std::sync::Arc;

use axum::{Extension, Json};
use common_types::{UploadRequest, UploadResponse};
use tracing::instrument;

use crate::{
    types::{ApiJson, AppError},
    upload_policy::UploadAuthorizer,
};

/// Authorizes an image upload
///
/// Validates the declared content type and size, then returns a presigned URL
/// the client must `PUT` the file bytes to within 60 seconds, along with the
/// public URL the image will be served from.
///
/// # Errors
///
/// - 400 if the content type is missing or not an accepted image type
/// - 400 if the declared size exceeds 10 MiB
/// - 500 if the body is not a valid request or the presigned URL cannot be generated
#[instrument(skip(authorizer, payload), fields(content_type = ?payload.content_type, size = payload.size))]
pub async fn create_upload(
    Extension(authorizer): Extension<Arc<UploadAuthorizer>>,
    ApiJson(payload): ApiJson<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let credential = authorizer.authorize(&payload).await?;

    Ok(Json(UploadResponse {
        success: true,
        upload_url: credential.upload_url,
        key: credential.key,
        url: credential.public_url,
        expires_at: credential.expires_at.to_rfc3339(),
    }))
}
