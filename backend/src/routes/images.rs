use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use tracing::instrument;

use crate::{
    media_storage::{MediaStorage, StorageError, IMMUTABLE_CACHE_CONTROL},
    types::AppError,
    upload_policy::is_valid_key,
};

const NOT_FOUND: AppError = AppError::new(
    StatusCode::NOT_FOUND,
    "not_found",
    "Image not found",
    false,
);

/// Serves an uploaded image from the bucket
#[instrument(skip(media_storage))]
pub async fn serve_image(
    Extension(media_storage): Extension<Arc<dyn MediaStorage>>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    // Anything that cannot be a generated key never reaches the bucket
    if !is_valid_key(&key) {
        return Err(NOT_FOUND);
    }

    let object = media_storage.fetch_object(&key).await.map_err(|err| match err {
        StorageError::NotFound(_) => NOT_FOUND,
        err => {
            tracing::error!("Failed to fetch image {key}: {err}");
            AppError::new(
                StatusCode::BAD_GATEWAY,
                "storage_error",
                "Failed to load image",
                true,
            )
        }
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL.to_string()),
        ],
        object.bytes,
    )
        .into_response())
}
