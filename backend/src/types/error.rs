//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::foss_tools::FossToolsError;
use crate::media_storage::StorageError;
use crate::upload_policy::{AuthorizationError, UploadPolicyError};

/// API error response envelope consumed by the web client
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Human-readable error message, shown to the user as is
    pub error: &'static str,
    /// Machine-readable error code
    pub code: &'static str,
    /// Whether the client may retry the request
    pub allow_retry: bool,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(
        status: StatusCode,
        code: &'static str,
        msg: &'static str,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                error: msg,
                code,
                allow_retry: retry,
            },
        }
    }

    /// Catch-all for any failure while authorizing an upload
    pub const UPLOAD_URL_FAILED: Self = Self::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "upload_url_failed",
        "Failed to generate upload URL. Please try again.",
        true,
    );

    /// HTTP status this error is reported with
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.code,
                self.inner.error
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.code,
                self.inner.error
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

impl From<UploadPolicyError> for AppError {
    fn from(err: UploadPolicyError) -> Self {
        match err {
            UploadPolicyError::MissingContentType => Self::new(
                StatusCode::BAD_REQUEST,
                "missing_content_type",
                "Content type is required",
                false,
            ),
            UploadPolicyError::UnsupportedContentType(content_type) => {
                tracing::debug!("Rejected content type: {content_type}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_file_type",
                    "Invalid file type. Only JPG, PNG, GIF, and WebP are allowed.",
                    false,
                )
            }
            UploadPolicyError::FileTooLarge(size) => {
                tracing::debug!("Rejected file size: {size} bytes");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "file_too_large",
                    "File too large. Maximum size is 10MB.",
                    false,
                )
            }
        }
    }
}

/// Storage failures while minting a credential are never the client's fault
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Storage error: {err}");
        Self::UPLOAD_URL_FAILED
    }
}

impl From<AuthorizationError> for AppError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::Policy(err) => err.into(),
            AuthorizationError::Storage(err) => err.into(),
        }
    }
}

impl From<FossToolsError> for AppError {
    fn from(err: FossToolsError) -> Self {
        tracing::error!("Error reading FOSS tools: {err}");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "foss_tools_unavailable",
            "Failed to load FOSS tools",
            true,
        )
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
