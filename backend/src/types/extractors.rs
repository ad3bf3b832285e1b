//! Custom extractors that report rejections in the API error envelope

use aide::operation::OperationInput;
use aide::OperationOutput;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use schemars::JsonSchema;

use crate::types::error::AppError;

/// JSON body extractor for upload requests
///
/// The body is parsed whatever its `Content-Type` says. An unreadable or
/// malformed body is reported as [`AppError::UPLOAD_URL_FAILED`], like any
/// other unexpected failure while authorizing an upload.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned + JsonSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|err| {
            tracing::error!("Failed to read request body: {err}");
            AppError::UPLOAD_URL_FAILED
        })?;

        let payload = serde_json::from_slice(&body).map_err(|err| {
            tracing::error!("Malformed JSON payload: {err}");
            AppError::UPLOAD_URL_FAILED
        })?;

        Ok(Self(payload))
    }
}

impl<T> OperationInput for ApiJson<T>
where
    T: JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AppError::inferred_responses(ctx, operation)
    }
}
