//! Upload authorization: request validation and credential minting

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common_types::{ImageContentType, UploadRequest, MAX_UPLOAD_SIZE_BYTES};
use rand::Rng;
use thiserror::Error;

use crate::media_storage::{MediaStorage, StorageError};

/// Length of generated object keys
pub const KEY_LENGTH: usize = 10;

/// URL-safe characters object keys are drawn from
const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Reasons an upload request is refused before storage is contacted
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UploadPolicyError {
    #[error("content type is required")]
    MissingContentType,

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("file of {0} bytes exceeds the upload limit")]
    FileTooLarge(u64),
}

/// Errors that can occur while authorizing an upload
#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error(transparent)]
    Policy(#[from] UploadPolicyError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Everything a client needs to upload one image
#[derive(Debug, Clone)]
pub struct UploadCredential {
    pub key: String,
    pub upload_url: String,
    pub public_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Checks a request against the upload policy
///
/// Content type is checked before size, so an oversized file of the wrong type
/// is reported as a type error.
///
/// # Errors
///
/// Returns the first [`UploadPolicyError`] the request violates
pub fn validate(request: &UploadRequest) -> Result<ImageContentType, UploadPolicyError> {
    let content_type = request
        .content_type
        .as_deref()
        .filter(|content_type| !content_type.is_empty())
        .ok_or(UploadPolicyError::MissingContentType)?;

    let content_type = ImageContentType::from_str(content_type)
        .map_err(|_| UploadPolicyError::UnsupportedContentType(content_type.to_string()))?;

    if request.size > MAX_UPLOAD_SIZE_BYTES {
        return Err(UploadPolicyError::FileTooLarge(request.size));
    }

    Ok(content_type)
}

/// Generates a fresh random object key
///
/// Keys are not checked against existing objects; 64^10 possible keys make a
/// collision negligible at this scale.
#[must_use]
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_LENGTH)
        .map(|_| char::from(KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())]))
        .collect()
}

/// Whether `key` has the shape of a generated key
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    key.len() == KEY_LENGTH && key.bytes().all(|b| KEY_ALPHABET.contains(&b))
}

/// Validates upload requests and mints presigned credentials for them
pub struct UploadAuthorizer {
    storage: Arc<dyn MediaStorage>,
}

impl UploadAuthorizer {
    #[must_use]
    pub fn new(storage: Arc<dyn MediaStorage>) -> Self {
        Self { storage }
    }

    /// Authorizes a single upload
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationError::Policy` for invalid requests, without any storage call
    /// Returns `AuthorizationError::Storage` if the presigned URL cannot be created
    pub async fn authorize(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, AuthorizationError> {
        let content_type = validate(request)?;

        let key = generate_key();
        let presigned = self
            .storage
            .create_presigned_upload(&key, content_type.as_str())
            .await?;

        tracing::info!(
            key = %key,
            content_type = content_type.as_str(),
            size = request.size,
            "Authorized upload"
        );

        Ok(UploadCredential {
            key,
            upload_url: presigned.upload_url,
            public_url: presigned.public_url,
            expires_at: presigned.expires_at,
        })
    }
}
