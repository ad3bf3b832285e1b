//! Wire types shared between the podu backend and its upload client

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Largest image the service accepts, in bytes (10 MiB)
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Cache directive stored with every uploaded object
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Headers a presigned upload URL is signed over, besides `host`
///
/// The `PUT` to storage must carry exactly these values or the signature is rejected.
#[must_use]
pub fn presigned_upload_headers(content_type: &str) -> [(&'static str, &str); 2] {
    [
        ("cache-control", IMMUTABLE_CACHE_CONTROL),
        ("content-type", content_type),
    ]
}

/// Image content types accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter)]
pub enum ImageContentType {
    #[strum(serialize = "image/jpeg")]
    Jpeg,
    #[strum(serialize = "image/jpg")]
    Jpg,
    #[strum(serialize = "image/png")]
    Png,
    #[strum(serialize = "image/gif")]
    Gif,
    #[strum(serialize = "image/webp")]
    Webp,
}

impl ImageContentType {
    /// MIME type as sent on the wire
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// MIME type of the file, e.g. `image/png`
    #[serde(default)]
    pub content_type: Option<String>,
    /// Declared file size in bytes
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    /// Presigned URL the client must `PUT` the file bytes to
    pub upload_url: String,
    /// Object key the image is stored under
    pub key: String,
    /// Public URL the image is served from once uploaded
    pub url: String,
    /// RFC 3339 timestamp after which `upload_url` is rejected
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FossTool {
    pub name: String,
    pub description: String,
    pub github_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FossToolsResponse {
    pub tools: Vec<FossTool>,
}
