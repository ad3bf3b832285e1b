//! S3-compatible image storage operations
mod error;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{
    error::SdkError, operation::get_object::GetObjectError, presigning::PresigningConfig,
    Client as S3Client,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};

pub use common_types::IMMUTABLE_CACHE_CONTROL;
pub use error::{StorageError, StorageResult};

/// Content type reported for stored objects that carry none
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// Presigned upload with the URL the object will be served from
#[derive(Debug, Clone)]
pub struct PresignedUpload {
    /// The presigned URL for the PUT operation
    pub upload_url: String,
    /// Public URL of the object once uploaded
    pub public_url: String,
    /// UTC timestamp when `upload_url` expires
    pub expires_at: DateTime<Utc>,
}

/// An object read back from the bucket
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Capability the upload flow needs from object storage
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Mints a time-limited URL allowing a single `PUT` of `content_type` at `key`
    async fn create_presigned_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> StorageResult<PresignedUpload>;

    /// Reads the object stored at `key`
    async fn fetch_object(&self, key: &str) -> StorageResult<StoredObject>;
}

/// Image storage backed by an S3-compatible bucket (Cloudflare R2, `LocalStack`)
pub struct S3MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    public_base_url: String,
    presigned_url_expiry_secs: u64,
}

impl S3MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket the images are stored in
    /// * `public_base_url` - Base URL the images are publicly served from
    /// * `presigned_url_expiry_secs` - Lifetime of presigned upload URLs
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        public_base_url: String,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            public_base_url,
            presigned_url_expiry_secs,
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for S3MediaStorage {
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if the presigning config cannot be built
    /// Returns `StorageError::S3Error` if signing fails
    async fn create_presigned_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> StorageResult<PresignedUpload> {
        let expires_in = Duration::from_secs(self.presigned_url_expiry_secs);
        let presigned_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            StorageError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;
        // Taken before signing so it never trails the real expiry
        let expires_at: DateTime<Utc> = Utc::now() + expires_in;

        let presigned_request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .cache_control(IMMUTABLE_CACHE_CONTROL)
            .presigned(presigned_config)
            .await
            .map_err(|e| StorageError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        Ok(PresignedUpload {
            upload_url: presigned_request.uri().to_string(),
            public_url: format!("{}/{key}", self.public_base_url),
            expires_at,
        })
    }

    async fn fetch_object(&self, key: &str) -> StorageResult<StoredObject> {
        let result = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), GetObjectError::NoSuchKey(_))
                    || service_err.raw().status().as_u16() == 404 =>
            {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(StorageError::from(e)),
        };

        let content_type = output
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3Error(format!("Failed to read object body: {e}")))?
            .into_bytes();

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use bytes::Bytes;
    use chrono::Utc;

    use super::{MediaStorage, PresignedUpload, StorageError, StorageResult, StoredObject};

    /// In-memory stand-in for the bucket
    pub struct MockMediaStorage {
        public_base_url: String,
        fail_presign: bool,
        objects: Mutex<HashMap<String, StoredObject>>,
        presign_calls: AtomicUsize,
    }

    impl MockMediaStorage {
        #[must_use]
        pub fn new(public_base_url: &str) -> Self {
            Self {
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
                fail_presign: false,
                objects: Mutex::new(HashMap::new()),
                presign_calls: AtomicUsize::new(0),
            }
        }

        /// A storage whose signing always fails
        #[must_use]
        pub fn failing(public_base_url: &str) -> Self {
            Self {
                fail_presign: true,
                ..Self::new(public_base_url)
            }
        }

        /// Number of presign requests received so far
        #[must_use]
        pub fn presign_calls(&self) -> usize {
            self.presign_calls.load(Ordering::SeqCst)
        }

        /// Stores an object as if a client had completed its upload
        ///
        /// # Panics
        ///
        /// Panics if the object map lock is poisoned
        pub fn insert_object(&self, key: &str, bytes: impl Into<Bytes>, content_type: &str) {
            self.objects.lock().unwrap().insert(
                key.to_string(),
                StoredObject {
                    bytes: bytes.into(),
                    content_type: content_type.to_string(),
                },
            );
        }
    }

    #[async_trait::async_trait]
    impl MediaStorage for MockMediaStorage {
        async fn create_presigned_upload(
            &self,
            key: &str,
            content_type: &str,
        ) -> StorageResult<PresignedUpload> {
            self.presign_calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_presign {
                return Err(StorageError::S3Error("signing failed".to_string()));
            }

            Ok(PresignedUpload {
                upload_url: format!(
                    "https://storage.test/podu-images/{key}?content-type={content_type}&X-Amz-Expires=60"
                ),
                public_url: format!("{}/{key}", self.public_base_url),
                expires_at: Utc::now() + chrono::Duration::seconds(60),
            })
        }

        async fn fetch_object(&self, key: &str) -> StorageResult<StoredObject> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(key.to_string()))
        }
    }
}
