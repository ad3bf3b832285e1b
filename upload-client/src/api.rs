use async_trait::async_trait;
use bytes::Bytes;
use common_types::{presigned_upload_headers, UploadRequest, UploadResponse};
use reqwest::{header, Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

use crate::error::{ClientError, GENERIC_CREDENTIAL_MESSAGE};

/// Everything needed to upload one file, as handed out by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCredential {
    /// Time-limited URL to `PUT` the bytes to
    pub upload_url: String,
    pub key: String,
    /// Where the image is served from once uploaded
    pub public_url: String,
}

impl From<UploadResponse> for UploadCredential {
    fn from(response: UploadResponse) -> Self {
        Self {
            upload_url: response.upload_url,
            key: response.key,
            public_url: response.url,
        }
    }
}

/// The two network calls of an upload
#[async_trait]
pub trait UploadApi: Send + Sync {
    /// Asks the server to authorize an upload
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` if the server refuses the file
    /// Returns `ClientError::Credential` on any other failure
    async fn request_credential(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, ClientError>;

    /// Sends the file bytes straight to storage
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transfer` if storage does not accept the upload
    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Implements [`UploadApi`] over HTTP against a podu server
pub struct HttpUploadApi {
    server_url: String,
    http_client: ClientWithMiddleware,
}

impl HttpUploadApi {
    /// Creates a new client for the server at `server_url`
    ///
    /// No timeout is configured: uploads run until the network stack gives up.
    ///
    /// # Panics
    ///
    /// If the HTTP client fails to be created
    #[must_use]
    pub fn new(server_url: &str) -> Self {
        let reqwest_client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }
}

#[async_trait]
impl UploadApi for HttpUploadApi {
    async fn request_credential(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadCredential, ClientError> {
        let url = format!("{}/api/upload", self.server_url);
        let json_body = serde_json::to_string(request)
            .map_err(|e| ClientError::Credential(format!("Failed to serialize request: {e}")))?;

        let response = self
            .http_client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Credential request failed: {e}");
                ClientError::Credential(GENERIC_CREDENTIAL_MESSAGE.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read credential response: {e}");
            ClientError::Credential(GENERIC_CREDENTIAL_MESSAGE.to_string())
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| GENERIC_CREDENTIAL_MESSAGE.to_string());

            tracing::warn!("Server refused upload ({status}): {message}");

            return Err(if status == StatusCode::BAD_REQUEST {
                ClientError::Validation(message)
            } else {
                ClientError::Credential(message)
            });
        }

        let response: UploadResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Malformed credential response: {e}");
            ClientError::Credential(GENERIC_CREDENTIAL_MESSAGE.to_string())
        })?;

        Ok(response.into())
    }

    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), ClientError> {
        // Every signed header must be replayed verbatim
        let mut request = self.http_client.put(upload_url);
        for (name, value) in presigned_upload_headers(content_type) {
            request = request.header(name, value);
        }

        let response = request
            .body(bytes)
            .send()
            .await
            .map_err(|e| ClientError::Transfer(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Transfer(format!(
                "storage responded with {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use common_types::UploadRequest;
    use tokio::sync::watch;

    use super::{UploadApi, UploadCredential};
    use crate::{error::ClientError, session::UploadState};

    /// Scripted [`UploadApi`] that records what it was asked to do
    pub struct MockUploadApi {
        credential: Result<UploadCredential, ClientError>,
        put_result: Result<(), ClientError>,
        credential_calls: AtomicUsize,
        put_calls: AtomicUsize,
        requests: Mutex<Vec<UploadRequest>>,
        observer: Mutex<Option<watch::Receiver<UploadState>>>,
        observed_states: Mutex<Vec<UploadState>>,
    }

    impl MockUploadApi {
        /// An API where both calls succeed and the image lands at `public_url`
        #[must_use]
        pub fn succeeding(public_url: &str) -> Self {
            Self {
                credential: Ok(UploadCredential {
                    upload_url: "https://storage.test/podu-images/AbCdE12345".to_string(),
                    key: "AbCdE12345".to_string(),
                    public_url: public_url.to_string(),
                }),
                put_result: Ok(()),
                credential_calls: AtomicUsize::new(0),
                put_calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                observer: Mutex::new(None),
                observed_states: Mutex::new(Vec::new()),
            }
        }

        #[must_use]
        pub fn with_credential_error(mut self, error: ClientError) -> Self {
            self.credential = Err(error);
            self
        }

        #[must_use]
        pub fn with_put_error(mut self, error: ClientError) -> Self {
            self.put_result = Err(error);
            self
        }

        /// Records the session state each time a call comes in
        ///
        /// # Panics
        ///
        /// Panics if the observer lock is poisoned
        pub fn observe(&self, states: watch::Receiver<UploadState>) {
            *self.observer.lock().unwrap() = Some(states);
        }

        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn observed_states(&self) -> Vec<UploadState> {
            self.observed_states.lock().unwrap().clone()
        }

        /// # Panics
        ///
        /// Panics if the lock is poisoned
        #[must_use]
        pub fn requests(&self) -> Vec<UploadRequest> {
            self.requests.lock().unwrap().clone()
        }

        #[must_use]
        pub fn credential_calls(&self) -> usize {
            self.credential_calls.load(Ordering::SeqCst)
        }

        #[must_use]
        pub fn put_calls(&self) -> usize {
            self.put_calls.load(Ordering::SeqCst)
        }

        fn record_state(&self) {
            if let Some(states) = self.observer.lock().unwrap().as_ref() {
                let state = states.borrow().clone();
                self.observed_states.lock().unwrap().push(state);
            }
        }
    }

    #[async_trait]
    impl UploadApi for MockUploadApi {
        async fn request_credential(
            &self,
            request: &UploadRequest,
        ) -> Result<UploadCredential, ClientError> {
            self.credential_calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.record_state();
            self.credential.clone()
        }

        async fn put_object(
            &self,
            _upload_url: &str,
            _content_type: &str,
            _bytes: Bytes,
        ) -> Result<(), ClientError> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            self.record_state();
            self.put_result.clone()
        }
    }
}
