//! Lifecycle of a single image upload, as driven by a user interface
//!
//! ```text
//! Idle -> Requesting -> Uploading -> Succeeded(url)
//!             |             |
//!             +-------------+------> Failed(message)
//!
//! Succeeded | Failed --reset--> Idle
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use common_types::UploadRequest;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::api::UploadApi;
use crate::clipboard::Clipboard;
use crate::error::{CopyError, SelectionError};

/// How long the "copied" flag stays raised after a copy
pub const COPIED_FLAG_DURATION: Duration = Duration::from_secs(2);

/// Failure message left behind by an upload whose future was dropped mid-flight
pub const CANCELLED_MESSAGE: &str = "Upload cancelled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    /// Waiting for the server to hand out an upload credential
    Requesting,
    /// Sending the bytes to storage
    Uploading,
    Succeeded { url: String },
    Failed { message: String },
}

impl UploadState {
    /// Whether a network call is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Requesting | Self::Uploading)
    }
}

/// Drag-and-drop events over the drop zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop,
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its content type from the extension
    ///
    /// Unknown extensions get `application/octet-stream`, which the server refuses.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        let name = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());

        Ok(Self::new(name, content_type, Bytes::from(bytes)))
    }

    /// Size in bytes as declared to the server
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }
}

/// One user's upload session
///
/// Owns the upload state machine plus two presentation-only flags: whether a
/// drag is hovering the drop zone, and whether the URL was just copied.
/// Interfaces follow state changes through [`UploadSession::subscribe`].
pub struct UploadSession {
    api: Arc<dyn UploadApi>,
    state: watch::Sender<UploadState>,
    drag_active: bool,
    copied_at: Option<Instant>,
}

impl UploadSession {
    #[must_use]
    pub fn new(api: Arc<dyn UploadApi>) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            api,
            state,
            drag_active: false,
            copied_at: None,
        }
    }

    /// Current upload state
    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    #[must_use]
    pub const fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Whether the "copied" flag is still raised
    #[must_use]
    pub fn is_copied(&self) -> bool {
        self.copied_at
            .is_some_and(|copied_at| copied_at.elapsed() < COPIED_FLAG_DURATION)
    }

    /// Whether a new file may be selected right now
    #[must_use]
    pub fn accepts_files(&self) -> bool {
        matches!(*self.state.borrow(), UploadState::Idle)
    }

    /// Updates the drag flag; never affects the upload itself
    pub fn handle_drag(&mut self, event: DragEvent) {
        self.drag_active = matches!(event, DragEvent::Enter | DragEvent::Over);
    }

    /// Handles files dropped on the drop zone
    ///
    /// # Errors
    ///
    /// See [`UploadSession::select_files`]
    pub async fn drop_files(
        &mut self,
        files: impl IntoIterator<Item = SelectedFile>,
    ) -> Result<(), SelectionError> {
        self.handle_drag(DragEvent::Drop);
        self.select_files(files).await
    }

    /// Uploads the first of the selected files; the others are ignored
    ///
    /// Resolves once the upload has succeeded or failed; the outcome is in
    /// [`UploadSession::state`]. An empty selection does nothing.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Busy` while an upload is in flight
    /// Returns `SelectionError::NotReset` until a finished upload is reset
    pub async fn select_files(
        &mut self,
        files: impl IntoIterator<Item = SelectedFile>,
    ) -> Result<(), SelectionError> {
        let current = self.state();
        if current.is_busy() {
            return Err(SelectionError::Busy);
        }
        if current != UploadState::Idle {
            return Err(SelectionError::NotReset);
        }

        let mut files = files.into_iter();
        let Some(file) = files.next() else {
            return Ok(());
        };

        let ignored = files.count();
        if ignored > 0 {
            tracing::debug!("Ignoring {ignored} additional selected files");
        }

        self.upload(file).await;
        Ok(())
    }

    /// Returns a finished session to `Idle`
    ///
    /// Returns `false`, changing nothing, unless the session is `Succeeded` or `Failed`.
    pub fn reset(&mut self) -> bool {
        let finished = matches!(
            *self.state.borrow(),
            UploadState::Succeeded { .. } | UploadState::Failed { .. }
        );
        if !finished {
            return false;
        }

        self.copied_at = None;
        self.transition(UploadState::Idle);
        true
    }

    /// Copies the uploaded image's URL and raises the "copied" flag
    ///
    /// # Errors
    ///
    /// Returns `CopyError::NothingToCopy` unless the upload succeeded
    /// Returns `CopyError::Clipboard` if the clipboard write fails
    pub fn copy_url(&mut self, clipboard: &dyn Clipboard) -> Result<(), CopyError> {
        let url = match &*self.state.borrow() {
            UploadState::Succeeded { url } => url.clone(),
            _ => return Err(CopyError::NothingToCopy),
        };

        clipboard.write_text(&url)?;
        self.copied_at = Some(Instant::now());
        Ok(())
    }

    async fn upload(&self, file: SelectedFile) {
        let _in_flight = InFlight(&self.state);
        self.transition(UploadState::Requesting);

        let request = UploadRequest {
            content_type: Some(file.content_type.clone()),
            size: file.size(),
        };

        let credential = match self.api.request_credential(&request).await {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(file = %file.name, "Could not obtain upload credential: {err}");
                self.transition(UploadState::Failed {
                    message: err.to_string(),
                });
                return;
            }
        };

        self.transition(UploadState::Uploading);

        match self
            .api
            .put_object(&credential.upload_url, &file.content_type, file.bytes)
            .await
        {
            Ok(()) => {
                tracing::info!(key = %credential.key, "Upload finished");
                self.transition(UploadState::Succeeded {
                    url: credential.public_url,
                });
            }
            Err(err) => {
                tracing::warn!(key = %credential.key, "Upload to storage failed: {err:?}");
                self.transition(UploadState::Failed {
                    message: err.to_string(),
                });
            }
        }
    }

    fn transition(&self, next: UploadState) {
        tracing::debug!("Upload state: {next:?}");
        self.state.send_replace(next);
    }
}

/// Fails the session if an upload is dropped before reaching a final state
struct InFlight<'a>(&'a watch::Sender<UploadState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let abandoned = self.0.borrow().is_busy();
        if abandoned {
            tracing::warn!("Upload dropped before finishing");
            self.0.send_replace(UploadState::Failed {
                message: CANCELLED_MESSAGE.to_string(),
            });
        }
    }
}
