//! Error types for the upload client

use thiserror::Error;

/// Message shown when the server gives no reason for refusing a credential
pub const GENERIC_CREDENTIAL_MESSAGE: &str = "Failed to get upload URL";

/// Errors that can end an upload attempt
///
/// The `Display` output is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The server refused the file (bad type or size); retrying will not help
    #[error("{0}")]
    Validation(String),

    /// No credential could be obtained (server or network failure)
    #[error("{0}")]
    Credential(String),

    /// The direct upload to storage failed, including on an expired credential
    #[error("Upload failed")]
    Transfer(String),
}

impl ClientError {
    /// Whether retrying the whole upload might succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

/// Reasons a file selection is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("an upload is already in progress")]
    Busy,

    #[error("the previous upload must be reset first")]
    NotReset,
}

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("there is no uploaded URL to copy")]
    NothingToCopy,

    #[error("failed to write to the clipboard: {0}")]
    Clipboard(#[from] std::io::Error),
}
