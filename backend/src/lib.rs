//! podu image hosting backend

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Static FOSS tools catalog
pub mod foss_tools;

/// Image bucket operations
pub mod media_storage;

/// HTTP routes
pub mod routes;

/// HTTP server setup
pub mod server;

/// Configuration, errors and extractors
pub mod types;

/// Upload validation and credential minting
pub mod upload_policy;
