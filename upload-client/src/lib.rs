//! Client side of a podu upload: server API, session state machine and clipboard

#![deny(clippy::all, clippy::pedantic, dead_code)]

/// Calls to the podu server and to storage
pub mod api;

/// Copying URLs to the user's clipboard
pub mod clipboard;

pub mod error;

/// Upload state machine
pub mod session;
