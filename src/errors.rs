//! Typed error hierarchy for the trackdash dashboard.
//!
//! Two top-level enums cover the two subsystems:
//! - `FetchError` — tracker client and query cache failures
//! - `PageError` — report page assembly failures, mapped to HTTP statuses

use thiserror::Error;

/// Errors from the tracker boundary (REST client and query cache).
///
/// The cache deliberately returns these instead of collapsing failures to an
/// empty issue list, so callers can tell "zero results" from "fetch failed".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Tracker unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("Tracker rejected credentials (HTTP {status})")]
    Auth { status: u16 },

    #[error("Tracker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode tracker response for {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl FetchError {
    /// Whether this failure should surface as a 502 rather than a 500.
    pub fn is_upstream_unavailable(&self) -> bool {
        match self {
            FetchError::Unavailable { .. } => true,
            FetchError::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Errors from assembling a report page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Project name not found")]
    MissingParameter,

    #[error(transparent)]
    Tracker(#[from] FetchError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
