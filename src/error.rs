//! Error taxonomy for the synchronization engine.
//!
//! Two failure classes cross the library boundary:
//!
//! - [`SyncError::Validation`] is rejected before any network call and
//!   causes no state change.
//! - [`SyncError::Transport`] is a normalized remote failure (non-2xx
//!   response or network error). Optimistic local changes are rolled back
//!   according to the configured policy when one of these surfaces.
//!
//! A superseded search result is not an error; it is discarded silently by
//! the search controller.

use thiserror::Error;

/// Errors produced by store operations and controller-level validation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Client-side rejection (empty key/value/tag, malformed tag,
    /// duplicate tag). No network call was made.
    #[error("{0}")]
    Validation(String),

    /// Remote failure. `message` carries the response body text verbatim
    /// when the store provided one, otherwise the canonical status reason.
    #[error("store request failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },
}

impl SyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// True for failures rejected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
