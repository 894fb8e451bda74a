//! Lifecycle error types

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by providers and by the lifecycle orchestrator
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Droplet not found: {0}")]
    DropletNotFound(String),

    #[error("No private snapshot is available to restore from")]
    NoSnapshotAvailable,

    #[error("No SSH key is registered with the account")]
    NoSshKey,

    /// The provider rejected a request because the resource is already in
    /// the requested state (e.g. shutting down a droplet that is off).
    #[error("Already in requested state: {0}")]
    AlreadyInState(String),

    #[error("Operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error("Operation '{operation}' did not finish within {waited:?}")]
    OperationTimedOut { operation: String, waited: Duration },

    #[error("Droplet {0} has no IPv4 address assigned")]
    AddressNotAssigned(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether this error reports an absent resource rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CloudError::DropletNotFound(_) | CloudError::NoSnapshotAvailable
        )
    }

    /// Whether a poll gave up before the provider reached a terminal state.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CloudError::OperationTimedOut { .. })
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
