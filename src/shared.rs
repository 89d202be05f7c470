use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the session coordinator.
///
/// Validation failures are caught before any network call; client failures
/// are caught at the coordinator boundary and returned as typed results,
/// never propagated raw.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not connected to a room")]
    NotConnected,

    /// The session client reported a failure; carries the underlying message.
    #[error("Session error: {0}")]
    Session(String),

    /// A network call through the session client exceeded its deadline.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}
