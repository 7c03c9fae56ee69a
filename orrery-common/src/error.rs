//! Common error types for the orrery gateway

use thiserror::Error;

/// Common result type for orrery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the gateway.
///
/// Validation failures are checked before any I/O; collection-fetch failures
/// abort the whole request; per-link resolution failures are never carried
/// here (they degrade in place and are only logged).
#[derive(Error, Debug)]
pub enum Error {
    /// A request parameter failed allow-list validation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A required upstream page fetch failed; no partial collection exists
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
