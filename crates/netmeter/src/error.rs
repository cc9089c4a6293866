//! Error types for netmeter.

use thiserror::Error;

/// Boxed error used for body sources and transport failures of any client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// The response body's byte stream could not be obtained.
    #[error("failed to acquire response body stream: {0}")]
    StreamAcquisition(#[source] BoxError),

    /// The underlying exchange failed before a response was produced.
    #[error("HTTP exchange failed: {0}")]
    Transport(#[source] BoxError),

    #[error("response body already consumed")]
    BodyConsumed,

    #[error("failed to read response body: {0}")]
    Body(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, Error>;
