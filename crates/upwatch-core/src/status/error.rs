//! Error types for fetching and decoding upload status.

use thiserror::Error;

/// The status body could not be turned into a [`super::StatusResponse`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, or JSON of the wrong shape (e.g. `null`, a list, a string `pos`).
    #[error("malformed status body: {0}")]
    Json(#[from] serde_json::Error),
    /// A progress body (no `error: true`) without a required field.
    #[error("status body is missing `{0}`")]
    MissingField(&'static str),
    /// Body longer than any status record could be.
    #[error("status body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// Error returned by a single status fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection refused, etc.).
    #[error("status request failed: {0}")]
    Transport(#[from] curl::Error),
    /// Status service answered with a non-2xx status.
    #[error("status service returned HTTP {0}")]
    Http(u32),
    /// Response arrived but its body is not a valid status.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The blocking fetch task panicked or was cancelled.
    #[error("status worker failed: {0}")]
    Worker(String),
}
