//! Typed errors for the core analysis and feedback pipeline.
//!
//! Every core operation returns one of these instead of terminating the
//! caller; `main` decides how each kind maps to user-visible output.

use thiserror::Error;

/// Errors produced by the normalizer, aggregator, store, and provider client.
#[derive(Error, Debug)]
pub enum Error {
    /// Provider output could not be turned into a structured judgement.
    #[error("malformed judgement: {0}")]
    MalformedJudgement(String),

    /// A caller-supplied parameter was out of range or nonsensical.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The feedback store could not be reached or queried.
    #[error("feedback store unavailable: {0}")]
    StoreUnavailable(String),

    /// The analysis provider request failed (transport or API level).
    #[error("analysis provider error: {0}")]
    Provider(String),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::StoreUnavailable(e.to_string())
    }
}
