//! Error types for the triage pipeline.

use thiserror::Error;

/// Errors that can occur during a triage run.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is absent
    #[error("missing configuration: {0}")]
    Configuration(&'static str),

    /// The project board URL does not match the expected form
    #[error("invalid project board link: {0}")]
    InvalidBoardLink(String),

    /// A remote lookup or mutation failed
    #[error("remote lookup failed: {0}")]
    RemoteLookup(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Event payload could not be read
    #[error("failed to read event payload: {0}")]
    Io(#[from] std::io::Error),
}
