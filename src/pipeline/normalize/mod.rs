pub mod client;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod types;

pub use client::*;
pub use orchestrator::*;
pub use parser::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Model API key not configured")]
    MissingApiKey,

    #[error("Model endpoint unreachable at {0}")]
    Connection(String),

    #[error("Model request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Model endpoint returned error (status {status}): {body}")]
    ServiceUnavailable { status: u16, body: String },

    /// The response could not be parsed as the expected JSON payload even
    /// after defensive cleanup. Never silently converted into an empty
    /// contract — callers retry or switch modes.
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl NormalizeError {
    /// Transport-level failures worth retrying with backoff.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::ServiceUnavailable { .. } | Self::HttpClient(_)
        )
    }
}
