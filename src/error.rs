use crate::models::job::JobHandle;
use std::fmt;
use thiserror::Error;

/// Failure of a single request against the batch endpoints.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error {code}: {body}")]
    Status { code: u16, body: String },
    #[error("malformed JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Which of the two tracker requests failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollRequest {
    Status,
    Result,
}

impl fmt::Display for PollRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollRequest::Status => write!(f, "status"),
            PollRequest::Result => write!(f, "result"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The job could not be created; nothing is tracked.
    #[error("submission to {endpoint} failed: {source}")]
    SubmissionFailed {
        endpoint: String,
        #[source]
        source: SourceError,
    },
    /// A status or result request failed; polling stopped and is not retried.
    #[error("{request} request for {job} failed: {source}")]
    PollFailed {
        job: JobHandle,
        request: PollRequest,
        #[source]
        source: SourceError,
    },
}
