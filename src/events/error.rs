use thiserror::Error;

/// Failure of a whole `fetch_events` call
#[derive(Debug, Clone, Error)]
pub enum EventServiceError {
    #[error("contest API request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("invalid API response format: {0}")]
    InvalidResponse(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
    #[error("platform table could not be loaded: {0}")]
    Platforms(String),
}

impl EventServiceError {
    /// Timeout or connection-level failure; no response was read.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }

    /// A response arrived but did not have the expected shape.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. } | Self::InvalidResponse(_))
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> EventServiceError {
    if e.is_timeout() {
        EventServiceError::Timeout
    } else {
        EventServiceError::Transport(e.to_string())
    }
}

/// Failure of a single contest record; never escapes the batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable timestamp `{value}` in `{field}`")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("malformed record: {0}")]
    Malformed(String),
}
