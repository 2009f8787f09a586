use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop a lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The geocoder answered, but had no match for the query.
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    /// The request was rejected before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures talking to a remote API, or making sense of what it sent back.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::Transport(TransportError::Malformed(msg.into()))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(TransportError::Http(err))
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(TransportError::Decode(err))
    }
}

/// Cut an error body down to something printable.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
