use thiserror::Error;

/// Errors surfaced by the REST client.
///
/// Every non-success response is a `RequestFailed`; callers do not try to
/// tell transient failures from permanent ones.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("request failed ({status}): {message}")]
    RequestFailed {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn request_failed(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        ClientError::RequestFailed {
            status,
            message: message.into(),
            code,
        }
    }

    /// HTTP status of a failed request, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::RequestFailed { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
