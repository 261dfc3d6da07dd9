use thiserror::Error;

/// Failure kinds surfaced by a summary fetch cycle.
///
/// Every component forwards the most specific kind unchanged; only
/// [`SummaryError::Transport`] is worth retrying.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The WBI key fragments could not be turned into a mixin key.
    #[error("invalid WBI key format: {0}")]
    InvalidKeyFormat(String),

    /// The session credential was rejected by the platform.
    #[error("session credential rejected (code {code}): {message}")]
    Auth { code: i64, message: String },

    /// The platform answered with a non-zero status code.
    #[error("API error {code}: {message}")]
    Api {
        code: i64,
        message: String,
        /// Raw response body, kept for diagnostics.
        body: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network failure, timeout or a non-success HTTP status.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl SummaryError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }

    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Platform status code carried by the error, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Auth { code, .. } | Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
