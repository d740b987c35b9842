use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a remote catalog query.
///
/// Returned unchanged to whoever asked for the page; nothing in this crate
/// retries or translates it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the server rejected the credentials.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    /// HTTP status returned by the server, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
