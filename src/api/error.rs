use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (unreachable host, TLS, blocked).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// 401 on an authenticated call. The session is no longer usable.
    #[error("session expired or not authorized")]
    Unauthorized,
    #[error("server returned {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
