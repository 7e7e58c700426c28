use crate::api::{ApiClient, ApiError};
use crate::session::Session;
use crate::storage::StoreError;
use log::{error, info, warn};
use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Why a sign-in did not produce a session. `Display` is the text shown
/// under the login form.
#[derive(Debug, Error)]
pub enum LoginFailure {
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Connection error. The request was blocked before reaching the server (firewall, proxy or network filter).")]
    ConnectionBlocked,
    #[error("Signed in, but the session could not be saved: {0}")]
    Storage(#[source] StoreError),
}

impl From<ApiError> for LoginFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(_) => LoginFailure::ConnectionBlocked,
            other => LoginFailure::InvalidCredentials(
                other.detail().unwrap_or(INVALID_CREDENTIALS).to_string(),
            ),
        }
    }
}

/// Exchanges credentials for a token and starts a new session with it.
/// Only the username is trimmed. On success the caller must build a fresh
/// dashboard; no view state from before the sign-in may be reused.
pub async fn sign_in(api: &ApiClient, session: &Session, username: &str, password: &str) -> Result<(), LoginFailure> {
    let username = username.trim();
    let token = match api.login(username, password).await {
        Ok(token) => token,
        Err(e) => {
            match &e {
                ApiError::Transport(inner) => error!("login request did not complete: {inner}"),
                other => warn!("login rejected: {other}"),
            }
            return Err(e.into());
        }
    };
    session.set_token(&token).map_err(LoginFailure::Storage)?;
    info!("signed in as {username}");
    Ok(())
}
