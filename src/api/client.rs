use crate::api::error::ApiError;
use crate::api::models::{ContactRequest, ErrorBody, Lead, LeadStatus, StatusUpdate, TokenResponse};
use log::{debug, warn};
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};

/// Thin wrapper over the lead API. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(req: RequestBuilder, token: &str) -> RequestBuilder {
        req.bearer_auth(token)
    }

    /// Maps a response onto the error taxonomy. A 401 only means "session
    /// gone" on calls that carried a bearer token.
    async fn check(resp: Response, authenticated: bool) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if authenticated && status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let detail = match resp.json::<ErrorBody>().await {
            Ok(body) => body.message(),
            Err(e) => {
                debug!("error body from {status} not readable: {e}");
                None
            }
        };
        Err(ApiError::Rejected { status, detail })
    }

    /// `POST /token` with form-encoded credentials. Returns the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let resp = Self::check(resp, false).await?;
        let body: TokenResponse = resp.json().await.map_err(ApiError::Decode)?;
        Ok(body.access_token)
    }

    /// `GET /messages/`, in server order.
    pub async fn leads(&self, token: &str) -> Result<Vec<Lead>, ApiError> {
        let req = Self::with_auth(self.http.get(self.url("/messages/")), token);
        let resp = req.send().await.map_err(ApiError::Transport)?;
        let resp = Self::check(resp, true).await?;
        resp.json::<Vec<Lead>>().await.map_err(ApiError::Decode)
    }

    pub async fn update_status(&self, token: &str, id: i64, status: LeadStatus) -> Result<(), ApiError> {
        let endpoint = self.url(&format!("/messages/{id}/status"));
        let req = Self::with_auth(self.http.patch(&endpoint), token).json(&StatusUpdate { status });
        let resp = req.send().await.map_err(ApiError::Transport)?;
        Self::check(resp, true).await?;
        Ok(())
    }

    pub async fn delete_lead(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let endpoint = self.url(&format!("/messages/{id}"));
        let req = Self::with_auth(self.http.delete(&endpoint), token);
        let resp = req.send().await.map_err(ApiError::Transport)?;
        Self::check(resp, true).await?;
        Ok(())
    }

    /// `POST /contact/`. Public, no token.
    pub async fn submit_contact(&self, form: &ContactRequest) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/contact/"))
            .json(form)
            .send()
            .await
            .map_err(|e| {
                warn!("contact submission did not reach {}: {e}", self.base_url);
                ApiError::Transport(e)
            })?;
        Self::check(resp, false).await?;
        Ok(())
    }
}
