//! HTTP plumbing shared by the Firebase clients.
//!
//! Authentication of data requests is handled by pluggable [`TokenSource`]
//! implementations. The identity client is itself a token source once a user
//! has signed in.

use serde::Deserialize;
use serde::de::DeserializeOwned;

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// The service's own error text: the `error.message` field of a Google
    /// API error body when present, otherwise the display form.
    pub fn service_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => extract_error_message(message)
                .unwrap_or_else(|| message.clone()),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull `error.message` out of a `{"error": {"code": 400, "message": ...}}` body.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Parse an API response, mapping HTTP errors to `ApiError`.
pub(crate) async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: code,
            message: body,
        });
    }
    resp.json::<R>()
        .await
        .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Pluggable token provider. Called before every data request.
///
/// Returns `Ok(None)` to skip the Authorization header (anonymous).
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// No authentication: anonymous requests.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Static bearer token (already obtained externally).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

/// Attach the bearer token, if any, to a request.
pub(crate) async fn authed(
    tokens: &dyn TokenSource,
    builder: reqwest::RequestBuilder,
) -> Result<reqwest::RequestBuilder, ApiError> {
    match tokens.token().await? {
        Some(token) => Ok(builder.bearer_auth(token)),
        None => Ok(builder),
    }
}
