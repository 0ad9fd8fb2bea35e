//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Mirrors what the hosted web SDK does for email/password accounts:
//! sign-in and sign-up return an ID token plus a refresh token, sign-up
//! leaves the new user signed in, sign-out only forgets the tokens locally.

use std::sync::RwLock;

use serde::Deserialize;

use crate::client::{self, ApiError, TokenSource};
use crate::config::FirebaseConfig;
use crate::error::AuthError;
use crate::identity::{AuthListener, AuthListeners, IdentityService, ListenerId, RemoteUser};

/// Seconds shaved off every token lifetime so a token is never sent right
/// at its expiry.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

struct SignedIn {
    user: RemoteUser,
    id_token: String,
    refresh_token: String,
    /// Absolute expiry timestamp (seconds since epoch).
    expires_at: i64,
}

fn expires_at(expires_in: &str) -> i64 {
    let secs = expires_in.parse::<i64>().unwrap_or(0);
    chrono::Utc::now().timestamp() + secs - EXPIRY_MARGIN_SECS
}

/// Identity client for one Firebase project.
pub struct FirebaseAuth {
    http: reqwest::Client,
    config: FirebaseConfig,
    state: RwLock<Option<SignedIn>>,
    listeners: AuthListeners,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl FirebaseAuth {
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            state: RwLock::new(None),
            listeners: AuthListeners::new(),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.config.identity_url.trim_end_matches('/'),
            method,
            self.config.api_key
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/v1/token?key={}",
            self.config.secure_token_url.trim_end_matches('/'),
            self.config.api_key
        )
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<RemoteUser, AuthError> {
        let resp = self
            .http
            .post(self.accounts_url(method))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(ApiError::from)?;
        let account: AccountResponse = client::parse(resp).await?;

        let user = RemoteUser {
            uid: account.local_id,
            email: account.email,
            display_name: account.display_name.filter(|n| !n.is_empty()),
        };
        self.replace_state(Some(SignedIn {
            user: user.clone(),
            id_token: account.id_token,
            refresh_token: account.refresh_token,
            expires_at: expires_at(&account.expires_in),
        }));
        Ok(user)
    }

    fn replace_state(&self, next: Option<SignedIn>) {
        let user = next.as_ref().map(|s| s.user.clone());
        *self.state.write().unwrap() = next;
        self.listeners.notify(user.as_ref());
    }

    /// Valid ID token for the signed-in user, if the cached one has not
    /// expired.
    fn fresh_token(&self) -> Option<String> {
        let state = self.state.read().unwrap();
        state
            .as_ref()
            .filter(|s| chrono::Utc::now().timestamp() < s.expires_at)
            .map(|s| s.id_token.clone())
    }

    async fn refresh(&self) -> Result<Option<String>, ApiError> {
        let refresh_token = {
            let state = self.state.read().unwrap();
            match state.as_ref() {
                Some(s) => s.refresh_token.clone(),
                None => return Ok(None),
            }
        };

        tracing::debug!("refreshing ID token");
        let resp = self
            .http
            .post(self.token_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?;
        let fresh: RefreshResponse = client::parse(resp).await.map_err(|e| {
            ApiError::Auth(format!("token refresh failed: {}", e.service_message()))
        })?;

        let mut state = self.state.write().unwrap();
        match state.as_mut() {
            Some(s) => {
                s.id_token = fresh.id_token.clone();
                s.refresh_token = fresh.refresh_token;
                s.expires_at = expires_at(&fresh.expires_in);
                Ok(Some(fresh.id_token))
            }
            // Signed out while the refresh was in flight.
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl IdentityService for FirebaseAuth {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteUser, AuthError> {
        let user = self.password_call("signInWithPassword", email, password).await?;
        tracing::info!(uid = %user.uid, "signed in");
        Ok(user)
    }

    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteUser, AuthError> {
        let user = self.password_call("signUp", email, password).await?;
        tracing::info!(uid = %user.uid, "account created");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.replace_state(None);
        tracing::info!("signed out");
        Ok(())
    }

    fn current_user(&self) -> Option<RemoteUser> {
        self.state.read().unwrap().as_ref().map(|s| s.user.clone())
    }

    fn on_auth_state_changed(&self, listener: AuthListener) -> ListenerId {
        let id = self.listeners.add(listener.clone());
        listener(self.current_user().as_ref());
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

#[async_trait::async_trait]
impl TokenSource for FirebaseAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        // Fast path: cached token still valid.
        if let Some(token) = self.fresh_token() {
            return Ok(Some(token));
        }

        // Slow path: one refresh at a time, re-check after acquiring.
        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.fresh_token() {
            return Ok(Some(token));
        }
        self.refresh().await
    }
}
