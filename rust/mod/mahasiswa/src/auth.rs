//! Sign-in, sign-up and sign-out actions.

use std::sync::Arc;

use crate::error::{ActionError, AuthError, ValidationError};
use crate::identity::{IdentityService, RemoteUser};
use crate::session::{SessionCache, SessionSnapshot};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Presence and length checks done before any remote call.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

#[derive(Clone)]
pub struct AuthActions {
    identity: Arc<dyn IdentityService>,
    cache: SessionCache,
}

impl AuthActions {
    pub fn new(identity: Arc<dyn IdentityService>, cache: SessionCache) -> Self {
        Self { identity, cache }
    }

    /// Sign in and record the session locally. A failure leaves any prior
    /// session untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionSnapshot, ActionError> {
        validate_credentials(email, password)?;

        let user = self
            .identity
            .sign_in_with_password(email, password)
            .await
            .inspect_err(|e| tracing::warn!(code = e.code(), "sign-in failed"))?;

        let stored_email = user.email.as_deref().unwrap_or(email);
        self.cache
            .save(&user.uid, stored_email, user.display_name.as_deref());
        tracing::info!(uid = %user.uid, "login succeeded");

        Ok(SessionSnapshot {
            user_id: Some(user.uid.clone()),
            email: Some(stored_email.to_string()),
            user_name: user.display_name.clone(),
            is_logged_in: true,
        })
    }

    /// Create an account. The local session is not touched; the user still
    /// has to sign in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<RemoteUser, ActionError> {
        validate_credentials(email, password)?;
        let user = self
            .identity
            .create_account_with_password(email, password)
            .await
            .inspect_err(|e| tracing::warn!(code = e.code(), "sign-up failed"))?;
        tracing::info!(uid = %user.uid, "account registered");
        Ok(user)
    }

    /// Remote sign-out, then clear the local session regardless of the
    /// outcome. The remote error, if any, is still returned.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let remote = self.identity.sign_out().await;
        if let Err(e) = &remote {
            tracing::warn!(error = %e, "remote sign-out failed, clearing local session anyway");
        }
        self.cache.clear();
        remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentity;
    use mahasiswa_kv::MemoryKV;

    fn setup() -> (Arc<MemoryIdentity>, SessionCache, AuthActions) {
        let identity = Arc::new(
            MemoryIdentity::new().with_account("eko@example.com", "secret1", None),
        );
        let cache = SessionCache::new(Arc::new(MemoryKV::new()));
        let actions = AuthActions::new(identity.clone(), cache.clone());
        (identity, cache, actions)
    }

    #[test]
    fn validation_rules() {
        assert_eq!(validate_credentials("", "secret1"), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_credentials("eko@example.com", ""), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_credentials("eko@example.com", "12345"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_credentials("eko@example.com", "123456"), Ok(()));
        // Only presence is checked; the service judges the address.
        assert_eq!(validate_credentials(" ", "123456"), Ok(()));
    }

    #[tokio::test]
    async fn email_is_sent_as_typed() {
        let (identity, cache, actions) = setup();
        assert!(actions.sign_in(" eko@example.com", "secret1").await.is_err());
        assert_eq!(identity.remote_calls(), 1);
        assert!(!cache.is_logged_in());
    }

    #[tokio::test]
    async fn short_password_never_reaches_service() {
        let (identity, cache, actions) = setup();
        let err = actions.sign_in("eko@example.com", "abcde").await.unwrap_err();

        assert_eq!(err.user_message(), "Password minimal 6 karakter");
        assert_eq!(identity.remote_calls(), 0);
        assert!(!cache.is_logged_in());
    }

    #[tokio::test]
    async fn sign_in_saves_session() {
        let (_, cache, actions) = setup();
        let snapshot = actions.sign_in("eko@example.com", "secret1").await.unwrap();

        assert_eq!(snapshot.email.as_deref(), Some("eko@example.com"));
        assert_eq!(cache.read(), snapshot);
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_prior_session() {
        let (_, cache, actions) = setup();
        cache.save("uid-budi", "budi@example.com", Some("Budi"));

        let err = actions.sign_in("eko@example.com", "wrong!!").await.unwrap_err();
        assert_eq!(err.user_message(), "Password salah");
        assert_eq!(cache.read().email.as_deref(), Some("budi@example.com"));
    }

    #[tokio::test]
    async fn sign_up_does_not_create_local_session() {
        let (identity, cache, actions) = setup();
        actions.sign_up("dewi@example.com", "rahasia").await.unwrap();

        // Remote side is signed in, local side is not.
        assert!(identity.current_user().is_some());
        assert!(!cache.is_logged_in());

        let err = actions.sign_up("eko@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.user_message(), "Email sudah terdaftar");
    }

    #[tokio::test]
    async fn sign_out_clears_even_when_remote_fails() {
        let (identity, cache, actions) = setup();
        actions.sign_in("eko@example.com", "secret1").await.unwrap();
        identity.set_fail_sign_out(true);

        assert!(actions.sign_out().await.is_err());
        assert!(!cache.is_logged_in());
        assert_eq!(cache.read(), SessionSnapshot::default());
    }

    #[tokio::test]
    async fn offline_maps_to_network_message() {
        let (identity, _, actions) = setup();
        identity.set_offline(true);
        let err = actions.sign_in("eko@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.user_message(), "Koneksi internet bermasalah");
    }
}
