use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::AuthError;
use crate::identity::{AuthListener, AuthListeners, IdentityService, ListenerId, RemoteUser};

struct Account {
    uid: String,
    password: String,
    display_name: Option<String>,
}

/// In-process identity service with the same rules as the hosted one:
/// emails need an `@`, passwords at least six characters, one account per
/// email. Sign-up signs the new user in.
///
/// Also lets tests simulate an unreachable network, a failing sign-out and
/// arbitrary auth-state notifications.
#[derive(Default)]
pub struct MemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<RemoteUser>>,
    listeners: AuthListeners,
    remote_calls: AtomicUsize,
    offline: AtomicBool,
    fail_sign_out: AtomicBool,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register an account.
    pub fn with_account(self, email: &str, password: &str, display_name: Option<&str>) -> Self {
        let uid = format!("uid-{}", self.accounts.read().unwrap().len() + 1);
        self.accounts.write().unwrap().insert(
            email.to_string(),
            Account {
                uid,
                password: password.to_string(),
                display_name: display_name.map(str::to_string),
            },
        );
        self
    }

    /// Number of sign-in / sign-up / sign-out calls received.
    pub fn remote_calls(&self) -> usize {
        self.remote_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Make every remote call fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make `sign_out` fail; the remote user stays signed in.
    pub fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Push an auth-state notification without changing the current user.
    pub fn announce(&self, user: Option<RemoteUser>) {
        self.listeners.notify(user.as_ref());
    }

    fn begin_call(&self) -> Result<(), AuthError> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::Network("network unreachable".into()));
        }
        Ok(())
    }

    fn set_current(&self, user: Option<RemoteUser>) {
        *self.current.write().unwrap() = user.clone();
        self.listeners.notify(user.as_ref());
    }
}

#[async_trait::async_trait]
impl IdentityService for MemoryIdentity {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteUser, AuthError> {
        self.begin_call()?;
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        let user = {
            let accounts = self.accounts.read().unwrap();
            let account = accounts.get(email).ok_or(AuthError::UserNotFound)?;
            if account.password != password {
                return Err(AuthError::WrongPassword);
            }
            RemoteUser {
                uid: account.uid.clone(),
                email: Some(email.to_string()),
                display_name: account.display_name.clone(),
            }
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteUser, AuthError> {
        self.begin_call()?;
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < 6 {
            return Err(AuthError::WeakPassword);
        }
        let user = {
            let mut accounts = self.accounts.write().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            let uid = format!("uid-{}", accounts.len() + 1);
            accounts.insert(
                email.to_string(),
                Account {
                    uid: uid.clone(),
                    password: password.to_string(),
                    display_name: None,
                },
            );
            RemoteUser {
                uid,
                email: Some(email.to_string()),
                display_name: None,
            }
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.begin_call()?;
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::Other {
                code: "auth/internal-error".into(),
                message: "sign-out rejected".into(),
            });
        }
        self.set_current(None);
        Ok(())
    }

    fn current_user(&self) -> Option<RemoteUser> {
        self.current.read().unwrap().clone()
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn sign_in_checks_credentials() {
        let identity = MemoryIdentity::new().with_account("eko@example.com", "secret1", Some("Eko"));

        assert_eq!(
            identity.sign_in_with_password("nobody@example.com", "secret1").await,
            Err(AuthError::UserNotFound)
        );
        assert_eq!(
            identity.sign_in_with_password("eko@example.com", "wrong!!").await,
            Err(AuthError::WrongPassword)
        );
        assert_eq!(
            identity.sign_in_with_password("not-an-email", "secret1").await,
            Err(AuthError::InvalidEmail)
        );

        let user = identity.sign_in_with_password("eko@example.com", "secret1").await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Eko"));
        assert_eq!(identity.current_user(), Some(user));
        assert_eq!(identity.remote_calls(), 4);
    }

    #[tokio::test]
    async fn create_account_rules() {
        let identity = MemoryIdentity::new().with_account("eko@example.com", "secret1", None);

        assert_eq!(
            identity.create_account_with_password("eko@example.com", "secret1").await,
            Err(AuthError::EmailAlreadyInUse)
        );
        assert_eq!(
            identity.create_account_with_password("dewi@example.com", "12345").await,
            Err(AuthError::WeakPassword)
        );
        let user = identity
            .create_account_with_password("dewi@example.com", "123456")
            .await
            .unwrap();
        assert_eq!(user.email.as_deref(), Some("dewi@example.com"));
    }

    #[tokio::test]
    async fn offline_fails_with_network_error() {
        let identity = MemoryIdentity::new().with_account("eko@example.com", "secret1", None);
        identity.set_offline(true);
        assert!(matches!(
            identity.sign_in_with_password("eko@example.com", "secret1").await,
            Err(AuthError::Network(_))
        ));
    }

    #[tokio::test]
    async fn listener_fires_immediately_and_on_change() {
        let identity = MemoryIdentity::new().with_account("eko@example.com", "secret1", None);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        identity.on_auth_state_changed(Arc::new(move |u: Option<&RemoteUser>| {
            s.lock().unwrap().push(u.is_some());
        }));

        identity.sign_in_with_password("eko@example.com", "secret1").await.unwrap();
        identity.sign_out().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
    }
}
