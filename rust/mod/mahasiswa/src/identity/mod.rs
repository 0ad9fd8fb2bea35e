//! Remote identity service seam.
//!
//! [`IdentityService`] is what the reconciler and the auth actions talk to.
//! `firebase` speaks the hosted REST API; `memory` is an in-process stand-in.

pub mod firebase;
pub mod memory;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub use firebase::FirebaseAuth;
pub use memory::MemoryIdentity;

/// User as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Auth-state callback: `Some(user)` when a remote session exists, `None`
/// when the service has no (or not yet any) signed-in user.
pub type AuthListener = Arc<dyn Fn(Option<&RemoteUser>) + Send + Sync>;

/// Handle returned by [`IdentityService::on_auth_state_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[async_trait::async_trait]
pub trait IdentityService: Send + Sync + 'static {
    /// Email/password sign-in.
    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<RemoteUser, AuthError>;

    /// Create an account. The service may sign the new user in remotely;
    /// callers must not treat that as a local session.
    async fn create_account_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RemoteUser, AuthError>;

    /// End the remote session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// User currently signed in on the remote side, if known.
    fn current_user(&self) -> Option<RemoteUser>;

    /// Register an auth-state listener. It fires once with the current
    /// state and then on every change until unsubscribed.
    fn on_auth_state_changed(&self, listener: AuthListener) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

/// Listener registry shared by the identity implementations.
#[derive(Default)]
pub struct AuthListeners {
    entries: RwLock<Vec<(ListenerId, AuthListener)>>,
    next_id: AtomicU64,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: AuthListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.entries.write().unwrap().push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|(lid, _)| *lid != id);
        entries.len() < before
    }

    /// Call every listener. The list is copied first so a listener may
    /// unsubscribe from inside its callback.
    pub fn notify(&self, user: Option<&RemoteUser>) {
        let listeners: Vec<AuthListener> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(user);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live auth-state subscription. Dropping it unsubscribes, so no callback
/// outlives the screen that created it.
pub struct AuthWatch {
    identity: Arc<dyn IdentityService>,
    id: ListenerId,
}

impl AuthWatch {
    pub fn subscribe(identity: Arc<dyn IdentityService>, listener: AuthListener) -> Self {
        let id = identity.on_auth_state_changed(listener);
        Self { identity, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for AuthWatch {
    fn drop(&mut self) {
        self.identity.unsubscribe(self.id);
        tracing::debug!(id = self.id.0, "auth watch released");
    }
}
