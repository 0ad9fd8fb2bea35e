//! Session reconciler: decides on screen entry whether the user counts as
//! logged in.
//!
//! The local session is authoritative. Remote auth-state notifications are
//! observed and logged but never clear the cache or force a redirect: the
//! identity service reports "no user" until its own session is restored,
//! which on a cold start routinely arrives after the screen has rendered.

use std::sync::Arc;

use crate::identity::{AuthWatch, IdentityService, RemoteUser};
use crate::session::{SessionCache, SessionSnapshot};

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// No usable local session; show the login form.
    Login,
    /// Local session present; continue with the cached user.
    Proceed(SessionSnapshot),
}

#[derive(Clone)]
pub struct SessionReconciler {
    cache: SessionCache,
    identity: Arc<dyn IdentityService>,
}

impl SessionReconciler {
    pub fn new(cache: SessionCache, identity: Arc<dyn IdentityService>) -> Self {
        Self { cache, identity }
    }

    /// Decide from the local cache alone. A session needs both the flag and
    /// a cached email.
    pub fn decide(&self) -> Gate {
        let snapshot = self.cache.read();
        if snapshot.is_logged_in && snapshot.email.is_some() {
            tracing::debug!(email = ?snapshot.email, "local session found");
            Gate::Proceed(snapshot)
        } else {
            tracing::debug!("no local session");
            Gate::Login
        }
    }

    /// Observe remote auth state for as long as the returned guard lives.
    pub fn watch(&self) -> AuthWatch {
        AuthWatch::subscribe(
            self.identity.clone(),
            Arc::new(|user: Option<&RemoteUser>| match user {
                Some(u) => tracing::info!(uid = %u.uid, "remote session confirmed"),
                None => tracing::info!("remote session not yet synchronized, keeping local session"),
            }),
        )
    }

    /// Guard check for a protected screen. On `Proceed` the watch is
    /// installed as well.
    pub fn enter(&self) -> (Gate, Option<AuthWatch>) {
        match self.decide() {
            Gate::Proceed(snapshot) => (Gate::Proceed(snapshot), Some(self.watch())),
            Gate::Login => (Gate::Login, None),
        }
    }
}
