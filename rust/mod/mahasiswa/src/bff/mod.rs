//! Screen handlers and Flux wiring.
//!
//! `register_handlers` binds every request path to its handler, downcasting
//! the typed payload and passing the shared [`MahasiswaContext`].

pub mod handlers;
pub mod request;
pub mod state;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use mahasiswa_flux::{Flux, StateStore};
use mahasiswa_kv::KVStore;

use crate::auth::AuthActions;
use crate::identity::{AuthWatch, IdentityService};
use crate::reconciler::SessionReconciler;
use crate::roster::{Roster, RosterService};
use crate::session::SessionCache;

use self::request::*;
use self::state::*;

/// Marks an action as in flight. A second `begin` while the first guard is
/// alive returns `None`.
#[derive(Default)]
pub struct PendingFlag(AtomicBool);

pub struct PendingGuard<'a>(&'a AtomicBool);

impl PendingFlag {
    pub fn begin(&self) -> Option<PendingGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingGuard(&self.0))
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Everything the handlers need.
pub struct MahasiswaContext {
    pub session: SessionCache,
    pub reconciler: SessionReconciler,
    pub auth: AuthActions,
    pub roster: Roster,
    home_watch: Mutex<Option<AuthWatch>>,
    /// Bumped on every logout; roster results fetched under an older value
    /// are discarded.
    session_epoch: AtomicU64,
    pub(crate) login_pending: PendingFlag,
    pub(crate) register_pending: PendingFlag,
    pub(crate) seed_pending: PendingFlag,
    pub(crate) load_pending: PendingFlag,
}

impl MahasiswaContext {
    pub fn new(
        kv: Arc<dyn KVStore>,
        identity: Arc<dyn IdentityService>,
        roster: Arc<dyn RosterService>,
    ) -> Self {
        let session = SessionCache::new(kv);
        Self {
            reconciler: SessionReconciler::new(session.clone(), identity.clone()),
            auth: AuthActions::new(identity, session.clone()),
            roster: Roster::new(roster),
            session,
            home_watch: Mutex::new(None),
            session_epoch: AtomicU64::new(0),
            login_pending: PendingFlag::default(),
            register_pending: PendingFlag::default(),
            seed_pending: PendingFlag::default(),
            load_pending: PendingFlag::default(),
        }
    }

    /// Whether the roster screen currently holds an auth-state watch.
    pub fn is_watching(&self) -> bool {
        self.home_watch.lock().unwrap().is_some()
    }

    pub(crate) fn install_watch(&self, watch: Option<AuthWatch>) {
        // Replacing drops (and unsubscribes) any previous watch.
        *self.home_watch.lock().unwrap() = watch;
    }

    pub(crate) fn session_epoch(&self) -> u64 {
        self.session_epoch.load(Ordering::Acquire)
    }

    pub(crate) fn end_session(&self) {
        self.session_epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// True while the session that started a request at `epoch` is still
    /// the logged-in one.
    pub(crate) fn session_still_current(&self, epoch: u64) -> bool {
        self.session_epoch() == epoch && self.session.is_logged_in()
    }

    pub(crate) fn release_watch(&self) {
        let released = self.home_watch.lock().unwrap().take();
        drop(released);
    }
}

/// Register all handlers with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<MahasiswaContext>) {
    // app/initialize
    {
        let ctx = ctx.clone();
        flux.on(InitializeReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                handlers::handle_initialize(&store, &ctx).await;
                // Splash hands over to the roster screen.
                let route = store.read::<AppRoute>(AppRoute::PATH);
                if route.as_ref().map(AppRoute::as_str) == Some(AppRoute::HOME)
                    && handlers::handle_home_enter(&store, &ctx).await
                {
                    handlers::handle_roster_load(&store, &ctx).await;
                }
            }
        });
    }

    // auth/toggle-mode
    flux.on(ToggleModeReq::PATH, |_, _, store: Arc<StateStore>| async move {
        handlers::handle_toggle_mode(&store).await;
    });

    // auth/login
    {
        let ctx = ctx.clone();
        flux.on(LoginReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(req) = payload.downcast_ref::<LoginReq>() else {
                    tracing::warn!("auth/login: unexpected payload type");
                    return;
                };
                handlers::handle_login(req, &store, &ctx).await;
                // Enter the roster screen after a successful login.
                let auth = store.read::<AuthState>(AuthState::PATH);
                if auth.is_some_and(|a| a.phase == AuthPhase::Authenticated)
                    && handlers::handle_home_enter(&store, &ctx).await
                {
                    handlers::handle_roster_load(&store, &ctx).await;
                }
            }
        });
    }

    // auth/register
    {
        let ctx = ctx.clone();
        flux.on(RegisterReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(req) = payload.downcast_ref::<RegisterReq>() else {
                    tracing::warn!("auth/register: unexpected payload type");
                    return;
                };
                handlers::handle_register(req, &store, &ctx).await;
            }
        });
    }

    // auth/logout
    {
        let ctx = ctx.clone();
        flux.on(LogoutReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                handlers::handle_logout(&store, &ctx).await;
            }
        });
    }

    // home/enter
    {
        let ctx = ctx.clone();
        flux.on(HomeEnterReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if handlers::handle_home_enter(&store, &ctx).await {
                    handlers::handle_roster_load(&store, &ctx).await;
                }
            }
        });
    }

    // home/leave
    {
        let ctx = ctx.clone();
        flux.on(HomeLeaveReq::PATH, move |_, _, _store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                handlers::handle_home_leave(&ctx).await;
            }
        });
    }

    // roster/load
    {
        let ctx = ctx.clone();
        flux.on(RosterLoadReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                let Some(_pending) = ctx.load_pending.begin() else {
                    tracing::debug!("roster load already in progress, ignoring");
                    return;
                };
                handlers::handle_roster_load(&store, &ctx).await;
            }
        });
    }

    // roster/seed
    flux.on(RosterSeedReq::PATH, move |_, _, store: Arc<StateStore>| {
        let ctx = ctx.clone();
        async move {
            handlers::handle_roster_seed(&store, &ctx).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_flag_rejects_second_begin() {
        let flag = PendingFlag::default();
        let first = flag.begin();
        assert!(first.is_some());
        assert!(flag.begin().is_none());
        assert!(flag.is_pending());

        drop(first);
        assert!(!flag.is_pending());
        assert!(flag.begin().is_some());
    }
}
