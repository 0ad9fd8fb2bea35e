//! Request handler implementations.
//!
//! Each handler reads what it needs from the store, calls into the
//! application components and writes the resulting screen state back.

use mahasiswa_flux::StateStore;

use crate::bff::MahasiswaContext;
use crate::bff::request::*;
use crate::bff::state::*;
use crate::reconciler::Gate;

pub const LOGIN_NOTICE: &str = "Login berhasil!";
pub const REGISTER_NOTICE: &str = "Registrasi berhasil! Silakan login.";

fn auth_state(store: &StateStore) -> AuthState {
    store
        .read::<AuthState>(AuthState::PATH)
        .unwrap_or_else(AuthState::signed_out)
}

fn set_route(store: &StateStore, route: &str) {
    store.set(AppRoute::PATH, AppRoute::new(route));
}

/// Handle `app/initialize` (splash).
pub async fn handle_initialize(store: &StateStore, ctx: &MahasiswaContext) {
    set_route(store, AppRoute::SPLASH);
    match ctx.reconciler.decide() {
        Gate::Proceed(snapshot) => {
            let state = SessionUser::from_snapshot(&snapshot)
                .map(AuthState::signed_in)
                .unwrap_or_else(AuthState::signed_out);
            store.set(AuthState::PATH, state);
            set_route(store, AppRoute::HOME);
        }
        Gate::Login => {
            store.set(AuthState::PATH, AuthState::signed_out());
            set_route(store, AppRoute::LOGIN);
        }
    }
}

/// Handle `auth/toggle-mode`.
pub async fn handle_toggle_mode(store: &StateStore) {
    let mut state = auth_state(store);
    if state.busy {
        return;
    }
    state.mode = match state.mode {
        FormMode::Login => FormMode::Register,
        FormMode::Register => FormMode::Login,
    };
    state.error = None;
    state.notice = None;
    store.set(AuthState::PATH, state);
}

/// Handle `auth/login`.
pub async fn handle_login(req: &LoginReq, store: &StateStore, ctx: &MahasiswaContext) {
    let Some(_pending) = ctx.login_pending.begin() else {
        tracing::debug!("login already in progress, ignoring");
        return;
    };

    let mut state = auth_state(store);
    state.busy = true;
    state.error = None;
    state.notice = None;
    store.set(AuthState::PATH, state.clone());

    match ctx.auth.sign_in(&req.email, &req.password).await {
        Ok(snapshot) => {
            let mut next = SessionUser::from_snapshot(&snapshot)
                .map(AuthState::signed_in)
                .unwrap_or_else(AuthState::signed_out);
            next.notice = Some(LOGIN_NOTICE.into());
            store.set(AuthState::PATH, next);
            set_route(store, AppRoute::HOME);
        }
        Err(e) => {
            state.busy = false;
            state.error = Some(e.user_message());
            store.set(AuthState::PATH, state);
        }
    }
}

/// Handle `auth/register`.
pub async fn handle_register(req: &RegisterReq, store: &StateStore, ctx: &MahasiswaContext) {
    let Some(_pending) = ctx.register_pending.begin() else {
        tracing::debug!("registration already in progress, ignoring");
        return;
    };

    let mut state = auth_state(store);
    state.busy = true;
    state.error = None;
    state.notice = None;
    store.set(AuthState::PATH, state.clone());

    state.busy = false;
    match ctx.auth.sign_up(&req.email, &req.password).await {
        Ok(_) => {
            state.mode = FormMode::Login;
            state.notice = Some(REGISTER_NOTICE.into());
        }
        Err(e) => state.error = Some(e.user_message()),
    }
    store.set(AuthState::PATH, state);
}

/// Handle `auth/logout`.
pub async fn handle_logout(store: &StateStore, ctx: &MahasiswaContext) {
    ctx.end_session();
    ctx.release_watch();

    let mut state = AuthState::signed_out();
    if let Err(e) = ctx.auth.sign_out().await {
        state.error = Some(e.user_message());
    }
    store.set(AuthState::PATH, state);
    store.remove(RosterState::PATH);
    set_route(store, AppRoute::LOGIN);
}

/// Handle `home/enter`. Returns true when the screen may show the roster.
pub async fn handle_home_enter(store: &StateStore, ctx: &MahasiswaContext) -> bool {
    let (gate, watch) = ctx.reconciler.enter();
    match gate {
        Gate::Proceed(snapshot) => {
            ctx.install_watch(watch);
            let current = auth_state(store);
            if current.phase != AuthPhase::Authenticated {
                if let Some(user) = SessionUser::from_snapshot(&snapshot) {
                    store.set(AuthState::PATH, AuthState::signed_in(user));
                }
            }
            set_route(store, AppRoute::HOME);
            true
        }
        Gate::Login => {
            ctx.release_watch();
            store.set(AuthState::PATH, AuthState::signed_out());
            set_route(store, AppRoute::LOGIN);
            false
        }
    }
}

/// Handle `home/leave`.
pub async fn handle_home_leave(ctx: &MahasiswaContext) {
    ctx.release_watch();
}

/// Handle `roster/load`. A failed load keeps the items already shown.
/// Results that arrive after the session ended are dropped.
pub async fn handle_roster_load(store: &StateStore, ctx: &MahasiswaContext) {
    if !ctx.session.is_logged_in() {
        tracing::debug!("roster load without a session, ignoring");
        return;
    }
    let epoch = ctx.session_epoch();

    let mut state = store
        .read::<RosterState>(RosterState::PATH)
        .unwrap_or_default();
    state.loading = true;
    store.set(RosterState::PATH, state.clone());

    let result = ctx.roster.list().await;
    if !ctx.session_still_current(epoch) {
        tracing::debug!("session ended during roster load, discarding result");
        return;
    }

    state.loading = false;
    match result {
        Ok(items) => {
            state.items = items;
            state.error = None;
        }
        Err(e) => {
            tracing::error!(error = %e, "roster load failed");
            state.error = Some(e.user_message());
        }
    }
    store.set(RosterState::PATH, state);
}

/// Handle `roster/seed`: insert the samples, then reload.
pub async fn handle_roster_seed(store: &StateStore, ctx: &MahasiswaContext) {
    if !ctx.session.is_logged_in() {
        tracing::debug!("roster seed without a session, ignoring");
        return;
    }
    let Some(_pending) = ctx.seed_pending.begin() else {
        tracing::debug!("seeding already in progress, ignoring");
        return;
    };
    let epoch = ctx.session_epoch();

    let mut state = store
        .read::<RosterState>(RosterState::PATH)
        .unwrap_or_default();
    state.seeding = true;
    store.set(RosterState::PATH, state);

    let seeded = ctx.roster.seed_samples().await;
    handle_roster_load(store, ctx).await;
    if !ctx.session_still_current(epoch) {
        tracing::debug!("session ended during seeding, discarding result");
        return;
    }

    let mut state = store
        .read::<RosterState>(RosterState::PATH)
        .unwrap_or_default();
    state.seeding = false;
    if let Err(e) = seeded {
        state.error = Some(e.user_message());
    }
    store.set(RosterState::PATH, state);
}
