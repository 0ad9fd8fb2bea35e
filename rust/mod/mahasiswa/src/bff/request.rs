//! Screen requests, one type per request path.

/// Splash: decide the first route.
#[derive(Debug, Clone)]
pub struct InitializeReq;

impl InitializeReq {
    pub const PATH: &'static str = "app/initialize";
}

/// Switch the credentials form between login and register.
#[derive(Debug, Clone)]
pub struct ToggleModeReq;

impl ToggleModeReq {
    pub const PATH: &'static str = "auth/toggle-mode";
}

/// Login with email + password.
#[derive(Debug, Clone)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

impl LoginReq {
    pub const PATH: &'static str = "auth/login";
}

/// Register a new account.
#[derive(Debug, Clone)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
}

impl RegisterReq {
    pub const PATH: &'static str = "auth/register";
}

/// Logout: remote sign-out and clear the local session.
#[derive(Debug, Clone)]
pub struct LogoutReq;

impl LogoutReq {
    pub const PATH: &'static str = "auth/logout";
}

/// Roster screen became active.
#[derive(Debug, Clone)]
pub struct HomeEnterReq;

impl HomeEnterReq {
    pub const PATH: &'static str = "home/enter";
}

/// Roster screen is no longer active.
#[derive(Debug, Clone)]
pub struct HomeLeaveReq;

impl HomeLeaveReq {
    pub const PATH: &'static str = "home/leave";
}

/// Load (or refresh) the roster.
#[derive(Debug, Clone)]
pub struct RosterLoadReq;

impl RosterLoadReq {
    pub const PATH: &'static str = "roster/load";
}

/// Insert the sample records, then reload.
#[derive(Debug, Clone)]
pub struct RosterSeedReq;

impl RosterSeedReq {
    pub const PATH: &'static str = "roster/seed";
}
