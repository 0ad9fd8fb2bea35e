//! Screen state types, one per state path.

use serde::Serialize;

use crate::roster::Mahasiswa;
use crate::session::SessionSnapshot;

/// Navigation route: stored at `app/route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRoute(pub String);

impl AppRoute {
    pub const PATH: &'static str = "app/route";

    pub const SPLASH: &'static str = "/";
    pub const LOGIN: &'static str = "/login";
    pub const HOME: &'static str = "/home";

    pub fn new(route: &str) -> Self {
        Self(route.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthPhase {
    Unauthenticated,
    Authenticated,
}

/// Which variant of the credentials form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormMode {
    #[default]
    Login,
    Register,
}

/// Signed-in user as shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl SessionUser {
    /// Header greeting: display name, else email.
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Option<Self> {
        Some(Self {
            id: snapshot.user_id.clone().unwrap_or_default(),
            email: snapshot.email.clone()?,
            display_name: snapshot.user_name.clone(),
        })
    }
}

/// Authentication state: stored at `auth/state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub phase: AuthPhase,
    pub mode: FormMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Success notification, e.g. after registering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl AuthState {
    pub const PATH: &'static str = "auth/state";

    pub fn signed_out() -> Self {
        Self {
            phase: AuthPhase::Unauthenticated,
            mode: FormMode::Login,
            user: None,
            busy: false,
            error: None,
            notice: None,
        }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            user: Some(user),
            ..Self::signed_out()
        }
    }
}

/// Roster list: stored at `roster/state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterState {
    pub items: Vec<Mahasiswa>,
    pub loading: bool,
    pub seeding: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RosterState {
    pub const PATH: &'static str = "roster/state";

    /// True when a load finished with nothing to show; the screen then
    /// offers to add the sample data.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.items.is_empty() && self.error.is_none()
    }
}
