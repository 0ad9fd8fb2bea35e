//! Student roster client.
//!
//! A locally persisted login session, reconciled against a hosted identity
//! service, gating access to a remotely stored roster of students.
//!
//! # Layers
//!
//! - [`session`]: the local session record on top of a `KVStore`
//! - [`identity`]: remote identity service seam (Firebase REST, in-memory)
//! - [`reconciler`]: screen-entry guard that trusts the local session
//! - [`auth`]: sign-in / sign-up / sign-out actions
//! - [`roster`]: roster query and sample seeding (Firestore REST, in-memory)
//! - [`bff`]: screen state and request handlers on the Flux engine

pub mod auth;
pub mod bff;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod reconciler;
pub mod roster;
pub mod session;

pub use auth::AuthActions;
pub use bff::{MahasiswaContext, register_handlers};
pub use client::{ApiError, NoAuth, StaticToken, TokenSource};
pub use config::FirebaseConfig;
pub use error::{ActionError, AuthError, RosterError, ValidationError};
pub use identity::{AuthWatch, FirebaseAuth, IdentityService, MemoryIdentity, RemoteUser};
pub use reconciler::{Gate, SessionReconciler};
pub use roster::{FirestoreRoster, Mahasiswa, MemoryRoster, NewMahasiswa, Roster, RosterService};
pub use session::{SessionCache, SessionSnapshot};
