//! Flux: path-addressed screen state with pub/sub.
//!
//! Rust owns the state and the logic behind every screen; a front-end only
//! reads state and emits requests.
//!
//! # Three Primitives
//!
//! - `get(path)`: read state at a path, Arc zero-copy
//! - `emit(path, payload)`: send a request to the handler(s) registered for it
//! - `subscribe(pattern)`: observe state changes
//!
//! # Paths
//!
//! State and requests share a flat `/`-separated namespace:
//! - State: `app/route`, `auth/state`, `roster/state`
//! - Requests: `app/initialize`, `auth/login`, `roster/load`
//!
//! Patterns accept MQTT-style wildcards: `+` matches one level, `#` matches
//! any remaining levels (including none).
//!
//! # Example
//!
//! ```ignore
//! use mahasiswa_flux::Flux;
//!
//! let app = Flux::new();
//!
//! app.on("app/initialize", |_, _, store| async move {
//!     store.set("app/route", "/login".to_string());
//! });
//!
//! app.subscribe("app/#", |path, _| println!("state changed: {}", path));
//!
//! app.emit("app/initialize", ()).await;
//! ```

pub mod app;
pub mod pattern;
pub mod router;
pub mod store;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Router};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
