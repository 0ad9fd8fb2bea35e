//! Command implementations.
//!
//! Every command wires the concrete clients into a Flux instance, emits the
//! screen requests a user would trigger and prints the resulting state.

pub mod roster;
pub mod session;

use std::sync::Arc;

use anyhow::Result;
use mahasiswa::bff::state::{AppRoute, AuthState, RosterState};
use mahasiswa::{FirebaseAuth, FirestoreRoster, MahasiswaContext, register_handlers};
use mahasiswa_flux::Flux;
use mahasiswa_kv::{KVStore, RedbStore};

use crate::config::AppConfig;

/// Output format selected with `-o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

impl Output {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Output::Table),
            "json" => Ok(Output::Json),
            other => anyhow::bail!("Unknown output format: {} (expected table or json)", other),
        }
    }
}

/// A wired-up client: screens on top of the configured backend.
pub struct App {
    pub flux: Flux,
    pub ctx: Arc<MahasiswaContext>,
}

impl App {
    pub fn open(config: &AppConfig) -> Result<Self> {
        let session_path = config.session_path();
        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %session_path.display(), "opening session store");
        let kv: Arc<dyn KVStore> = Arc::new(
            RedbStore::open(&session_path)
                .map_err(|e| anyhow::anyhow!("failed to open session store: {}", e))?,
        );

        let auth = Arc::new(FirebaseAuth::new(config.firebase.clone()));
        let roster = Arc::new(FirestoreRoster::new(&config.firebase, auth.clone()));
        let ctx = Arc::new(MahasiswaContext::new(kv, auth, roster));

        let flux = Flux::new();
        register_handlers(&flux, ctx.clone());
        Ok(Self { flux, ctx })
    }

    pub fn route(&self) -> String {
        self.flux
            .read::<AppRoute>(AppRoute::PATH)
            .map(|r| r.0)
            .unwrap_or_default()
    }

    pub fn auth(&self) -> Option<AuthState> {
        self.flux.read::<AuthState>(AuthState::PATH)
    }

    pub fn roster(&self) -> RosterState {
        self.flux
            .read::<RosterState>(RosterState::PATH)
            .unwrap_or_default()
    }
}
