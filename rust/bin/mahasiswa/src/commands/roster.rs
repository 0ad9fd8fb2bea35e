//! Roster commands: `mahasiswa list`, `mahasiswa seed`.

use anyhow::Result;
use mahasiswa::bff::request::{HomeEnterReq, HomeLeaveReq, RosterSeedReq};
use mahasiswa::bff::state::AppRoute;

use super::{App, Output};
use crate::render;

/// Enter the roster screen; fails when there is no local session.
async fn enter(app: &App) -> Result<()> {
    app.flux.emit(HomeEnterReq::PATH, HomeEnterReq).await;
    if app.route() != AppRoute::HOME {
        anyhow::bail!("Not logged in. Run `mahasiswa login` first.");
    }
    Ok(())
}

pub async fn list(app: &App, output: Output) -> Result<()> {
    enter(app).await?;
    let state = app.roster();
    app.flux.emit(HomeLeaveReq::PATH, HomeLeaveReq).await;

    if let Some(error) = &state.error {
        anyhow::bail!("{}", error);
    }
    render::roster(&state, output)
}

pub async fn seed(app: &App, output: Output) -> Result<()> {
    enter(app).await?;
    app.flux.emit(RosterSeedReq::PATH, RosterSeedReq).await;
    let state = app.roster();
    app.flux.emit(HomeLeaveReq::PATH, HomeLeaveReq).await;

    if let Some(error) = &state.error {
        anyhow::bail!("{}", error);
    }
    if output == Output::Table {
        println!("Semua data mahasiswa berhasil ditambahkan!");
    }
    render::roster(&state, output)
}
