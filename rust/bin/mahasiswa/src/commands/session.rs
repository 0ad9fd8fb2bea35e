//! Status / login / register / logout commands.

use anyhow::Result;
use mahasiswa::bff::request::{InitializeReq, LoginReq, LogoutReq, RegisterReq, ToggleModeReq};
use mahasiswa::bff::state::{AppRoute, FormMode};

use super::{App, Output};
use crate::render;

/// Show the cached session without touching the network.
pub fn status(app: &App, output: Output) -> Result<()> {
    let snapshot = app.ctx.session.read();
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        Output::Table => {
            if snapshot.is_logged_in {
                println!("Logged in as {}.", snapshot.display_name().unwrap_or("-"));
                if let Some(email) = &snapshot.email {
                    println!("  email:   {}", email);
                }
                if let Some(uid) = &snapshot.user_id {
                    println!("  user id: {}", uid);
                }
            } else {
                println!("Not logged in.");
            }
        }
    }
    Ok(())
}

pub async fn login(app: &App, email: &str, password: &str, output: Output) -> Result<()> {
    app.flux.emit(InitializeReq::PATH, InitializeReq).await;
    app.flux
        .emit(
            LoginReq::PATH,
            LoginReq {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await;

    let auth = app
        .auth()
        .ok_or_else(|| anyhow::anyhow!("login produced no state"))?;
    if let Some(error) = auth.error {
        anyhow::bail!("{}", error);
    }
    if app.route() != AppRoute::HOME {
        anyhow::bail!("Login did not complete.");
    }

    if output == Output::Table {
        if let Some(notice) = &auth.notice {
            println!("{}", notice);
        }
        if let Some(user) = &auth.user {
            println!("Halo, {}", user.greeting_name());
        }
    }
    render::roster(&app.roster(), output)
}

pub async fn register(app: &App, email: &str, password: &str) -> Result<()> {
    app.flux.emit(ToggleModeReq::PATH, ToggleModeReq).await;
    app.flux
        .emit(
            RegisterReq::PATH,
            RegisterReq {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await;

    let auth = app
        .auth()
        .ok_or_else(|| anyhow::anyhow!("registration produced no state"))?;
    if let Some(error) = auth.error {
        anyhow::bail!("{}", error);
    }
    if auth.mode == FormMode::Login {
        if let Some(notice) = auth.notice {
            println!("{}", notice);
        }
    }
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    let was_logged_in = app.ctx.session.is_logged_in();
    app.flux.emit(LogoutReq::PATH, LogoutReq).await;

    if let Some(error) = app.auth().and_then(|a| a.error) {
        eprintln!("warning: remote sign-out failed: {}", error);
    }
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
