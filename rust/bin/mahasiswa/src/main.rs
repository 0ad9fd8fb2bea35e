//! `mahasiswa`: terminal client for the student roster.
//!
//! Logs in against the hosted identity service, keeps the session on
//! local disk and lists the roster stored in Firestore.

mod commands;
mod config;
mod render;

use clap::{Parser, Subcommand};

use commands::{App, Output};
use config::AppConfig;

/// Student roster client.
#[derive(Parser, Debug)]
#[command(name = "mahasiswa", about = "Student roster client")]
struct Cli {
    /// Path to client config file (default: ~/.mahasiswa/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the locally cached session.
    Status,

    /// Login with email and password.
    Login {
        /// Account email.
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended; use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Register a new account. Login afterwards.
    Register {
        /// Account email.
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended; use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Logout: end the remote session and clear the local one.
    Logout,

    /// List all students, ordered by name.
    List,

    /// Add the five sample students.
    Seed,

    /// Show version.
    Version,
}

fn prompt_email(email: Option<String>) -> anyhow::Result<String> {
    if let Some(email) = email {
        return Ok(email);
    }
    eprint!("Email: ");
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn prompt_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::parse(&cli.output)?;

    if let Commands::Version = cli.command {
        println!("mahasiswa cli v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    tracing::debug!("Loading configuration from {}", config_path.display());
    let config = AppConfig::load(&config_path)?;

    // Status and logout work without backend settings.
    if !matches!(cli.command, Commands::Status | Commands::Logout) {
        config.verify(&config_path)?;
    }
    let app = App::open(&config)?;

    match cli.command {
        Commands::Status => commands::session::status(&app, output)?,

        Commands::Login { email, password } => {
            let email = prompt_email(email)?;
            let password = prompt_password(password)?;
            commands::session::login(&app, &email, &password, output).await?;
        }

        Commands::Register { email, password } => {
            let email = prompt_email(email)?;
            let password = prompt_password(password)?;
            commands::session::register(&app, &email, &password).await?;
        }

        Commands::Logout => commands::session::logout(&app).await?,

        Commands::List => commands::roster::list(&app, output).await?,

        Commands::Seed => commands::roster::seed(&app, output).await?,

        // Printed above.
        Commands::Version => {}
    }

    Ok(())
}
