//! tashih - command-line host for the Tashih review workflow.
//!
//! Resolves the session from the environment (or flags), then drives the
//! dashboard and review controllers from `tashih-client`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tashih_client::config::normalize_base_url;
use tashih_client::{ClientConfig, SharedApi, TashihGateway};
use tashih_core::dashboard::DashboardTab;
use tashih_core::routes::Route;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "tashih_client=info,tashih_cli=info";

/// tashih - Tashih review workflow client
#[derive(Parser, Debug)]
#[command(name = "tashih")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the Tashih service (overrides TASHIH_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// File holding the bearer credential (overrides TASHIH_TOKEN_FILE)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `tashih_client=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the signed-in actor
    Whoami,

    /// Store a credential in the token file
    Login {
        /// Bearer token issued by the service
        #[arg(long)]
        token: String,
    },

    /// Forget the credential and remove the token file
    Logout,

    /// Show the Tashih dashboard
    Dashboard {
        /// Tab to list: documents, khass or jamai
        #[arg(long, default_value = "documents")]
        tab: DashboardTab,

        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,

        /// Only documents with this verification status
        #[arg(long)]
        status: Option<String>,
    },

    /// Review an individual report (TaqrirKhass)
    ReviewKhass {
        /// TaqrirKhass id
        id: String,

        /// Final verification status id to record
        #[arg(long)]
        status: Option<String>,

        /// Review notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Review a collective report (TaqrirJamai)
    ReviewJamai {
        /// TaqrirJamai id
        id: String,

        /// Approve the report
        #[arg(long, conflicts_with = "reject")]
        approve: bool,

        /// Reject the report
        #[arg(long)]
        reject: bool,

        /// Review notes
        #[arg(long)]
        notes: Option<String>,
    },
}

/// How a command finished.
enum Outcome {
    Done,
    /// The guard sent the actor elsewhere.
    Redirect(Route),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Tracing ---
    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Redirect(route)) => {
            println!("redirect: {route}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    // --- Configuration ---
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.api_url = normalize_base_url(url);
    }
    if let Some(path) = cli.token_file {
        config.token_file = Some(path);
    }
    tracing::debug!(api_url = %config.api_url, "Loaded client configuration");

    let session = Arc::new(config.build_session());
    let api: SharedApi = Arc::new(TashihGateway::new(&config, Arc::clone(&session))?);

    match cli.command {
        Commands::Whoami => commands::whoami(&session),
        Commands::Login { token } => commands::login(&session, token),
        Commands::Logout => commands::logout(&session),
        Commands::Dashboard {
            tab,
            search,
            status,
        } => commands::dashboard(&session, api, tab, search, status).await,
        Commands::ReviewKhass { id, status, notes } => {
            commands::review_khass(&session, api, &config, id, status, notes).await
        }
        Commands::ReviewJamai {
            id,
            approve,
            reject,
            notes,
        } => {
            let decision = match (approve, reject) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::review_jamai(&session, api, &config, id, decision, notes).await
        }
    }
}
