//! intern-watch: binary entrypoint.
//! Polls the placement portal once and announces new hires; meant to be run
//! by an external scheduler (cron, CI schedule).

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use intern_watch::exit::{exit_code, FailureKind};
use intern_watch::geocode::OneMapClient;
use intern_watch::lock::RunLock;
use intern_watch::notify::DiscordNotifier;
use intern_watch::portal::PortalClient;
use intern_watch::{run_once, Credentials, SeenStore, Services, Settings, StationTable};

#[derive(Parser)]
#[command(name = "intern-watch", about = "Announce new internship hires to a Discord webhook")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the portal once and announce new hires (default)
    Run,
    /// Re-geocode the station list and rewrite the station cache
    RefreshStations,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; absent file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => poll().await,
        Commands::RefreshStations => refresh_stations().await,
    };

    if let Err(e) = &result {
        if let Some(hint) = FailureKind::of(e).hint() {
            error!("{hint}");
        }
        error!("{e:#}");
    }
    ExitCode::from(exit_code(&result))
}

async fn poll() -> Result<()> {
    let settings = Settings::from_env()?;
    let creds = Credentials::from_env()?;
    info!(cookie_len = creds.cookie.len(), base_url = %settings.base_url, "config loaded");

    let _lock = RunLock::acquire(&settings.lock_path)?;

    let portal = PortalClient::new(&settings.base_url, creds.cookie.clone())
        .with_timeout(settings.http_timeout);
    let geocoder = OneMapClient::new(&settings.geocoder_url).with_timeout(settings.http_timeout);
    let publisher = DiscordNotifier::new(creds.webhook_url.clone()).with_timeout(settings.http_timeout);

    let mut seen = SeenStore::open(&settings.seen_path)?;
    info!(seen = seen.set().len(), path = %seen.path().display(), "seen applicants loaded");

    let stations = StationTable::load_or_build(
        &settings.station_cache_path,
        &settings.station_names_path,
        &geocoder,
    )
    .await?;

    let services = Services {
        portal: &portal,
        geocoder: &geocoder,
        publisher: &publisher,
    };
    run_once(&services, &stations, &mut seen, &settings).await?;
    Ok(())
}

async fn refresh_stations() -> Result<()> {
    let settings = Settings::from_env()?;
    let geocoder = OneMapClient::new(&settings.geocoder_url).with_timeout(settings.http_timeout);
    StationTable::refresh(
        &settings.station_cache_path,
        &settings.station_names_path,
        &geocoder,
    )
    .await?;
    Ok(())
}
