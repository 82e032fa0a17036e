mod config;

use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock};
use storage::repository::{CredentialRepository, Storage};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

use crate::config::{AppConfig, ArgsError, DB_URL_VAR};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--api-url <url>] [--db <sqlite_url>] [--poll-secs <n>]");
    eprintln!("  cargo run -p app -- logout [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --api-url {}", services::config::DEFAULT_API_URL);
    eprintln!("  --db {}", config::DEFAULT_DB_URL);
    eprintln!("  --poll-secs 5");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!(
        "  {}, {DB_URL_VAR}, {}, {}, RUST_LOG",
        services::config::API_URL_VAR,
        services::config::POLL_SECS_VAR,
        services::config::TIMEOUT_SECS_VAR,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Logout,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.to_string())
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let config = AppConfig::from_env()
        .and_then(|config| config.with_args(&mut iter))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&config.db_url)?;

    match cmd {
        Command::Ui => {
            let services = AppServices::new_sqlite(
                config.api.clone(),
                &config.db_url,
                Clock::default_clock(),
            )
            .await?;
            info!(api = %config.api.base_url(), db = %config.db_url, "starting");

            match services.session().hydrate().await {
                Some(user) => info!(user_id = user.id.value(), "restored previous session"),
                None => info!("no saved session; showing sign-in"),
            }

            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            // Explicitly disable it so the app doesn't behave like a modal window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("IntelliTest")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Logout => {
            let storage = Storage::sqlite(&config.db_url).await?;
            storage.credentials.clear_credentials().await?;
            eprintln!("Saved sign-in cleared ({}).", config.db_url);
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
