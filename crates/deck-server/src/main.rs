use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use deck_config::DeckConfig;
use deck_db::service::DeckService;
use deck_server::{AppState, router, scheduler};

mod cli;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("deckd error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = DeckConfig::load_with_dotenv().context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    if !config.database.is_in_memory() {
        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }
    }

    let service = DeckService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;
    tracing::info!(path = %config.database.path, "database ready");

    if config.reset.run_on_startup {
        scheduler::run_startup_check(&service).await;
    }

    let state = AppState::new(service, config.focus.duration_secs);

    let reset_task = if config.reset.enabled {
        let schedule = config.reset.schedule()?;
        tracing::info!(cron = %config.reset.cron, "daily reset scheduler enabled");
        Some(scheduler::spawn_daily_reset(
            Arc::clone(&state.service),
            schedule,
        ))
    } else {
        None
    };
    let ticker = Arc::clone(&state.focus)
        .spawn_ticker(Duration::from_millis(config.focus.tick_millis));

    let app = router(state, config.server.cors_permissive);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}; is another instance running?"))?;
    tracing::info!(%addr, "focusdeck listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ticker.abort();
    if let Some(task) = reset_task {
        task.abort();
    }
    tracing::info!("focusdeck stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FOCUSDECK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
