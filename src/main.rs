use angelcrab::provider::NetangelsConnector;
use angelcrab::solver::DynSolver;
use angelcrab::{Config, NetangelsSolver, Shared, Solver};
use anyhow::{anyhow, Result};
use is_terminal::IsTerminal;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut first_args = std::env::args().take(2);
    let (program_name, config_file) = (
        first_args.next().unwrap_or("angelcrab".to_string()),
        first_args.next(),
    );

    let config = config_init(&program_name, config_file)?;
    let group_name = config.group_name()?;
    let secret_store = config.secret_store().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut solver = NetangelsSolver::new(NetangelsConnector::new(config.netangels.clone()));
    solver.initialize(secret_store, shutdown_rx)?;
    let solvers: Vec<DynSolver> = vec![Arc::new(solver)];

    tracing::info!(
        "API listening on {} for group \"{group_name}\"",
        &config.api_bind_addr
    );
    let api_server = angelcrab::api::new(&config, &group_name, solvers, async move {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("unable to listen for shutdown signal: {err}");
        }
        tracing::info!("quitting from signal");
        let _ = shutdown_tx.send(true);
    })?;
    api_server.await?;

    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    let default_filter = match std::env::var("LOG_LEVEL").as_deref() {
        Ok("DEBUG") => "angelcrab=debug",
        _ => "angelcrab=info",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(std::io::stdout().is_terminal()))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn config_init(program_name: &str, config_file: Option<String>) -> Result<Shared> {
    match config_file {
        None => Err(anyhow!("usage: {program_name} /path/to/config.json")),
        Some(config_file) => {
            tracing::debug!("loaded config from {config_file}");
            let config = Config::try_from_file(&config_file)?;
            Ok(Arc::new(config))
        }
    }
}
