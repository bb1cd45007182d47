use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use transport_survey::{
    errors::StorageError, load_data, router, seed::spawn_seed_injection, AppState, Config, Dashboard,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let restored = match load_data(&config.data_path).await {
        Ok(restored) => restored,
        Err(err @ StorageError::Parse(_)) => {
            error!("{err}; starting from seed state");
            None
        }
        Err(err) => return Err(err.into()),
    };
    let has_prior_state = restored.is_some();
    let dashboard = match restored {
        Some(data) => {
            info!(total = data.total_responses, "restored survey state from {}", config.data_path.display());
            Dashboard::new(data, config.log_capacity)
        }
        None => Dashboard::seeded(config.log_capacity),
    };

    let state = AppState::new(config.data_path.clone(), dashboard);
    if !has_prior_state {
        spawn_seed_injection(state.clone(), config.seed_delay);
    }

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
