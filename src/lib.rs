pub mod api; // Local HTTP API
pub mod config;
pub mod core_state; // Shared state for API + ticker
pub mod db;
pub mod medications; // Medication store + day stats
pub mod models;
pub mod reminders; // Missed-dose alerts
pub mod schedule; // Upcoming / past partition
pub mod ticker; // Clock + scheduled tick

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("Cannot create data directory: {0}")]
    DataDir(std::io::Error),
    #[error(transparent)]
    Core(#[from] core_state::CoreError),
    #[error("Cannot start API server: {0}")]
    Server(std::io::Error),
}

/// Start Dosewise: open the store, start the reminder ticker and serve
/// the API until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = config::AppConfig::from_env()?;
    std::fs::create_dir_all(&app_config.data_dir).map_err(StartupError::DataDir)?;

    let core = Arc::new(core_state::CoreState::new(app_config.database_path()));
    {
        let conn = core.open_db()?;
        if app_config.seed_demo {
            medications::MedicationStore::new(&conn)
                .seed_demo_if_empty()
                .map_err(core_state::CoreError::from)?;
        }
    }
    tracing::info!(db = %core.db_path().display(), "Medication store ready");

    let ticker = ticker::start_reminder_ticker(core.clone(), app_config.tick_interval);
    let mut server = api::server::start_api_server(core, app_config.bind)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }

    tracing::info!("Shutting down");
    server.shutdown();
    server.wait().await;
    ticker.stop().await;
    Ok(())
}
