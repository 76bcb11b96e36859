//! Shrink Timer - a countdown timer that shifts from green to red as it runs
//! 
//! This is the main entry point: it restores the saved countdown, starts the
//! engine and its sinks, and serves the HTTP control surface.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use shrink_timer::{
    api::create_router,
    config::Config,
    services::{SettingsStore, StateStore},
    state::AppState,
    tasks::{completion_task, persistence_task, spawn_timer_engine},
    timer::DEFAULT_DURATION_MS,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("shrink_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting shrink-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, data_dir={}, tick={}ms",
          config.host, config.port, config.data_dir.display(), config.tick_ms);

    let settings_store = SettingsStore::new(&config.data_dir);
    let settings = settings_store.load().await;
    let default_duration = config.default_duration(&settings);
    info!("Default duration: {}ms", default_duration);

    let state_store = StateStore::new(&config.data_dir);
    let saved = state_store.load().await;

    // The sinks subscribe before restoration so they see its notifications
    let timer = spawn_timer_engine(DEFAULT_DURATION_MS, config.tick());
    tokio::spawn(persistence_task(timer.subscribe(), state_store));
    tokio::spawn(completion_task(timer.subscribe(), config.on_complete.clone()));

    // Completed snapshots stay completed so the finished state is shown after
    // a relaunch; only a missing or stopped snapshot gets a fresh countdown.
    // The desktop widget restarted completed timers here as well.
    let needs_fresh_start = match &saved {
        Some(saved) => saved.is_stopped(),
        None => true,
    };

    if let Some(saved) = saved {
        let restored = timer.restore(saved).await.map_err(anyhow::Error::msg)?;
        info!("Restored {} timer with {}ms remaining", restored.status(), restored.time_remaining);
    }

    if needs_fresh_start {
        timer.start(Some(default_duration)).await.map_err(anyhow::Error::msg)?;
    }

    let state = AppState::new(
        timer,
        settings,
        settings_store,
        config.port,
        config.host.clone(),
    )
    .with_duration_override(config.duration_override());
    let state = Arc::new(state);

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start      - Start (body: {{\"duration\": ms}} optional)");
    info!("  POST /stop       - Stop and rewind");
    info!("  POST /pause      - Pause");
    info!("  POST /resume     - Resume");
    info!("  POST /restart    - Restart with the current duration");
    info!("  POST /add-time   - Add time (body: {{\"ms\": n}})");
    info!("  POST /set-time   - Set time (body: {{\"ms\": n}})");
    info!("  POST /reset      - Fresh countdown of the default duration");
    info!("  GET  /state      - Timer snapshot");
    info!("  GET  /display    - Rendered display frame");
    info!("  GET  /status     - Snapshot plus server metadata");
    info!("  GET  /settings   - Current settings (PUT to update)");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
