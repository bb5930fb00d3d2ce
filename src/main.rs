//! Reel Advance - page bridge server for automatic reel advancing
//!
//! This is the main entry point for the reel-advance application.

use std::sync::Arc;

use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
    time::Instant,
};
use tracing::info;

use reel_advance::{
    api::create_router,
    config::Config,
    page::{MirrorPage, PageEvent},
    state::AppState,
    tasks::{page_loop_task, PageLoop},
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("reel_advance={},tower_http=info", config.log_level()))
        .init();

    info!("Starting reel-advance v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, buffer={}ms, fallback={}ms, poll={}ms, gate={}ms",
        config.host, config.port, config.buffer_ms, config.fallback_ms, config.poll_ms, config.gate_ms
    );

    let mut page_loop = PageLoop::new(config.countdown(), MirrorPage::new(config.url.clone()));
    if config.plugin_enabled {
        page_loop.apply_event(PageEvent::Toggle { enabled: true }, Instant::now());
    }

    // Start the page loop background task
    let (loop_tx, loop_rx) = mpsc::channel(256);
    let (status_tx, status_rx) = watch::channel(page_loop.snapshot(Instant::now()));
    tokio::spawn(page_loop_task(page_loop, loop_rx, status_tx));

    let state = Arc::new(AppState::new(config.port, config.host.clone(), loop_tx, status_rx));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Page bridge running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle   - Set or flip the auto-scroll toggle");
    info!("  POST /events   - Forward a page event");
    info!("  GET  /commands - Drain commands for the page");
    info!("  GET  /status   - Activation and countdown state");
    info!("  GET  /health   - Health check");

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
