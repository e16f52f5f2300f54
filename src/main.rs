//! Study Timer - a study-session countdown timer with chat relay
//! 
//! This is the main entry point for the study-timer service.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use study_timer::{
    api::create_router,
    config::Config,
    services::{http_client, HttpChatClient, HttpUsageSink},
    state::{AppState, ChatSession},
    store::{ChatHistoryStore, FileStore, KeyValueStore, TimerStore},
    tasks::tick_driver_task,
    timer::{StudyTimer, UsageReporter},
    utils::{shutdown_signal, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting study-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, store={}, default={}min",
          config.host, config.port, config.store.display(), config.minutes);

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store)?);
    let client = http_client(config.request_timeout())?;

    let reporter = UsageReporter::with_interval(
        Arc::new(HttpUsageSink::new(client.clone(), config.analytics_url.clone())),
        config.report_interval(),
    );
    let timer = StudyTimer::restore(
        TimerStore::new(Arc::clone(&store), config.minutes),
        reporter,
        Arc::new(SystemClock),
    );
    let chat = ChatSession::restore(
        ChatHistoryStore::new(Arc::clone(&store)),
        Arc::new(HttpChatClient::new(client, config.chat_url.clone())),
    );

    // Create application state and reconcile with the time spent offline
    let state = Arc::new(AppState::new(timer, chat, config.port, config.host.clone()));
    let timer_state = state.activate().await;
    info!("Timer restored: {} left, running={}", timer_state.formatted(), timer_state.running);

    // Start the tick driver background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timer         - Timer snapshot");
    info!("  POST   /timer/start   - Start the countdown");
    info!("  POST   /timer/pause   - Pause the countdown");
    info!("  POST   /timer/toggle  - Start or pause");
    info!("  POST   /timer/reset   - Reset to the target time");
    info!("  PUT    /timer/minutes - Set the target time");
    info!("  GET    /chat          - Chat history");
    info!("  POST   /chat          - Send a chat message");
    info!("  DELETE /chat          - Clear chat history");
    info!("  GET    /status        - Service status");
    info!("  GET    /health        - Health check");

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

    // Fold the running segment so the next start can reconcile it
    state.deactivate().await;

    info!("Server shutdown complete");
    Ok(())
}
