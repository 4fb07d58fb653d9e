use std::sync::Arc;

use switchboard::config::Settings;
use switchboard::http::{AppState, router};
use switchboard::workers::build_dispatcher;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[switchboard] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let dispatcher = build_dispatcher(&settings);
    tracing::info!(
        "handlers ready: {:?}",
        dispatcher.registry().available_workers()
    );

    let app = router(AppState {
        dispatcher: Arc::new(dispatcher),
        timeout: settings.request_timeout,
    });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("switchboard v{} listening on {}", switchboard::VERSION, addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
