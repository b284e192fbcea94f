use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zeroname_api::capture::CaptureSink;
use zeroname_api::config::Config;
use zeroname_api::db::try_create_pool;
use zeroname_api::provider::{AnalysisProvider, OpenAiClient};
use zeroname_api::routes::build_router;
use zeroname_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Zeroname API v{}", env!("CARGO_PKG_VERSION"));

    // Capture sink: best-effort, the service runs fine without it.
    let pool = match &config.database_url {
        Some(url) => try_create_pool(url).await,
        None => {
            info!("DATABASE_URL not set; email/feedback capture disabled");
            None
        }
    };
    let sink = CaptureSink::new(pool);

    // Provider client: constructed once here and injected everywhere.
    let provider: Option<Arc<dyn AnalysisProvider>> = match &config.openai_api_key {
        Some(key) => {
            info!(
                "Model provider client initialized (model: {})",
                zeroname_api::provider::MODEL
            );
            Some(Arc::new(OpenAiClient::new(key.clone())))
        }
        None => {
            warn!("OPENAI_API_KEY not set; /analyze will return a configuration error");
            None
        }
    };

    let state = AppState {
        provider,
        sink,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
