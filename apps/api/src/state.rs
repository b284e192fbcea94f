use std::sync::Arc;

use crate::capture::CaptureSink;
use crate::config::Config;
use crate::provider::AnalysisProvider;

/// Shared application state injected into all route handlers via Axum
/// extractors.
///
/// The provider is constructed once at startup and injected, never built
/// lazily inside a handler — this keeps it substitutable in tests. `None`
/// means no API key was configured; analysis requests then fail with a
/// configuration error.
#[derive(Clone)]
pub struct AppState {
    pub provider: Option<Arc<dyn AnalysisProvider>>,
    pub sink: CaptureSink,
    pub config: Config,
}
