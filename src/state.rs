use std::sync::Arc;

use crate::config::Config;
use crate::services::location::GeoLocator;
use crate::services::telemetry::RemoteLogger;

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub locator: Arc<GeoLocator>,
    pub telemetry: RemoteLogger,
}
