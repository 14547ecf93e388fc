mod health;
mod ip_info;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — lightweight liveness check (used by Railway)
/// - `GET /api/v1/ip-info` — resolve the caller's own address
/// - `GET /api/v1/ip-info/query?ip=…` — resolve an explicit address
/// - `GET /api/v1/ip-info/health` — service-level health check
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new().merge(ip_info::api_router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
