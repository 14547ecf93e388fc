use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::dto::IpInfoResponse;
use crate::error::AppError;
use crate::services::ip_info::IpInfoService;
use crate::services::telemetry::LogLevel;
use crate::state::AppState;
use crate::utils::is_valid_ip;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the ip-info route group: `/ip-info/...`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/ip-info", get(my_ip_info))
        .route("/ip-info/query", get(query_ip_info))
        .route("/ip-info/health", get(service_health))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IpQuery {
    ip: Option<String>,
}

#[derive(Serialize)]
struct ServiceHealthResponse {
    status: String,
    timestamp: String,
    service: String,
    version: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/ip-info` — resolve the caller's own address.
///
/// Always answers 200: every resolution failure degrades to the offline
/// profile inside the service layer.
async fn my_ip_info(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<IpInfoResponse> {
    let request_id = new_request_id();
    state.telemetry.emit(
        LogLevel::Info,
        "self lookup requested",
        &request_id,
        json!({ "endpoint": "/api/v1/ip-info" }),
    );

    let profile = IpInfoService::lookup_self(&state, &headers, Some(peer.ip()), &request_id).await;
    Json(profile)
}

/// `GET /api/v1/ip-info/query?ip=…` — resolve an explicit address.
///
/// The only caller-visible failure in the API: a missing or malformed `ip`
/// parameter is rejected with 400 before any provider is contacted.
async fn query_ip_info(
    State(state): State<AppState>,
    Query(params): Query<IpQuery>,
) -> Result<Json<IpInfoResponse>, AppError> {
    let request_id = new_request_id();
    state.telemetry.emit(
        LogLevel::Info,
        "explicit lookup requested",
        &request_id,
        json!({ "endpoint": "/api/v1/ip-info/query" }),
    );

    let Some(ip) = params.ip.filter(|ip| !ip.is_empty()) else {
        state.telemetry.emit(
            LogLevel::Warn,
            "explicit lookup rejected: missing ip parameter",
            &request_id,
            Value::Null,
        );
        return Err(AppError::BadRequest(
            "ip query parameter is required".to_string(),
        ));
    };

    if !is_valid_ip(&ip) {
        state.telemetry.emit(
            LogLevel::Warn,
            "explicit lookup rejected: malformed ip",
            &request_id,
            json!({ "ip": ip }),
        );
        return Err(AppError::BadRequest(
            "invalid IP address format".to_string(),
        ));
    }

    let profile = IpInfoService::lookup(&state, &ip, &request_id).await;
    Ok(Json(profile))
}

/// `GET /api/v1/ip-info/health` — service-level health check.
async fn service_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceHealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn new_request_id() -> String {
    format!("req-{}", uuid::Uuid::new_v4())
}
