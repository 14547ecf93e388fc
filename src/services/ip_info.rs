use std::net::IpAddr;

use axum::http::HeaderMap;
use serde_json::json;

use crate::dto::IpInfoResponse;
use crate::services::enrichment::enrich;
use crate::services::location::{Resolution, ResolutionSource};
use crate::services::telemetry::LogLevel;
use crate::state::AppState;
use crate::utils::{extract_client_ip, is_local_address};

/// Orchestrates a lookup end to end: classify, resolve, enrich, and report
/// the outcome to telemetry. Both entry points are infallible by design.
pub struct IpInfoService;

impl IpInfoService {
    /// Resolve an explicit, already-validated address into a full profile.
    pub async fn lookup(state: &AppState, ip: &str, request_id: &str) -> IpInfoResponse {
        let resolution = state.locator.locate(ip).await;
        Self::report(state, &resolution, request_id);
        enrich(&resolution.record)
    }

    /// Resolve the caller's own address from proxy headers or the transport
    /// peer. Local client addresses trigger external self-discovery of the
    /// public egress address instead.
    pub async fn lookup_self(
        state: &AppState,
        headers: &HeaderMap,
        peer: Option<IpAddr>,
        request_id: &str,
    ) -> IpInfoResponse {
        let client_ip = extract_client_ip(headers, peer);
        tracing::info!(ip = %client_ip, "extracted client address");

        let resolution = if is_local_address(&client_ip) {
            state.locator.locate_self().await
        } else {
            state.locator.locate(&client_ip).await
        };

        Self::report(state, &resolution, request_id);
        enrich(&resolution.record)
    }

    fn report(state: &AppState, resolution: &Resolution, request_id: &str) {
        match &resolution.source {
            ResolutionSource::Provider(name) => state.telemetry.emit(
                LogLevel::Info,
                "resolution succeeded",
                request_id,
                json!({ "ip": resolution.record.ip, "provider": name }),
            ),
            ResolutionSource::LocalAddress => state.telemetry.emit(
                LogLevel::Info,
                "local address, offline profile substituted",
                request_id,
                json!({ "ip": resolution.record.ip }),
            ),
            ResolutionSource::Exhausted => state.telemetry.emit(
                LogLevel::Warn,
                "all providers exhausted, offline profile substituted",
                request_id,
                json!({ "ip": resolution.record.ip }),
            ),
        }
    }
}
