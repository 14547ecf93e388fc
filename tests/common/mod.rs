#![allow(dead_code)]
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use ipinfo_api::config::{Config, Environment};
use ipinfo_api::services::location::{GeoLocator, LocationData, ProviderSpec};
use ipinfo_api::services::telemetry::RemoteLogger;
use ipinfo_api::state::AppState;

/// Default peer address attached to test requests; a public documentation IP
/// so header-less requests don't classify as local.
pub const TEST_PEER: [u8; 4] = [203, 0, 113, 9];

/// Configuration with everything defaulted and remote logging off.
pub fn test_config() -> Config {
    Config {
        server_host: IpAddr::from([127, 0, 0, 1]),
        server_port: 3000,
        environment: Environment::Development,
        log_level: "info".to_string(),
        frontend_url: "http://localhost:3001".to_string(),
        service_name: "ipinfo-api".to_string(),
        log_service_url: None,
        log_service_api_key: None,
        remote_logging_enabled: false,
        ipgeolocation_api_key: None,
    }
}

/// A base URL nothing is listening on, so requests fail fast with a
/// connection error.
pub fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind probe port");
    let port = listener
        .local_addr()
        .expect("failed to read probe port")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn map_nothing(ip: &str, _body: &Value) -> LocationData {
    LocationData {
        ip: ip.to_string(),
        country: String::new(),
        region: String::new(),
        city: String::new(),
        latitude: 0.0,
        longitude: 0.0,
        timezone: String::new(),
        isp: String::new(),
    }
}

/// A cascade entry pointing at a closed port.
pub fn dead_provider(name: &'static str) -> ProviderSpec {
    let base = unreachable_endpoint();
    ProviderSpec {
        name,
        url: Box::new(move |ip| format!("{base}/{ip}")),
        timeout: Duration::from_millis(500),
        is_failure: |_| false,
        map: map_nothing,
    }
}

/// Application state whose locator can never reach a provider: every
/// non-local lookup exhausts immediately and degrades to the offline profile.
pub fn test_state() -> AppState {
    let locator = GeoLocator::with_providers(
        vec![dead_provider("primary"), dead_provider("fallback")],
        unreachable_endpoint(),
    );

    AppState {
        config: test_config(),
        locator: Arc::new(locator),
        telemetry: RemoteLogger::disabled(),
    }
}

/// Build the full router over the given state.
pub fn test_app(state: AppState) -> Router {
    ipinfo_api::routes::router().with_state(state)
}

/// Test helper: send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    get_with_headers(app, uri, &[], IpAddr::from(TEST_PEER)).await
}

/// Like [`get`], with request headers and an explicit peer address.
pub async fn get_with_headers(
    app: &Router,
    uri: &str,
    headers: &[(&str, &str)],
    peer: IpAddr,
) -> (StatusCode, String) {
    let mut builder = Request::builder()
        .method("GET")
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::new(peer, 54321)));

    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = builder.body(Body::empty()).unwrap_or_default();

    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}
