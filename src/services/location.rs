use std::time::Duration;

use serde_json::Value;

use crate::config::Config;
use crate::utils::is_local_address;

/// Per-provider request timeout. Kept short so a slow provider costs the
/// caller little before the cascade advances.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(3);

/// Endpoint used to discover the caller's own egress address.
const SELF_DISCOVERY_URL: &str = "http://ipwho.is/";

/// ISP label carried by the offline profile, so downstream consumers can
/// recognize a substituted answer.
pub const MOCK_ISP: &str = "本地开发环境";

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// Minimal location record produced by one provider (or the offline profile).
///
/// Lives only for the duration of a single resolution; the enrichment step
/// consumes it immediately. All fields except `ip` are untrusted and may be
/// empty or zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationData {
    pub ip: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub isp: String,
}

/// Where a resolution's record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A provider answered; carries the provider name.
    Provider(&'static str),
    /// The address is local and was never sent to a provider.
    LocalAddress,
    /// Every provider failed; the offline profile was substituted.
    Exhausted,
}

/// A resolved record plus its provenance, so telemetry can tell a genuine
/// provider answer from a degraded one.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: LocationData,
    pub source: ResolutionSource,
}

/// Fixed, deterministic placeholder record for local addresses and total
/// provider exhaustion. Pure; no I/O.
#[must_use]
pub fn mock_location(ip: &str) -> LocationData {
    LocationData {
        ip: ip.to_string(),
        country: "中国".to_string(),
        region: "北京市".to_string(),
        city: "北京".to_string(),
        latitude: 39.9042,
        longitude: 116.4074,
        timezone: "Asia/Shanghai".to_string(),
        isp: MOCK_ISP.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider specs
// ─────────────────────────────────────────────────────────────────────────────

type UrlFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// One entry of the fallback cascade: how to call a provider, when its
/// payload counts as a failure, and how to map its field layout into
/// [`LocationData`]. The list is fixed at startup and never mutated.
pub struct ProviderSpec {
    pub name: &'static str,
    pub url: UrlFn,
    pub timeout: Duration,
    pub is_failure: fn(&Value) -> bool,
    pub map: fn(&str, &Value) -> LocationData,
}

/// The production cascade, in priority order. The keyed ipgeolocation.io
/// fallback only joins the list when an API key is configured.
fn default_providers(config: &Config) -> Vec<ProviderSpec> {
    let mut providers = vec![ProviderSpec {
        name: "ipwho.is",
        url: Box::new(|ip| format!("http://ipwho.is/{ip}")),
        timeout: PROVIDER_TIMEOUT,
        is_failure: ipwhois_failed,
        map: map_ipwhois,
    }];

    if let Some(key) = &config.ipgeolocation_api_key {
        let key = key.clone();
        providers.push(ProviderSpec {
            name: "ipgeolocation.io",
            url: Box::new(move |ip| {
                format!("https://api.ipgeolocation.io/ipgeo?apiKey={key}&ip={ip}")
            }),
            timeout: PROVIDER_TIMEOUT,
            is_failure: ipgeolocation_failed,
            map: map_ipgeolocation,
        });
    }

    providers.push(ProviderSpec {
        name: "ipapi.co",
        url: Box::new(|ip| format!("https://ipapi.co/{ip}/json/")),
        timeout: PROVIDER_TIMEOUT,
        is_failure: ipapi_failed,
        map: map_ipapi,
    });

    providers
}

fn ipwhois_failed(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(false)
}

fn ipgeolocation_failed(body: &Value) -> bool {
    json_str(body, "message").contains("error")
}

fn ipapi_failed(body: &Value) -> bool {
    !matches!(body.get("error"), None | Some(Value::Null | Value::Bool(false)))
}

fn map_ipwhois(ip: &str, body: &Value) -> LocationData {
    LocationData {
        ip: non_empty_or(json_str(body, "ip"), ip),
        country: json_str(body, "country"),
        region: json_str(body, "region"),
        city: json_str(body, "city"),
        latitude: json_f64(body, "latitude"),
        longitude: json_f64(body, "longitude"),
        timezone: nested_str(body, "timezone", "id"),
        isp: nested_str(body, "connection", "isp"),
    }
}

fn map_ipgeolocation(ip: &str, body: &Value) -> LocationData {
    LocationData {
        ip: ip.to_string(),
        country: json_str(body, "country_name"),
        region: json_str(body, "state_prov"),
        city: json_str(body, "city"),
        // This provider serializes coordinates as strings
        latitude: json_f64(body, "latitude"),
        longitude: json_f64(body, "longitude"),
        timezone: nested_str(body, "time_zone", "name"),
        isp: json_str(body, "isp"),
    }
}

fn map_ipapi(ip: &str, body: &Value) -> LocationData {
    LocationData {
        ip: ip.to_string(),
        country: json_str(body, "country_name"),
        region: json_str(body, "region"),
        city: json_str(body, "city"),
        latitude: json_f64(body, "latitude"),
        longitude: json_f64(body, "longitude"),
        timezone: json_str(body, "timezone"),
        isp: json_str(body, "org"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves addresses through the provider cascade.
///
/// Neither [`locate`](Self::locate) nor [`locate_self`](Self::locate_self)
/// can fail: every failure mode inside the cascade degrades to the offline
/// profile instead of surfacing an error.
pub struct GeoLocator {
    client: reqwest::Client,
    providers: Vec<ProviderSpec>,
    self_endpoint: String,
    self_timeout: Duration,
}

impl GeoLocator {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_providers(default_providers(config), SELF_DISCOVERY_URL.to_string())
    }

    /// Build a locator over an explicit cascade. Used by tests to point the
    /// resolver at controlled endpoints.
    #[must_use]
    pub fn with_providers(providers: Vec<ProviderSpec>, self_endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
            self_endpoint,
            self_timeout: PROVIDER_TIMEOUT,
        }
    }

    /// Resolve one address. Local addresses short-circuit to the offline
    /// profile without any network call; otherwise providers are tried
    /// strictly in order, one bounded call each, until one answers.
    pub async fn locate(&self, ip: &str) -> Resolution {
        if is_local_address(ip) {
            tracing::info!(%ip, "local address detected, using offline profile");
            return Resolution {
                record: mock_location(ip),
                source: ResolutionSource::LocalAddress,
            };
        }

        for provider in &self.providers {
            match self.try_provider(provider, ip).await {
                Ok(record) => {
                    tracing::debug!(provider = provider.name, %ip, "provider answered");
                    return Resolution {
                        record,
                        source: ResolutionSource::Provider(provider.name),
                    };
                }
                Err(reason) => {
                    tracing::warn!(provider = provider.name, %ip, %reason, "provider failed, advancing cascade");
                }
            }
        }

        tracing::warn!(%ip, "all providers exhausted, using offline profile");
        Resolution {
            record: mock_location(ip),
            source: ResolutionSource::Exhausted,
        }
    }

    /// Self-lookup cascade: discover the caller's egress address first, then
    /// resolve it like any other address. A failed or local discovery
    /// degrades to the offline profile.
    pub async fn locate_self(&self) -> Resolution {
        match self.discover_self_ip().await {
            Ok(ip) if is_local_address(&ip) => {
                tracing::info!(%ip, "discovered address is local, using offline profile");
                Resolution {
                    record: mock_location(&ip),
                    source: ResolutionSource::LocalAddress,
                }
            }
            Ok(ip) => self.locate(&ip).await,
            Err(reason) => {
                tracing::warn!(%reason, "self discovery failed, using offline profile");
                Resolution {
                    record: mock_location("127.0.0.1"),
                    source: ResolutionSource::Exhausted,
                }
            }
        }
    }

    /// One bounded provider attempt. Any of transport error, timeout,
    /// non-success status, unparseable body, or a failure-shaped payload
    /// makes the attempt fail; the caller advances the cascade. No retry at
    /// the same provider.
    async fn try_provider(
        &self,
        provider: &ProviderSpec,
        ip: &str,
    ) -> Result<LocationData, String> {
        let url = (provider.url)(ip);
        let response = self
            .client
            .get(&url)
            .timeout(provider.timeout)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        if !response.status().is_success() {
            return Err(format!("unexpected status {}", response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| e.without_url().to_string())?;

        if (provider.is_failure)(&body) {
            return Err(payload_error(&body));
        }

        Ok((provider.map)(ip, &body))
    }

    async fn discover_self_ip(&self) -> Result<String, String> {
        let response = self
            .client
            .get(&self.self_endpoint)
            .timeout(self.self_timeout)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        if !response.status().is_success() {
            return Err(format!("unexpected status {}", response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| e.without_url().to_string())?;

        if ipwhois_failed(&body) {
            return Err(payload_error(&body));
        }

        let ip = json_str(&body, "ip");
        if ip.is_empty() {
            return Err("discovery response carried no address".to_string());
        }

        Ok(ip)
    }
}

/// Pull a human-readable failure reason out of a failure-shaped payload.
fn payload_error(body: &Value) -> String {
    for key in ["message", "reason", "error"] {
        let value = json_str(body, key);
        if !value.is_empty() {
            return value;
        }
    }
    "provider signalled failure".to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload helpers
// ─────────────────────────────────────────────────────────────────────────────

fn json_str(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn nested_str(body: &Value, outer: &str, inner: &str) -> String {
    body.get(outer)
        .and_then(|v| v.get(inner))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Coordinate fields arrive as numbers from some providers and as strings
/// from others; accept both, defaulting to zero.
fn json_f64(body: &Value, key: &str) -> f64 {
    body.get(key).map_or(0.0, |v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(0.0)
    })
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
