use std::net::IpAddr;

use axum::http::HeaderMap;

/// Determine the originating client address from proxy headers.
///
/// Priority (first non-empty wins):
/// 1. `x-vercel-forwarded-for` — platform header, first entry of the chain
/// 2. `cf-connecting-ip` — Cloudflare
/// 3. `x-real-ip`
/// 4. `x-forwarded-for` — first entry of the chain
/// 5. the transport peer address
/// 6. `127.0.0.1` as the last resort
///
/// Pure function of its inputs; no validation is performed here. Repeated
/// header values use the first occurrence (`HeaderMap` lookups are already
/// case-insensitive).
#[must_use]
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    if let Some(ip) = first_forwarded_entry(headers, "x-vercel-forwarded-for") {
        return ip;
    }

    if let Some(ip) = header_value(headers, "cf-connecting-ip") {
        return ip;
    }

    if let Some(ip) = header_value(headers, "x-real-ip") {
        return ip;
    }

    if let Some(ip) = first_forwarded_entry(headers, "x-forwarded-for") {
        return ip;
    }

    peer.map_or_else(|| "127.0.0.1".to_string(), |addr| addr.to_string())
}

/// Read a single-valued header, ignoring empty or non-ASCII values.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Read a comma-chained forwarding header and keep only the first entry.
fn first_forwarded_entry(headers: &HeaderMap, name: &str) -> Option<String> {
    header_value(headers, name)
        .as_deref()
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
