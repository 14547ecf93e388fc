use std::net::IpAddr;

/// Check whether an address is local and must never be sent to an external
/// geolocation provider.
///
/// Covers loopback, RFC 1918 private ranges, and link-local/ULA IPv6
/// prefixes. The `172.` match is deliberately broader than `172.16.0.0/12`;
/// downstream behavior may depend on it, so it stays until signed off.
#[must_use]
pub fn is_local_address(ip: &str) -> bool {
    // IPv4 and literal hostname forms
    if ip == "127.0.0.1"
        || ip == "localhost"
        || ip.starts_with("192.168.")
        || ip.starts_with("10.")
        || ip.starts_with("172.")
    {
        return true;
    }

    // IPv6 forms
    if ip == "::1"
        || ip == "::ffff:127.0.0.1"
        || ip.starts_with("fe80:")
        || ip.starts_with("fc00:")
        || ip.starts_with("fd00:")
    {
        return true;
    }

    false
}

/// Check that a query parameter is a syntactically well-formed IPv4 or IPv6
/// literal before it is handed to the resolver.
///
/// `localhost` is additionally accepted; it short-circuits to the offline
/// profile downstream anyway.
#[must_use]
pub fn is_valid_ip(ip: &str) -> bool {
    ip == "localhost" || ip.parse::<IpAddr>().is_ok()
}
