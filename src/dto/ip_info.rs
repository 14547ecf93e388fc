use serde::{Deserialize, Serialize};

/// Full geolocation/ISP profile returned by both lookup endpoints.
///
/// Field names are a wire contract shared with existing clients; do not
/// rename or reorder them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpInfoResponse {
    pub ip: String,
    /// `IPv4` or `IPv6`, derived from the address form.
    pub version: String,
    pub city: String,
    pub region: String,
    pub region_code: String,
    /// ISO 3166-1 alpha-2 code; historical duplicate of `country_code`.
    pub country: String,
    pub country_name: String,
    pub country_code: String,
    pub country_code_iso3: String,
    pub country_capital: String,
    pub country_tld: String,
    pub continent_code: String,
    pub in_eu: bool,
    pub postal: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub utc_offset: String,
    pub country_calling_code: String,
    pub currency: String,
    pub currency_name: String,
    pub languages: String,
    pub country_area: f64,
    pub country_population: u64,
    /// Autonomous-system placeholder; no ASN database is consulted.
    pub asn: String,
    pub org: String,
    /// Network CIDR placeholder; no range database is consulted.
    pub network: String,
}
