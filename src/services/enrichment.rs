//! Derives the full wire profile from a minimal location record.
//!
//! Every derived field comes from a total lookup against a static table:
//! the `_` arm of each `match` is the documented sentinel, so enrichment can
//! never fail on an unknown country. Tables are keyed by both the localized
//! and the English spelling wherever a provider may report either.

use crate::dto::IpInfoResponse;
use crate::services::location::LocationData;

/// Sentinel shown for text fields the providers left empty.
const UNKNOWN: &str = "未知";

/// Build the complete profile. Total: unknown countries degrade to sentinel
/// values field by field, never to an error.
#[must_use]
pub fn enrich(location: &LocationData) -> IpInfoResponse {
    let code = country_code(&location.country);

    IpInfoResponse {
        ip: location.ip.clone(),
        version: ip_version(&location.ip).to_string(),
        city: or_unknown(&location.city),
        region: or_unknown(&location.region),
        region_code: region_code(&location.region, code).to_string(),
        country: code.to_string(),
        country_name: or_unknown(&location.country),
        country_code: code.to_string(),
        country_code_iso3: country_code_iso3(code).to_string(),
        country_capital: country_capital(&location.country).to_string(),
        country_tld: country_tld(code).to_string(),
        continent_code: continent_code(code).to_string(),
        in_eu: is_in_eu(&location.country),
        postal: postal_code(&location.city).to_string(),
        latitude: location.latitude,
        longitude: location.longitude,
        timezone: if location.timezone.is_empty() {
            "UTC".to_string()
        } else {
            location.timezone.clone()
        },
        utc_offset: utc_offset(&location.timezone).to_string(),
        country_calling_code: calling_code(code).to_string(),
        currency: currency(code).to_string(),
        currency_name: currency_name(code).to_string(),
        languages: languages(code).to_string(),
        country_area: country_area(&location.country),
        country_population: country_population(&location.country),
        asn: "AS0000".to_string(),
        org: or_unknown(&location.isp),
        network: "0.0.0.0/0".to_string(),
    }
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// IPv6 addresses always contain a colon; IPv4 literals never do.
fn ip_version(ip: &str) -> &'static str {
    if ip.contains(':') { "IPv6" } else { "IPv4" }
}

// ─────────────────────────────────────────────────────────────────────────────
// Country tables
// ─────────────────────────────────────────────────────────────────────────────

fn country_code(country: &str) -> &'static str {
    match country {
        "中国" | "China" => "CN",
        "美国" | "United States" => "US",
        "日本" | "Japan" => "JP",
        "英国" | "United Kingdom" => "GB",
        "德国" | "Germany" => "DE",
        "法国" | "France" => "FR",
        "加拿大" | "Canada" => "CA",
        "澳大利亚" | "Australia" => "AU",
        "韩国" | "South Korea" => "KR",
        "印度" | "India" => "IN",
        "俄罗斯" | "Russia" => "RU",
        "巴西" | "Brazil" => "BR",
        _ => "XX",
    }
}

fn country_code_iso3(code: &str) -> &'static str {
    match code {
        "CN" => "CHN",
        "US" => "USA",
        "JP" => "JPN",
        "GB" => "GBR",
        "DE" => "DEU",
        "FR" => "FRA",
        "CA" => "CAN",
        "AU" => "AUS",
        "KR" => "KOR",
        "IN" => "IND",
        "RU" => "RUS",
        "BR" => "BRA",
        _ => "XXX",
    }
}

fn country_capital(country: &str) -> &'static str {
    match country {
        "中国" | "China" => "北京",
        "美国" | "United States" => "华盛顿",
        "日本" | "Japan" => "东京",
        "英国" | "United Kingdom" => "伦敦",
        "德国" | "Germany" => "柏林",
        "法国" | "France" => "巴黎",
        "加拿大" | "Canada" => "渥太华",
        "澳大利亚" | "Australia" => "堪培拉",
        "韩国" | "South Korea" => "首尔",
        "印度" | "India" => "新德里",
        "俄罗斯" | "Russia" => "莫斯科",
        "巴西" | "Brazil" => "巴西利亚",
        _ => UNKNOWN,
    }
}

fn country_tld(code: &str) -> &'static str {
    match code {
        "CN" => ".cn",
        "US" => ".us",
        "JP" => ".jp",
        "GB" => ".uk",
        "DE" => ".de",
        "FR" => ".fr",
        "CA" => ".ca",
        "AU" => ".au",
        "KR" => ".kr",
        "IN" => ".in",
        "RU" => ".ru",
        "BR" => ".br",
        _ => ".com",
    }
}

fn continent_code(code: &str) -> &'static str {
    match code {
        "CN" | "JP" | "KR" | "IN" => "AS",
        "US" | "CA" => "NA",
        "GB" | "DE" | "FR" | "RU" => "EU",
        "AU" => "OC",
        "BR" => "SA",
        _ => "XX",
    }
}

/// Membership list carried over from the upstream data source, loose entries
/// included. Localized spellings are listed for countries the code tables
/// cover, so the two spellings of one country agree.
fn is_in_eu(country: &str) -> bool {
    matches!(
        country,
        "Germany"
            | "德国"
            | "France"
            | "法国"
            | "Italy"
            | "Spain"
            | "Poland"
            | "Romania"
            | "Netherlands"
            | "Belgium"
            | "Czech Republic"
            | "Greece"
            | "Portugal"
            | "Sweden"
            | "Hungary"
            | "Austria"
            | "Belarus"
            | "Bulgaria"
            | "Serbia"
            | "Switzerland"
            | "Slovakia"
            | "Denmark"
            | "Finland"
            | "Norway"
            | "Ireland"
            | "Croatia"
            | "Bosnia and Herzegovina"
            | "Albania"
            | "Lithuania"
            | "Slovenia"
            | "Latvia"
            | "Estonia"
            | "Macedonia"
            | "Moldova"
            | "Luxembourg"
            | "Malta"
            | "Iceland"
            | "Montenegro"
            | "Cyprus"
    )
}

fn region_code(region: &str, code: &str) -> &'static str {
    match code {
        "CN" => match region {
            "北京" | "北京市" | "Beijing" => "BJ",
            "上海" | "上海市" | "Shanghai" => "SH",
            "广东" | "广东省" | "Guangdong" => "GD",
            "江苏" | "江苏省" | "Jiangsu" => "JS",
            "浙江" | "浙江省" | "Zhejiang" => "ZJ",
            "四川" | "四川省" | "Sichuan" => "SC",
            _ => "XX",
        },
        "US" => match region {
            "California" => "CA",
            "New York" => "NY",
            "Texas" => "TX",
            "Florida" => "FL",
            "Illinois" => "IL",
            _ => "XX",
        },
        _ => "XX",
    }
}

fn postal_code(city: &str) -> &'static str {
    match city {
        "上海" | "Shanghai" => "200000",
        "广州" | "Guangzhou" => "510000",
        "深圳" | "Shenzhen" => "518000",
        _ => "100000",
    }
}

fn utc_offset(timezone: &str) -> &'static str {
    match timezone {
        "Asia/Shanghai" | "Asia/Beijing" => "+0800",
        "America/New_York" => "-0500",
        "America/Los_Angeles" => "-0800",
        "Europe/London" => "+0000",
        "Europe/Paris" | "Europe/Berlin" => "+0100",
        "Asia/Tokyo" | "Asia/Seoul" => "+0900",
        "Australia/Sydney" => "+1000",
        "Europe/Moscow" => "+0300",
        _ => "+0000",
    }
}

fn calling_code(code: &str) -> &'static str {
    match code {
        "CN" => "+86",
        "US" | "CA" => "+1",
        "JP" => "+81",
        "GB" => "+44",
        "DE" => "+49",
        "FR" => "+33",
        "AU" => "+61",
        "KR" => "+82",
        "IN" => "+91",
        "RU" => "+7",
        "BR" => "+55",
        _ => "+000",
    }
}

fn currency(code: &str) -> &'static str {
    match code {
        "CN" => "CNY",
        "US" => "USD",
        "JP" => "JPY",
        "GB" => "GBP",
        "DE" | "FR" => "EUR",
        "CA" => "CAD",
        "AU" => "AUD",
        "KR" => "KRW",
        "IN" => "INR",
        "RU" => "RUB",
        "BR" => "BRL",
        _ => "USD",
    }
}

fn currency_name(code: &str) -> &'static str {
    match code {
        "CN" => "人民币",
        "US" => "美元",
        "JP" => "日元",
        "GB" => "英镑",
        "DE" | "FR" => "欧元",
        "CA" => "加元",
        "AU" => "澳元",
        "KR" => "韩元",
        "IN" => "卢比",
        "RU" => "卢布",
        "BR" => "雷亚尔",
        _ => "美元",
    }
}

fn languages(code: &str) -> &'static str {
    match code {
        "CN" => "zh-CN,en",
        "US" => "en-US,es",
        "JP" => "ja,en",
        "GB" => "en-GB",
        "DE" => "de,en",
        "FR" => "fr,en",
        "CA" => "en,fr",
        "AU" => "en-AU",
        "KR" => "ko,en",
        "IN" => "hi,en",
        "RU" => "ru,en",
        "BR" => "pt-BR,en",
        _ => "en",
    }
}

fn country_area(country: &str) -> f64 {
    match country {
        "中国" | "China" => 9_596_961.0,
        "美国" | "United States" => 9_833_517.0,
        "日本" | "Japan" => 377_975.0,
        "英国" | "United Kingdom" => 242_495.0,
        "德国" | "Germany" => 357_114.0,
        "法国" | "France" => 643_801.0,
        "加拿大" | "Canada" => 9_984_670.0,
        "澳大利亚" | "Australia" => 7_692_024.0,
        "韩国" | "South Korea" => 100_210.0,
        "印度" | "India" => 3_287_263.0,
        "俄罗斯" | "Russia" => 17_098_246.0,
        "巴西" | "Brazil" => 8_515_767.0,
        _ => 0.0,
    }
}

fn country_population(country: &str) -> u64 {
    match country {
        "中国" | "China" => 1_439_323_776,
        "美国" | "United States" => 331_002_651,
        "日本" | "Japan" => 126_476_461,
        "英国" | "United Kingdom" => 67_886_011,
        "德国" | "Germany" => 83_783_942,
        "法国" | "France" => 65_273_511,
        "加拿大" | "Canada" => 37_742_154,
        "澳大利亚" | "Australia" => 25_499_884,
        "韩国" | "South Korea" => 51_269_185,
        "印度" | "India" => 1_380_004_385,
        "俄罗斯" | "Russia" => 145_934_462,
        "巴西" | "Brazil" => 212_559_417,
        _ => 0,
    }
}
