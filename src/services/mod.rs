pub mod enrichment;
pub mod ip_info;
pub mod location;
pub mod telemetry;
