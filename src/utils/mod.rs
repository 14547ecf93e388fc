pub mod client_ip;
pub mod ip_check;

pub use client_ip::extract_client_ip;
pub use ip_check::{is_local_address, is_valid_ip};
