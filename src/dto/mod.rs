pub mod ip_info;

pub use ip_info::IpInfoResponse;
