use std::net::{IpAddr, SocketAddr};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub frontend_url: String,
    pub service_name: String,
    pub log_service_url: Option<String>,
    pub log_service_api_key: Option<String>,
    pub remote_logging_enabled: bool,
    pub ipgeolocation_api_key: Option<String>,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; the service boots with an empty environment.
    /// Remote log shipping stays off until both `LOG_SERVICE_URL` and
    /// `LOG_SERVICE_API_KEY` are present. `IPGEOLOCATION_API_KEY` enables the
    /// keyed fallback provider.
    ///
    /// On Railway, `PORT` overrides `SERVER_PORT` and host defaults to `0.0.0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `SERVER_HOST` / `SERVER_PORT` contain invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        // Railway provides PORT; fall back to SERVER_PORT, then 3000
        let server_port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        // In production, default to 0.0.0.0 so the platform can route traffic
        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = std::env::var("SERVER_HOST")
            .unwrap_or_else(|_| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());

        let service_name =
            std::env::var("SERVICE_NAME").unwrap_or_else(|_| "ipinfo-api".to_string());

        let log_service_url = std::env::var("LOG_SERVICE_URL").ok().filter(|s| !s.is_empty());
        let log_service_api_key = std::env::var("LOG_SERVICE_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        let remote_logging_enabled = std::env::var("REMOTE_LOGGING_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let ipgeolocation_api_key = std::env::var("IPGEOLOCATION_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            server_host,
            server_port,
            environment,
            log_level,
            frontend_url,
            service_name,
            log_service_url,
            log_service_api_key,
            remote_logging_enabled,
            ipgeolocation_api_key,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}
