//! API configuration.

use std::path::PathBuf;

use smilebooth_models::DEFAULT_CASCADE_BASE_URL;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Static root; captures live in `<static_dir>/images` unless overridden
    pub static_dir: PathBuf,
    /// Directory of stored captures
    pub image_dir: PathBuf,
    /// Directory holding the cascade definitions
    pub cascade_dir: PathBuf,
    /// Mirror the cascade definitions are fetched from
    pub cascade_base_url: String,
    /// Download missing cascade definitions at startup
    pub provision_cascades: bool,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Expose Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let static_dir = PathBuf::from("static");
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            image_dir: static_dir.join("images"),
            static_dir,
            cascade_dir: PathBuf::from("haarcascade"),
            cascade_base_url: DEFAULT_CASCADE_BASE_URL.to_string(),
            provision_cascades: true,
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            host: lookup("API_HOST").unwrap_or(defaults.host),
            port: lookup("API_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            image_dir: lookup("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| static_dir.join("images")),
            static_dir,
            cascade_dir: lookup("CASCADE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cascade_dir),
            cascade_base_url: lookup("CASCADE_BASE_URL").unwrap_or(defaults.cascade_base_url),
            provision_cascades: lookup("PROVISION_CASCADES")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.provision_cascades),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: lookup("MAX_BODY_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: lookup("METRICS_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Socket address string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off")
}
