//! Configuration module

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Built frontend bundle, served only in production
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Upstream FusionSolar northbound API
#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "default_vendor_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub system_code: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            static_dir: None,
        }
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_vendor_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            user_name: None,
            system_code: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_vendor_base_url() -> String {
    "https://eu5.fusionsolar.huawei.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_relay_url() -> String {
    "http://localhost:3001".to_string()
}

// FusionSolar throttles real-time KPI queries to a few per plant per hour
fn default_poll_interval_secs() -> u64 {
    300
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("SOLARRELAY").separator("__"))
            .build()?;

        Self::from_settings(settings)
    }

    /// Deserialize and validate; a bad value is an error, not a silent default
    pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
        let config: Config = settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.vendor.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid vendor.base_url {}: {}", self.vendor.base_url, e))?;

        if self.dashboard.poll_interval_secs == 0 {
            anyhow::bail!("dashboard.poll_interval_secs must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.environment, "development");
        assert!(!config.server.is_production());
        assert_eq!(config.vendor.base_url, "https://eu5.fusionsolar.huawei.com");
        assert_eq!(config.dashboard.poll_interval_secs, 300);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "server": { "port": 8080, "environment": "Production" },
            "dashboard": { "user_name": "api-user" }
        }))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.is_production());
        assert_eq!(config.vendor.timeout_secs, 30);
        assert_eq!(config.dashboard.user_name.as_deref(), Some("api-user"));
        assert_eq!(config.dashboard.relay_url, "http://localhost:3001");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.dashboard.poll_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
    }

    #[test]
    fn test_bad_value_is_an_error() {
        let settings = config::Config::builder()
            .set_override("server.port", "not-a-port")
            .unwrap()
            .set_override("vendor.base_url", "https://intl.fusionsolar.huawei.com")
            .unwrap()
            .build()
            .unwrap();

        let err = Config::from_settings(settings).unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_from_settings_keeps_overrides() {
        let settings = config::Config::builder()
            .set_override("server.port", "8080")
            .unwrap()
            .set_override("vendor.base_url", "https://intl.fusionsolar.huawei.com")
            .unwrap()
            .build()
            .unwrap();

        let config = Config::from_settings(settings).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.vendor.base_url, "https://intl.fusionsolar.huawei.com");
        assert_eq!(config.dashboard.poll_interval_secs, 300);
    }
}
