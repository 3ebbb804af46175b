use crate::shared::events::OverflowPolicy;
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub event_bus_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub heartbeat_interval: Duration,
    pub recommendation_buffer: usize,
    pub class_catalog_path: Option<String>,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (environment, map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let event_bus_capacity = positive(&lookup, "EVENT_BUS_CAPACITY", 256)?;

        let overflow_policy = match lookup("EVENT_BUS_OVERFLOW_POLICY") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidOverflowPolicy)?,
            None => OverflowPolicy::default(),
        };

        let heartbeat_interval =
            Duration::from_secs(positive(&lookup, "HEARTBEAT_INTERVAL_SECS", 15)? as u64);

        let recommendation_buffer = positive(&lookup, "RECOMMENDATION_BUFFER", 1)?;

        let class_catalog_path = lookup("CLASS_CATALOG_PATH").filter(|p| !p.trim().is_empty());

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "gymflow".to_string());

        let metrics_port = lookup("METRICS_PORT")
            .unwrap_or_else(|| "9000".to_string())
            .parse()
            .unwrap_or(9000);

        Ok(Config {
            server_host,
            server_port,
            event_bus_capacity,
            overflow_policy,
            heartbeat_interval,
            recommendation_buffer,
            class_catalog_path,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn positive<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid EVENT_BUS_OVERFLOW_POLICY: {0}")]
    InvalidOverflowPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_address(), "127.0.0.1:3000");
        assert_eq!(config.event_bus_capacity, 256);
        assert_eq!(config.overflow_policy, OverflowPolicy::DropOldest);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(15));
        assert_eq!(config.recommendation_buffer, 1);
        assert!(config.class_catalog_path.is_none());
        assert_eq!(config.service_name, "gymflow");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_PORT", "8080"),
            ("EVENT_BUS_CAPACITY", "32"),
            ("EVENT_BUS_OVERFLOW_POLICY", "drop_latest"),
            ("HEARTBEAT_INTERVAL_SECS", "10"),
            ("CLASS_CATALOG_PATH", "classes.json"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.event_bus_capacity, 32);
        assert_eq!(config.overflow_policy, OverflowPolicy::DropLatest);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(config.class_catalog_path.as_deref(), Some("classes.json"));
    }

    #[test]
    fn test_rejects_zero_heartbeat() {
        let err = config_from(&[("HEARTBEAT_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "HEARTBEAT_INTERVAL_SECS",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_port_and_policy() {
        assert!(matches!(
            config_from(&[("SERVER_PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort
        ));
        assert!(matches!(
            config_from(&[("EVENT_BUS_OVERFLOW_POLICY", "keep_all")]).unwrap_err(),
            ConfigError::InvalidOverflowPolicy(_)
        ));
    }
}
