//! Process configuration read from the environment at startup.

use secrecy::SecretString;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

use crate::infrastructure::supabase::SupabaseSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (in the environment or a .env file)")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for one server process
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub supabase: SupabaseSettings,
    /// Table read by `GET /test`
    pub probe_table: String,
    /// Mounts `/auth/confirm-email-manual` and `/debug/*`
    ///
    /// These routes bypass the provider's security controls.
    /// Never enable outside development.
    pub dev_endpoints_enabled: bool,
}

impl AppConfig {
    /// Reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let url = required("SUPABASE_URL")?;
        let anon_key = required("SUPABASE_ANON_KEY")?;

        let host = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&lookup, "PORT", 5000u16)?;
        let timeout_secs = parse_or(&lookup, "SUPABASE_TIMEOUT_SECS", 10u64)?;

        let dev_endpoints_enabled = lookup("DEV_ENDPOINTS_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            supabase: SupabaseSettings {
                url,
                anon_key: SecretString::from(anon_key),
                timeout: Duration::from_secs(timeout_secs),
            },
            probe_table: lookup("SUPABASE_PROBE_TABLE").unwrap_or_else(|| "test".to_string()),
            dev_endpoints_enabled,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("SUPABASE_URL", "https://xyz.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn defaults() {
        let config = config_from(&REQUIRED).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.probe_table, "test");
        assert_eq!(config.supabase.timeout, Duration::from_secs(10));
        assert!(!config.dev_endpoints_enabled);
    }

    #[test]
    fn missing_url_fails_fast() {
        let err = config_from(&[("SUPABASE_ANON_KEY", "anon")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = config_from(&[("SUPABASE_URL", "https://xyz.supabase.co"), ("SUPABASE_ANON_KEY", " ")])
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn invalid_port() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "not-a-port"));
        let err = config_from(&vars).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "not-a-port".to_string()
            }
        );
    }

    #[test]
    fn dev_endpoints_flag() {
        for (value, expected) in [("true", true), ("TRUE", true), ("1", true), ("false", false), ("yes", false)] {
            let mut vars = REQUIRED.to_vec();
            vars.push(("DEV_ENDPOINTS_ENABLED", value));
            assert_eq!(config_from(&vars).unwrap().dev_endpoints_enabled, expected, "{}", value);
        }
    }

    #[test]
    fn overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SUPABASE_TIMEOUT_SECS", "3"),
            ("SUPABASE_PROBE_TABLE", "health"),
        ]);
        let config = config_from(&vars).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.supabase.timeout, Duration::from_secs(3));
        assert_eq!(config.probe_table, "health");
    }
}
