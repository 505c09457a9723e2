use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use thiserror::Error;

use crate::logging::LogFormat;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_AUTH_SERVER_SCHEME: &str = "https";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub settings_path: PathBuf,
    pub session_secret: String,
    pub auth_server_scheme: String,
    pub session_cookie_secure: bool,
    pub log_format: LogFormat,
    pub rate_limit_auth_seconds: u64,
    pub rate_limit_auth_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let auth_server_scheme = lookup("AUTH_SERVER_SCHEME")
            .unwrap_or_else(|| DEFAULT_AUTH_SERVER_SCHEME.to_string());
        if auth_server_scheme != "https" && auth_server_scheme != "http" {
            return Err(ConfigError::Invalid {
                key: "AUTH_SERVER_SCHEME",
                value: auth_server_scheme,
            });
        }

        Ok(Config {
            bind_addr: parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?,
            settings_path: PathBuf::from(required("SETTINGS_PATH")?),
            session_secret: required("SESSION_SECRET")?,
            auth_server_scheme,
            session_cookie_secure: parse_or(&lookup, "SESSION_COOKIE_SECURE", "true")?,
            log_format: parse_or(&lookup, "LOG_FORMAT", "pretty")?,
            rate_limit_auth_seconds: parse_or(&lookup, "RATE_LIMITER_AUTH_SECONDS", "1")?,
            rate_limit_auth_burst: parse_or(&lookup, "RATE_LIMITER_AUTH_BURST", "10")?,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        bind_addr: DEFAULT_BIND_ADDR.parse().unwrap(),
        settings_path: PathBuf::from("config.json"),
        session_secret: "0123456789abcdef0123456789abcdef".into(),
        auth_server_scheme: "http".into(),
        session_cookie_secure: true,
        log_format: LogFormat::Pretty,
        rate_limit_auth_seconds: 1,
        rate_limit_auth_burst: 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("SETTINGS_PATH", "/etc/app/config.json"),
            ("SESSION_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.settings_path, PathBuf::from("/etc/app/config.json"));
        assert_eq!(config.auth_server_scheme, "https");
        assert!(config.session_cookie_secure);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.rate_limit_auth_seconds, 1);
        assert_eq!(config.rate_limit_auth_burst, 10);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SETTINGS_PATH", "config.json"),
            ("SESSION_SECRET", "secret"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("AUTH_SERVER_SCHEME", "http"),
            ("SESSION_COOKIE_SECURE", "false"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.auth_server_scheme, "http");
        assert!(!config.session_cookie_secure);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_settings_path_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("SESSION_SECRET", "secret")])).unwrap_err();

        assert_eq!(err, ConfigError::Missing("SETTINGS_PATH"));
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = Config::from_lookup(lookup_from(&[
            ("SETTINGS_PATH", "config.json"),
            ("SESSION_SECRET", "secret"),
            ("BIND_ADDR", "not-an-addr"),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "BIND_ADDR",
                value: "not-an-addr".into()
            }
        );
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("SETTINGS_PATH", "config.json"),
            ("SESSION_SECRET", "secret"),
            ("AUTH_SERVER_SCHEME", "ftp"),
        ]))
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "AUTH_SERVER_SCHEME",
                ..
            }
        ));
    }
}
