//! Settings read from the environment (and a `.env` file, if present).

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "192.168.100.1";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PORT: u16 = 9215;
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 15;
pub const DEFAULT_LOGS_MAX: usize = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `SB8200_HOST`, with or without `http://`
    pub host: String,
    /// `SB8200_USER`
    pub username: String,
    /// `SB8200_PASSWORD`, nothing is scraped without it
    pub password: Option<String>,
    /// `SB8200_PORT`
    pub port: u16,
    /// `SB8200_POLL_INTERVAL`
    pub poll_interval: Duration,
    /// `SB8200_LOGS_MAX`
    pub logs_max: usize,
    /// `SB8200_REQUEST_TIMEOUT`
    pub request_timeout: Duration,
    /// `SB8200_CLEAR_STALE_CHANNELS`
    pub clear_stale_channels: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            host: DEFAULT_HOST.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            port: DEFAULT_PORT,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS),
            logs_max: DEFAULT_LOGS_MAX,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            clear_stale_channels: false,
        }
    }
}

impl Config {
    /// Read the process environment, `.env` included.
    pub fn from_env() -> Config {
        Config::from_vars(|key| dotenv::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. Values that don't parse are reported and
    /// replaced by their default.
    pub fn from_vars<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let seconds = |key: &str, default: Duration| {
            Duration::from_secs(parse_or(var(key), key, default.as_secs()).max(1))
        };

        Config {
            host: var("SB8200_HOST").unwrap_or(defaults.host),
            username: var("SB8200_USER").unwrap_or(defaults.username),
            password: lookup("SB8200_PASSWORD").filter(|p| !p.is_empty()),
            port: parse_or(var("SB8200_PORT"), "SB8200_PORT", defaults.port),
            poll_interval: seconds("SB8200_POLL_INTERVAL", defaults.poll_interval),
            logs_max: parse_or(var("SB8200_LOGS_MAX"), "SB8200_LOGS_MAX", defaults.logs_max),
            request_timeout: seconds("SB8200_REQUEST_TIMEOUT", defaults.request_timeout),
            clear_stale_channels: parse_bool_or(
                var("SB8200_CLEAR_STALE_CHANNELS"),
                "SB8200_CLEAR_STALE_CHANNELS",
                defaults.clear_stale_channels,
            ),
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    let Some(value) = value else {
        return default;
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            log::warn!("couldn't parse {}={:?}, using {}", key, value, default);
            default
        }
    }
}

fn parse_bool_or(value: Option<String>, key: &str, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            log::warn!("couldn't parse {}={:?}, using {}", key, value, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::Config;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.host, "192.168.100.1");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, None);
        assert_eq!(config.port, 9215);
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.logs_max, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.clear_stale_channels);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("SB8200_HOST", "modem.home.arpa"),
            ("SB8200_USER", "technician"),
            ("SB8200_PASSWORD", "secret"),
            ("SB8200_PORT", "9300"),
            ("SB8200_POLL_INTERVAL", "60"),
            ("SB8200_LOGS_MAX", "25"),
            ("SB8200_REQUEST_TIMEOUT", "3"),
            ("SB8200_CLEAR_STALE_CHANNELS", "TRUE"),
        ]);

        assert_eq!(
            config,
            Config {
                host: "modem.home.arpa".to_string(),
                username: "technician".to_string(),
                password: Some("secret".to_string()),
                port: 9300,
                poll_interval: Duration::from_secs(60),
                logs_max: 25,
                request_timeout: Duration::from_secs(3),
                clear_stale_channels: true,
            }
        );
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config(&[
            ("SB8200_HOST", ""),
            ("SB8200_PASSWORD", ""),
            ("SB8200_PORT", "http"),
            ("SB8200_POLL_INTERVAL", "-5"),
            ("SB8200_LOGS_MAX", "lots"),
            ("SB8200_CLEAR_STALE_CHANNELS", "maybe"),
        ]);

        assert_eq!(config, Config::default());
    }

    #[test]
    fn zero_durations_are_clamped() {
        let config = config(&[
            ("SB8200_POLL_INTERVAL", "0"),
            ("SB8200_REQUEST_TIMEOUT", "0"),
        ]);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn password_keeps_whitespace() {
        let config = config(&[("SB8200_PASSWORD", " pass word ")]);
        assert_eq!(config.password.as_deref(), Some(" pass word "));
    }
}
