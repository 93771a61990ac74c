//! Printer service configuration

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Printer service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port for the printer API
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default log level when `RUST_LOG` is not set
    pub log_level: String,
    /// Upper bound for a single request
    pub request_timeout: Duration,
    /// A printer whose last agent report is older than this reads `offline`
    pub agent_offline_after: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            environment: "development".into(),
            log_level: "info".into(),
            request_timeout: Duration::from_millis(30_000),
            agent_offline_after: Duration::from_secs(90),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            http_port: parse_env("HTTP_PORT").unwrap_or(defaults.http_port),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: std::env::var("LOG_LEVEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.log_level),
            request_timeout: parse_env("REQUEST_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            agent_offline_after: parse_env("AGENT_OFFLINE_AFTER_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.agent_offline_after),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// How often the agent watchdog looks for silent printers
    pub fn watchdog_interval(&self) -> Duration {
        (self.agent_offline_after / 3).max(Duration::from_secs(1))
    }

    /// Agent reports older than the returned instant count as silence
    pub fn agent_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.agent_offline_after)
            .ok()
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.agent_offline_after, Duration::from_secs(90));
        assert!(!config.is_production());
    }

    #[test]
    fn test_watchdog_interval_has_floor() {
        let config = Config {
            agent_offline_after: Duration::from_secs(2),
            ..Config::default()
        };
        assert_eq!(config.watchdog_interval(), Duration::from_secs(1));
        assert_eq!(Config::default().watchdog_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_agent_cutoff() {
        let now = Utc::now();
        let config = Config::default();
        assert_eq!(config.agent_cutoff(now), now - chrono::Duration::seconds(90));

        let unbounded = Config {
            agent_offline_after: Duration::MAX,
            ..Config::default()
        };
        assert_eq!(unbounded.agent_cutoff(now), DateTime::<Utc>::MIN_UTC);
    }
}
