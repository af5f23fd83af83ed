use std::time::Duration;

use trainhub_notify::SchedulerConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Cadence of the background jobs.
    pub scheduler: SchedulerConfig,
    /// Upper bound on one push provider call (default: `10`).
    pub push_timeout_secs: u64,
    /// Push gateway endpoint. Pushes are simulated when unset.
    pub push_gateway_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `HOST`                      | `0.0.0.0` |
    /// | `PORT`                      | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`      |
    /// | `REMINDER_INTERVAL_SECS`    | `1800`    |
    /// | `NOTIFICATION_CLEANUP_HOUR` | `3`       |
    /// | `TOKEN_CLEANUP_HOUR`        | `4`       |
    /// | `PUSH_TIMEOUT_SECS`         | `10`      |
    /// | `PUSH_GATEWAY_URL`          | unset     |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, a zero reminder interval, or a cleanup
    /// hour outside `0..=23`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let reminder_interval_secs: u64 = std::env::var("REMINDER_INTERVAL_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("REMINDER_INTERVAL_SECS must be a valid u64");
        assert!(
            reminder_interval_secs > 0,
            "REMINDER_INTERVAL_SECS must be greater than zero"
        );

        let notification_cleanup_hour = parse_hour("NOTIFICATION_CLEANUP_HOUR", 3);
        let token_cleanup_hour = parse_hour("TOKEN_CLEANUP_HOUR", 4);

        let push_timeout_secs: u64 = std::env::var("PUSH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("PUSH_TIMEOUT_SECS must be a valid u64");

        let push_gateway_url = std::env::var("PUSH_GATEWAY_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            host,
            port,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            scheduler: SchedulerConfig {
                reminder_interval: Duration::from_secs(reminder_interval_secs),
                notification_cleanup_hour,
                token_cleanup_hour,
            },
            push_timeout_secs,
            push_gateway_url,
        }
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs)
    }
}

fn parse_hour(var: &str, default: u32) -> u32 {
    let hour: u32 = std::env::var(var)
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{var} must be a valid hour")))
        .unwrap_or(default);
    assert!(hour <= 23, "{var} must be between 0 and 23");
    hour
}
