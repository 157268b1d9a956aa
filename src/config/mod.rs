//! Service configuration.
//!
//! Everything is read once at startup from environment variables (after an
//! optional `.env` file) into an immutable [`Config`]. Parsing is lenient:
//! a malformed number falls back to its default with a warning instead of
//! refusing to start.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORT` | `3000` |
//! | `RATE_LIMIT_WINDOW_MS` | `900000` (15 minutes) |
//! | `RATE_LIMIT_MAX` | `100` |
//! | `DISCORD_TIMEOUT_SECS` | `10` |
//! | `DISCORD_USER_<LOGIN>` | identity directory entries |
//! | `DISCORD_WEBHOOK_<REPO>` | channel routes |

pub mod routes;

pub use routes::ChannelRoutes;

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::directory::IdentityDirectory;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_millis(900_000);
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-client request limit on the webhook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Length of one fixed window.
    pub window: Duration,
    /// Requests allowed per client in one window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            window: DEFAULT_RATE_LIMIT_WINDOW,
            max_requests: DEFAULT_RATE_LIMIT_MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    /// Timeout for each outbound Discord request.
    pub delivery_timeout: Duration,
    pub routes: ChannelRoutes,
    pub directory: IdentityDirectory,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Reads configuration from `(key, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();

        let window_ms: u64 = parse_or(&vars, "RATE_LIMIT_WINDOW_MS", 0);
        let window = if window_ms == 0 {
            DEFAULT_RATE_LIMIT_WINDOW
        } else {
            Duration::from_millis(window_ms)
        };

        let timeout_secs: u64 = parse_or(&vars, "DISCORD_TIMEOUT_SECS", 0);
        let delivery_timeout = if timeout_secs == 0 {
            DEFAULT_DELIVERY_TIMEOUT
        } else {
            Duration::from_secs(timeout_secs)
        };

        Config {
            port: parse_or(&vars, "PORT", DEFAULT_PORT),
            rate_limit: RateLimitConfig {
                window,
                max_requests: parse_or(&vars, "RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX),
            },
            delivery_timeout,
            routes: ChannelRoutes::from_vars(vars.clone()),
            directory: IdentityDirectory::from_vars(vars),
        }
    }
}

/// Parses `key` if set and non-empty, otherwise returns `default`.
fn parse_or<T>(vars: &HashMap<String, String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!(key, value = raw, error = %e, "Invalid configuration value, using default");
            default
        }
    }
}
