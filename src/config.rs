//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Default sliding TTL window in seconds.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Default sweep interval of the in-process backend in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address the HTTP server binds to
    pub bind_ip: IpAddr,
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection URL; local memory is used when absent
    pub redis_url: Option<String>,
    /// Enables debug-level logging
    pub debug: bool,
    /// Flush the cache once at startup
    pub flush_on_boot: bool,
    /// Sliding TTL window in seconds
    pub cache_ttl: u64,
    /// In-process sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BIND_IP` - Listen address (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `REDIS_URL` - Redis URL, e.g. `redis://localhost:6379` (default: unset, local memory)
    /// - `DEBUG` - Debug logging (default: false)
    /// - `FLUSH_ON_BOOT` - Flush the cache at startup (default: false)
    /// - `CACHE_TTL` - TTL window in seconds (default: 60)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults, and so do zero
    /// durations.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_ip: parse_or(&lookup, "BIND_IP", defaults.bind_ip),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port),
            redis_url: lookup("REDIS_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            debug: lookup("DEBUG").map_or(defaults.debug, |v| parse_flag(&v)),
            flush_on_boot: lookup("FLUSH_ON_BOOT")
                .map_or(defaults.flush_on_boot, |v| parse_flag(&v)),
            cache_ttl: positive_or(&lookup, "CACHE_TTL", defaults.cache_ttl),
            sweep_interval: positive_or(&lookup, "SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }

    /// TTL window as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Sweep interval as a Duration.
    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::from([0, 0, 0, 0]),
            server_port: 8000,
            redis_url: None,
            debug: false,
            flush_on_boot: false,
            cache_ttl: DEFAULT_TTL_SECS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn positive_or<F>(lookup: &F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, name, default) {
        0 => default,
        v => v,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
