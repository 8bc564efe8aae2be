//! Resolved locator settings: env > XDG `[locator]` table > defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::server_properties::default_server_properties_path;
use crate::xdg_toml::{load_locator_table, LocatorTable};
use crate::LoadError;

/// Meta service domain used when nothing is configured.
pub const DEFAULT_META_DOMAIN: &str = "http://apollo.meta";
/// Default period of the background address refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Default delay between failed discovery attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
/// Shortest refresh period; a zero period cannot drive a timer.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);
/// Longest refresh or retry interval; longer values are capped so deadlines stay representable.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub const ENV_META: &str = "APOLLO_META";
pub const ENV_APP_ID: &str = "APP_ID";
pub const ENV_LOCAL_IP: &str = "APOLLO_LOCAL_IP";

/// Unit attached to an interval amount in `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// `amount` of this unit as a [`Duration`]; saturates instead of overflowing.
    pub fn duration(self, amount: u64) -> Duration {
        match self {
            TimeUnit::Milliseconds => Duration::from_millis(amount),
            TimeUnit::Seconds => Duration::from_secs(amount),
            TimeUnit::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(amount.saturating_mul(60 * 60)),
            TimeUnit::Days => Duration::from_secs(amount.saturating_mul(24 * 60 * 60)),
        }
    }
}

/// `interval` clamped to [`MIN_REFRESH_INTERVAL`, `MAX_INTERVAL`].
pub fn refresh_period(interval: Duration) -> Duration {
    let period = interval.clamp(MIN_REFRESH_INTERVAL, MAX_INTERVAL);
    if period != interval {
        tracing::warn!(?interval, ?period, "refresh interval out of range, clamped");
    }
    period
}

/// `interval` capped at [`MAX_INTERVAL`]. A zero retry delay is allowed.
pub fn retry_delay(interval: Duration) -> Duration {
    if interval > MAX_INTERVAL {
        tracing::warn!(?interval, "retry interval too long, capped");
        return MAX_INTERVAL;
    }
    interval
}

/// Everything the locator needs to know about its host and the meta service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorSettings {
    /// Base URL of the meta service, without a trailing `/`.
    pub meta_domain: String,
    pub app_id: String,
    /// Local IP reported to the meta service; `None` omits the `ip` query parameter.
    pub local_ip: Option<String>,
    pub refresh_interval: Duration,
    pub retry_interval: Duration,
    pub server_properties_path: PathBuf,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            meta_domain: DEFAULT_META_DOMAIN.to_string(),
            app_id: String::new(),
            local_ip: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            server_properties_path: default_server_properties_path(),
        }
    }
}

impl LocatorSettings {
    /// Loads settings for `app_name` from the process environment and
    /// `$XDG_CONFIG_HOME/<app_name>/config.toml`.
    pub fn load(app_name: &str) -> Result<Self, LoadError> {
        let table = load_locator_table(app_name)?;
        Ok(Self::resolve(table, |key| std::env::var(key).ok()))
    }

    /// Merges `table` with values from `env`. Non-empty env values win over the table;
    /// anything still unset keeps its default.
    pub fn resolve<F>(table: LocatorTable, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let meta_domain = env(ENV_META)
            .or(table.meta_domain)
            .unwrap_or(defaults.meta_domain);
        let app_id = env(ENV_APP_ID).or(table.app_id).unwrap_or_default();
        let local_ip = env(ENV_LOCAL_IP)
            .or(table.local_ip)
            .filter(|ip| !ip.trim().is_empty());

        let refresh_interval = table
            .refresh_interval
            .map(|n| table.refresh_interval_unit.unwrap_or(TimeUnit::Minutes).duration(n))
            .unwrap_or(defaults.refresh_interval);
        let retry_interval = table
            .retry_interval
            .map(|n| table.retry_interval_unit.unwrap_or(TimeUnit::Seconds).duration(n))
            .unwrap_or(defaults.retry_interval);

        Self {
            meta_domain: meta_domain.trim_end_matches('/').to_string(),
            app_id,
            local_ip,
            refresh_interval: refresh_period(refresh_interval),
            retry_interval: retry_delay(retry_interval),
            server_properties_path: table
                .server_properties
                .unwrap_or(defaults.server_properties_path),
        }
    }

    pub fn with_meta_domain(mut self, domain: impl Into<String>) -> Self {
        self.meta_domain = domain.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_local_ip(mut self, ip: impl Into<String>) -> Self {
        let ip = ip.into();
        self.local_ip = if ip.trim().is_empty() { None } else { Some(ip) };
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = refresh_period(interval);
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = retry_delay(interval);
        self
    }

    pub fn with_server_properties_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.server_properties_path = path.into();
        self
    }
}
