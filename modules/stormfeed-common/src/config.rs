use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, StormfeedError};

const DEFAULT_ALERTS_URL: &str = "https://api.weather.gov/alerts/active";
const DEFAULT_MCD_QUERY_URL: &str = "https://mapservices.weather.noaa.gov/vector/rest/services/outlooks/spc_mesoscale_discussion/MapServer/0/query";
const DEFAULT_SPC_BASE_URL: &str = "https://www.spc.noaa.gov";
const DEFAULT_ALERT_EVENTS: &[&str] = &[
    "Severe Thunderstorm Warning",
    "Tornado Warning",
    "Tornado Watch",
    "Severe Thunderstorm Watch",
    "Special Weather Statement",
];

/// Polls shorter than this hammer api.weather.gov for no benefit.
const MIN_POLL_INTERVAL_SECS: u64 = 5;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Output
    pub output_path: PathBuf,
    pub poll_interval: Duration,

    // NWS alerts
    pub alerts_url: String,
    pub alert_events: Vec<String>,
    pub alerts_timeout: Duration,

    // SPC mesoscale discussions
    pub mcd_query_url: String,
    pub spc_base_url: String,
    pub mcd_list_timeout: Duration,
    pub mcd_text_timeout: Duration,

    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("warnings.json"),
            poll_interval: Duration::from_secs(15),
            alerts_url: DEFAULT_ALERTS_URL.to_string(),
            alert_events: DEFAULT_ALERT_EVENTS.iter().map(|e| e.to_string()).collect(),
            alerts_timeout: Duration::from_secs(15),
            mcd_query_url: DEFAULT_MCD_QUERY_URL.to_string(),
            spc_base_url: DEFAULT_SPC_BASE_URL.to_string(),
            mcd_list_timeout: Duration::from_secs(30),
            mcd_text_timeout: Duration::from_secs(10),
            user_agent: format!("stormfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let poll_secs = secs(&get, "POLL_INTERVAL_SECS")?
            .unwrap_or(defaults.poll_interval.as_secs())
            .max(MIN_POLL_INTERVAL_SECS);

        let alert_events = match get("ALERT_EVENTS") {
            Some(list) => list
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            None => defaults.alert_events,
        };

        Ok(Self {
            output_path: get("STORMFEED_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            poll_interval: Duration::from_secs(poll_secs),
            alerts_url: get("NWS_ALERTS_URL").unwrap_or(defaults.alerts_url),
            alert_events,
            alerts_timeout: secs(&get, "ALERTS_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.alerts_timeout),
            mcd_query_url: get("MCD_QUERY_URL").unwrap_or(defaults.mcd_query_url),
            spc_base_url: get("SPC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.spc_base_url),
            mcd_list_timeout: secs(&get, "MCD_LIST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.mcd_list_timeout),
            mcd_text_timeout: secs(&get, "MCD_TEXT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.mcd_text_timeout),
            user_agent: get("STORMFEED_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    /// Log the effective configuration. Nothing here is secret.
    pub fn log_summary(&self) {
        info!(
            output = %self.output_path.display(),
            poll_interval_secs = self.poll_interval.as_secs(),
            alerts_url = self.alerts_url.as_str(),
            alert_events = self.alert_events.len(),
            mcd_query_url = self.mcd_query_url.as_str(),
            spc_base_url = self.spc_base_url.as_str(),
            alerts_timeout_secs = self.alerts_timeout.as_secs(),
            mcd_list_timeout_secs = self.mcd_list_timeout.as_secs(),
            mcd_text_timeout_secs = self.mcd_text_timeout.as_secs(),
            "Config loaded"
        );
    }
}

fn secs<G>(get: &G, key: &str) -> Result<Option<u64>>
where
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                StormfeedError::Config(format!("{key} must be a whole number of seconds, got {raw:?}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.output_path, PathBuf::from("warnings.json"));
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.alerts_url, DEFAULT_ALERTS_URL);
        assert_eq!(config.alert_events.len(), 5);
        assert_eq!(config.alerts_timeout, Duration::from_secs(15));
        assert_eq!(config.mcd_list_timeout, Duration::from_secs(30));
        assert_eq!(config.mcd_text_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("stormfeed/"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_map(&[
            ("STORMFEED_OUTPUT", "/srv/www/warnings.json"),
            ("POLL_INTERVAL_SECS", "60"),
            ("NWS_ALERTS_URL", "http://localhost:9000/alerts/active"),
            ("ALERT_EVENTS", "Tornado Warning, Tornado Watch ,"),
            ("SPC_BASE_URL", "http://localhost:9001/"),
            ("MCD_TEXT_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.output_path, PathBuf::from("/srv/www/warnings.json"));
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.alerts_url, "http://localhost:9000/alerts/active");
        assert_eq!(config.alert_events, vec!["Tornado Warning", "Tornado Watch"]);
        assert_eq!(config.spc_base_url, "http://localhost:9001");
        assert_eq!(config.mcd_text_timeout, Duration::from_secs(3));
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let config = from_map(&[("POLL_INTERVAL_SECS", "1")]).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(MIN_POLL_INTERVAL_SECS));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = from_map(&[("STORMFEED_OUTPUT", "  "), ("ALERT_EVENTS", "")]).unwrap();
        assert_eq!(config.output_path, PathBuf::from("warnings.json"));
        assert_eq!(config.alert_events.len(), 5);
    }

    #[test]
    fn malformed_number_is_a_config_error() {
        let err = from_map(&[("ALERTS_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, StormfeedError::Config(_)));
        assert!(err.to_string().contains("ALERTS_TIMEOUT_SECS"));
    }
}
