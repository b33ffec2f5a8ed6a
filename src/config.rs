// src/config.rs

use lazy_static::lazy_static;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";
pub const DEFAULT_USER_AGENT: &str = "SiteScope Security Analyzer/1.0";
pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_AUXILIARY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_DNS_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CERTIFICATE_TIMEOUT_MS: u64 = 5_000;

lazy_static! {
    pub static ref ENV_PREFIX: String = env!("CARGO_CRATE_NAME").to_uppercase();
    static ref DOH_URL_ENV: String = format!("{}_DOH_URL", ENV_PREFIX.as_str());
    static ref USER_AGENT_ENV: String = format!("{}_USER_AGENT", ENV_PREFIX.as_str());
    static ref TIMEOUT_ENV: String = format!("{}_TIMEOUT_MS", ENV_PREFIX.as_str());
    static ref AUX_TIMEOUT_ENV: String = format!("{}_AUX_TIMEOUT_MS", ENV_PREFIX.as_str());
    static ref DNS_TIMEOUT_ENV: String = format!("{}_DNS_TIMEOUT_MS", ENV_PREFIX.as_str());
    static ref CERT_TIMEOUT_ENV: String = format!("{}_CERT_TIMEOUT_MS", ENV_PREFIX.as_str());
    static ref INSPECT_CERTS_ENV: String = format!("{}_INSPECT_CERTS", ENV_PREFIX.as_str());
}

/// Knobs for a single analysis. Read-only once an analysis starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// DNS-over-HTTPS JSON endpoint queried with `name` and `type` parameters.
    pub doh_endpoint: String,
    pub user_agent: String,
    pub page_timeout: Duration,
    /// Timeout for `/robots.txt` and `/sitemap.xml`.
    pub auxiliary_timeout: Duration,
    pub dns_timeout: Duration,
    pub inspect_certificates: bool,
    pub certificate_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout: Duration::from_millis(DEFAULT_PAGE_TIMEOUT_MS),
            auxiliary_timeout: Duration::from_millis(DEFAULT_AUXILIARY_TIMEOUT_MS),
            dns_timeout: Duration::from_millis(DEFAULT_DNS_TIMEOUT_MS),
            inspect_certificates: true,
            certificate_timeout: Duration::from_millis(DEFAULT_CERTIFICATE_TIMEOUT_MS),
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overlaid with any `SITESCOPE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparseable values are
    /// logged and skipped so a typo never prevents an analysis from running.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(DOH_URL_ENV.as_str()).filter(|v| !v.trim().is_empty()) {
            config.doh_endpoint = url.trim().to_string();
        }
        if let Some(agent) = lookup(USER_AGENT_ENV.as_str()).filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }
        if let Some(ms) = parse_millis(&lookup, TIMEOUT_ENV.as_str()) {
            config.page_timeout = ms;
        }
        if let Some(ms) = parse_millis(&lookup, AUX_TIMEOUT_ENV.as_str()) {
            config.auxiliary_timeout = ms;
        }
        if let Some(ms) = parse_millis(&lookup, DNS_TIMEOUT_ENV.as_str()) {
            config.dns_timeout = ms;
        }
        if let Some(ms) = parse_millis(&lookup, CERT_TIMEOUT_ENV.as_str()) {
            config.certificate_timeout = ms;
        }
        if let Some(raw) = lookup(INSPECT_CERTS_ENV.as_str()) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.inspect_certificates = true,
                "0" | "false" | "no" | "off" => config.inspect_certificates = false,
                other => warn!(key = %INSPECT_CERTS_ENV.as_str(), value = other, "Ignoring invalid boolean."),
            }
        }

        config
    }

    pub fn with_doh_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.doh_endpoint = endpoint.into();
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_auxiliary_timeout(mut self, timeout: Duration) -> Self {
        self.auxiliary_timeout = timeout;
        self
    }

    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn with_certificate_inspection(mut self, enabled: bool) -> Self {
        self.inspect_certificates = enabled;
        self
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            warn!(key, value = %raw, "Ignoring invalid millisecond value.");
            None
        }
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
    fn defaults_match_documented_timeouts() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.page_timeout, Duration::from_millis(10_000));
        assert_eq!(config.auxiliary_timeout, Duration::from_millis(5_000));
        assert_eq!(config.doh_endpoint, "https://dns.google/resolve");
        assert!(config.inspect_certificates);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = AnalyzerConfig::from_lookup(lookup_from(&[
            ("SITESCOPE_DOH_URL", "https://cloudflare-dns.com/dns-query"),
            ("SITESCOPE_TIMEOUT_MS", "2500"),
            ("SITESCOPE_INSPECT_CERTS", "off"),
        ]));
        assert_eq!(config.doh_endpoint, "https://cloudflare-dns.com/dns-query");
        assert_eq!(config.page_timeout, Duration::from_millis(2500));
        assert!(!config.inspect_certificates);
        assert_eq!(config.auxiliary_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AnalyzerConfig::from_lookup(lookup_from(&[
            ("SITESCOPE_TIMEOUT_MS", "soon"),
            ("SITESCOPE_DNS_TIMEOUT_MS", "0"),
            ("SITESCOPE_INSPECT_CERTS", "maybe"),
        ]));
        assert_eq!(config, AnalyzerConfig::default());
    }
}
