// src/core/target.rs

use tracing::{debug, warn};
use url::Url;

use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::models::{NormalizedTarget, Scheme};

fn has_prefix_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl NormalizedTarget {
    /// Turns arbitrary user input into a fetchable target.
    ///
    /// Input without an `http://` or `https://` prefix gets `https://`. When the
    /// result still does not parse as a URL, the domain is recovered from the
    /// text before the first `/`; only an empty domain is an error.
    pub fn parse(raw: &str) -> AnalysisResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::MissingUrl);
        }

        let normalized_url = if has_prefix_ignore_case(trimmed, "http://")
            || has_prefix_ignore_case(trimmed, "https://")
        {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        match Url::parse(&normalized_url) {
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => {
                let scheme = if url.scheme() == "http" { Scheme::Http } else { Scheme::Https };
                let domain = url.host_str().unwrap_or_default().to_string();
                let port = url.port().unwrap_or_else(|| scheme.default_port());
                debug!(%normalized_url, %domain, %scheme, port, "Target normalized.");
                Ok(Self {
                    raw_url: raw.to_string(),
                    normalized_url,
                    domain,
                    scheme,
                    port,
                })
            }
            parsed => {
                if let Err(e) = parsed {
                    warn!(%normalized_url, error = %e, "URL did not parse, falling back to best-effort domain.");
                }
                Self::degraded(raw, normalized_url)
            }
        }
    }

    /// Best-effort path for inputs the URL parser rejects.
    fn degraded(raw: &str, normalized_url: String) -> AnalysisResult<Self> {
        let scheme = if has_prefix_ignore_case(&normalized_url, "http://") {
            Scheme::Http
        } else {
            Scheme::Https
        };
        let without_scheme = normalized_url
            .find("://")
            .map(|idx| &normalized_url[idx + 3..])
            .unwrap_or(&normalized_url);
        let domain = without_scheme
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        if domain.is_empty() {
            return Err(AnalysisError::InvalidUrl(raw.trim().to_string()));
        }

        Ok(Self {
            raw_url: raw.to_string(),
            normalized_url,
            domain,
            scheme,
            port: scheme.default_port(),
        })
    }

    /// `scheme://host[:port]`, used to build the well-known auxiliary paths.
    pub fn origin(&self) -> String {
        match Url::parse(&self.normalized_url) {
            Ok(url) if url.has_host() => url.origin().ascii_serialization(),
            _ => format!("{}://{}", self.scheme, self.domain),
        }
    }

    /// Absolute URL of `path` on the target's origin.
    pub fn well_known(&self, path: &str) -> String {
        format!("{}/{}", self.origin(), path.trim_start_matches('/'))
    }

    pub fn is_https(&self) -> bool {
        self.scheme == Scheme::Https
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_missing() {
        let target = NormalizedTarget::parse("example.com").unwrap();
        assert_eq!(target.normalized_url, "https://example.com");
        assert_eq!(target.domain, "example.com");
        assert_eq!(target.scheme, Scheme::Https);
        assert_eq!(target.port, 443);
    }

    #[test]
    fn existing_scheme_is_only_trimmed() {
        let target = NormalizedTarget::parse(" http://foo.com ").unwrap();
        assert_eq!(target.normalized_url, "http://foo.com");
        assert_eq!(target.raw_url, " http://foo.com ");
        assert_eq!(target.scheme, Scheme::Http);
        assert_eq!(target.port, 80);
    }

    #[test]
    fn explicit_port_and_path_are_kept() {
        let target = NormalizedTarget::parse("https://shop.example.org:8443/cart?id=1").unwrap();
        assert_eq!(target.domain, "shop.example.org");
        assert_eq!(target.port, 8443);
        assert_eq!(target.origin(), "https://shop.example.org:8443");
        assert_eq!(target.well_known("/robots.txt"), "https://shop.example.org:8443/robots.txt");
    }

    #[test]
    fn uppercase_scheme_is_recognized() {
        let target = NormalizedTarget::parse("HTTP://Example.com/").unwrap();
        assert_eq!(target.normalized_url, "HTTP://Example.com/");
        assert_eq!(target.scheme, Scheme::Http);
        assert_eq!(target.domain, "example.com");
    }

    #[test]
    fn blank_input_is_missing_url() {
        assert!(matches!(NormalizedTarget::parse(""), Err(AnalysisError::MissingUrl)));
        assert!(matches!(NormalizedTarget::parse("   \t"), Err(AnalysisError::MissingUrl)));
    }

    #[test]
    fn unparseable_input_degrades_to_best_guess_domain() {
        let target = NormalizedTarget::parse("exa mple.com/path").unwrap();
        assert_eq!(target.domain, "exa mple.com");
        assert_eq!(target.scheme, Scheme::Https);
        assert_eq!(target.port, 443);
        assert_eq!(target.origin(), "https://exa mple.com");
    }

    #[test]
    fn scheme_without_host_is_invalid() {
        assert!(matches!(
            NormalizedTarget::parse("https://"),
            Err(AnalysisError::InvalidUrl(_))
        ));
    }
}
