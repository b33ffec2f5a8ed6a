// src/core/scanner/fingerprint_scanner.rs

use tracing::{debug, info};

use crate::core::models::HttpProbeResult;

/// Where a signature looks for its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    /// The value of a response header (lowercased name).
    Header(&'static str),
    /// The raw HTML body.
    Body,
}

/// One row of the signature table: if `pattern` occurs in `signal`, the site
/// uses `tech_name`.
struct Signature {
    signal: Signal,
    pattern: &'static str,
    tech_name: &'static str,
}

const fn server(pattern: &'static str, tech_name: &'static str) -> Signature {
    Signature { signal: Signal::Header("server"), pattern, tech_name }
}

const fn powered_by(pattern: &'static str, tech_name: &'static str) -> Signature {
    Signature { signal: Signal::Header("x-powered-by"), pattern, tech_name }
}

const fn body(pattern: &'static str, tech_name: &'static str) -> Signature {
    Signature { signal: Signal::Body, pattern, tech_name }
}

/// The master signature table. Patterns are lowercase; order decides the
/// order of the reported technologies.
static SIGNATURES: &[Signature] = &[
    // Hosting / web servers
    server("nginx", "Nginx"),
    server("apache", "Apache"),
    server("cloudflare", "Cloudflare"),
    server("vercel", "Vercel"),
    server("netlify", "Netlify"),
    // Server-side runtimes
    powered_by("php", "PHP"),
    powered_by("asp.net", "ASP.NET"),
    powered_by("express", "Express.js"),
    powered_by("next.js", "Next.js"),
    // Front-end frameworks and platforms
    body("react", "React"),
    body("vue", "Vue.js"),
    body("angular", "Angular"),
    body("jquery", "jQuery"),
    body("bootstrap", "Bootstrap"),
    body("tailwind", "Tailwind CSS"),
    body("wordpress", "WordPress"),
    body("shopify", "Shopify"),
    body("wix", "Wix"),
    body("squarespace", "Squarespace"),
    body("gatsby", "Gatsby"),
    body("nuxt", "Nuxt.js"),
    body("svelte", "Svelte"),
    // Analytics & tracking
    body("google-analytics", "Google Analytics"),
    body("gtag", "Google Analytics"),
    body("hotjar", "Hotjar"),
    body("segment", "Segment"),
    body("mixpanel", "Mixpanel"),
];

/// Detects technologies from the main-page headers and body.
///
/// Matching is case-insensitive substring containment. Each technology is
/// reported once, in signature-table order.
pub fn detect_technologies(probe: &HttpProbeResult) -> Vec<String> {
    let body = probe.body.to_lowercase();
    let server = probe.header("server").map(str::to_lowercase);
    let powered_by = probe.header("x-powered-by").map(str::to_lowercase);

    let mut found: Vec<String> = Vec::new();
    debug!(total_rules = SIGNATURES.len(), "Applying technology signatures.");
    for signature in SIGNATURES {
        let haystack = match signature.signal {
            Signal::Header("server") => server.as_deref(),
            Signal::Header("x-powered-by") => powered_by.as_deref(),
            Signal::Header(_) => None,
            Signal::Body => Some(body.as_str()),
        };
        let Some(haystack) = haystack else { continue };

        if haystack.contains(signature.pattern) && !found.iter().any(|t| t == signature.tech_name) {
            debug!(tech = signature.tech_name, pattern = signature.pattern, "Signature matched.");
            found.push(signature.tech_name.to_string());
        }
    }

    info!(count = found.len(), "Technology detection finished.");
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(headers: &[(&str, &str)], body: &str) -> HttpProbeResult {
        let mut probe = HttpProbeResult {
            status_ok: true,
            body: body.to_string(),
            ..Default::default()
        };
        for (name, value) in headers {
            probe.headers.insert(name.to_string(), value.to_string());
        }
        probe
    }

    #[test]
    fn body_matches_are_case_insensitive_and_deduplicated() {
        let techs = detect_technologies(&probe(&[], "<div id=React>react react</div>"));
        assert_eq!(techs, vec!["React"]);
    }

    #[test]
    fn header_sources_are_checked() {
        let techs = detect_technologies(&probe(
            &[("server", "NGINX/1.25 (Cloudflare)"), ("x-powered-by", "Express")],
            "",
        ));
        assert_eq!(techs, vec!["Nginx", "Cloudflare", "Express.js"]);
    }

    #[test]
    fn analytics_aliases_collapse_into_one() {
        let techs = detect_technologies(&probe(
            &[],
            "<script src=\"https://www.google-analytics.com/analytics.js\"></script><script>gtag('js')</script>",
        ));
        assert_eq!(techs, vec!["Google Analytics"]);
    }

    #[test]
    fn header_patterns_do_not_match_body() {
        let techs = detect_technologies(&probe(&[], "powered by nginx and php"));
        assert!(techs.is_empty());
    }

    #[test]
    fn empty_probe_yields_nothing() {
        assert!(detect_technologies(&HttpProbeResult::failed(0)).is_empty());
    }

    #[test]
    fn order_follows_signature_table() {
        let techs = detect_technologies(&probe(
            &[("x-powered-by", "PHP/8.2")],
            "<link href=bootstrap.css><script src=jquery.js></script><!-- wordpress -->",
        ));
        assert_eq!(techs, vec!["PHP", "jQuery", "Bootstrap", "WordPress"]);
    }
}
