// src/core/scanner/mod.rs

// Each probe or analyzer lives in its own module; this file wires them into
// a single analysis.
pub mod dns_scanner;
pub mod fingerprint_scanner;
pub mod headers_scanner;
pub mod http_prober;
pub mod seo_scanner;
pub mod ssl_scanner;

use chrono::Utc;
use tracing::{info, instrument};

use crate::config::AnalyzerConfig;
use crate::core::error::AnalysisResult;
use crate::core::grading::assess_security;
use crate::core::models::{AnalysisReport, NormalizedTarget};
use crate::core::report::{assemble_report, ScanOutcome};

use self::dns_scanner::run_dns_scan;
use self::fingerprint_scanner::detect_technologies;
use self::headers_scanner::analyze_security_headers;
use self::http_prober::{build_client, probe, probe_reachable};
use self::seo_scanner::analyze_seo;
use self::ssl_scanner::{inspect_certificate, ssl_is_valid};

/// Analyzes one website and returns the full report.
///
/// All network work (four DNS lookups, the main page, `/robots.txt`,
/// `/sitemap.xml` and the optional certificate inspection) is issued
/// concurrently with `tokio::join!`; each carries its own timeout, so the
/// slowest single probe bounds the total time. The analyzers then run on the
/// main-page result and the grade is computed last.
///
/// Only input that cannot be normalized, or an HTTP client that cannot be
/// built, produces an error. Every probe failure degrades into empty or false
/// report fields instead.
#[instrument(skip(raw_url, config), fields(url = %raw_url))]
pub async fn analyze_url(raw_url: &str, config: &AnalyzerConfig) -> AnalysisResult<AnalysisReport> {
    let target = NormalizedTarget::parse(raw_url)?;
    info!(domain = %target.domain, url = %target.normalized_url, "Starting analysis.");

    let client = build_client(config)?;
    let robots_url = target.well_known("robots.txt");
    let sitemap_url = target.well_known("sitemap.xml");

    let certificate_probe = async {
        if config.inspect_certificates {
            inspect_certificate(&target, config.certificate_timeout).await
        } else {
            None
        }
    };

    let (dns, main_page, has_robots_txt, has_sitemap, certificate) = tokio::join!(
        run_dns_scan(&client, &config.doh_endpoint, &target.domain, config.dns_timeout),
        probe(&client, &target.normalized_url, config.page_timeout),
        probe_reachable(&client, &robots_url, config.auxiliary_timeout),
        probe_reachable(&client, &sitemap_url, config.auxiliary_timeout),
        certificate_probe,
    );

    let headers = analyze_security_headers(&main_page);
    let seo = analyze_seo(&main_page.body, has_robots_txt, has_sitemap);
    let technologies = detect_technologies(&main_page);
    let ssl_valid = ssl_is_valid(&target, main_page.fetch_failed);
    let security = assess_security(ssl_valid, &headers);

    let report = assemble_report(
        ScanOutcome {
            target,
            dns,
            main_page,
            certificate,
            ssl_valid,
            headers,
            seo,
            technologies,
            security,
        },
        Utc::now(),
    );

    info!(
        grade = %report.security.grade,
        header_score = report.headers.score,
        seo_score = report.seo.score,
        technologies = report.technologies.len(),
        "Analysis finished."
    );
    Ok(report)
}
