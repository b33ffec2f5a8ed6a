// src/core/scanner/headers_scanner.rs

use tracing::{debug, info};

use crate::core::models::{
    percentage, HeaderReport, HttpProbeResult, SecurityHeader, SecurityHeaderFindings,
    SecurityHeaderFlags,
};

/// The security headers every response is checked for, in report order.
pub static SECURITY_HEADER_CHECKLIST: [SecurityHeader; 6] = [
    SecurityHeader::StrictTransportSecurity,
    SecurityHeader::XFrameOptions,
    SecurityHeader::XContentTypeOptions,
    SecurityHeader::ContentSecurityPolicy,
    SecurityHeader::XXssProtection,
    SecurityHeader::ReferrerPolicy,
];

/// Checks the main-page response for each header of the checklist.
///
/// Only presence matters, any value counts. A failed fetch carries no headers
/// and therefore scores 0.
pub fn analyze_security_headers(probe: &HttpProbeResult) -> SecurityHeaderFindings {
    let mut flags = SecurityHeaderFlags::default();
    for header in SECURITY_HEADER_CHECKLIST {
        let present = probe.header(header.header_name()).is_some();
        debug!(header_name = header.header_name(), present, "Checked security header.");
        flags.set(header, present);
    }

    let found = SECURITY_HEADER_CHECKLIST
        .iter()
        .filter(|header| flags.is_present(**header))
        .count();
    let score = percentage(found, SECURITY_HEADER_CHECKLIST.len());

    info!(found, score, "Security header scan finished.");
    SecurityHeaderFindings { flags, score }
}

/// Builds the `headers` block of the report from the probe and its findings.
pub fn build_header_report(probe: &HttpProbeResult, findings: &SecurityHeaderFindings) -> HeaderReport {
    HeaderReport {
        server: probe.header("server").map(str::to_string),
        x_powered_by: probe.header("x-powered-by").map(str::to_string),
        content_type: probe.header("content-type").map(str::to_string),
        security_headers: findings.flags,
        score: findings.score,
    }
}
