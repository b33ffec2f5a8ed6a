// src/core/report.rs

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::models::{
    AnalysisReport, BasicInfo, CertificateInfo, DnsRecordSet, HttpProbeResult, NormalizedTarget,
    PerformanceMetrics, SecurityAssessment, SecurityHeaderFindings, SeoFindings,
};
use crate::core::scanner::headers_scanner::build_header_report;
use crate::core::scanner::ssl_scanner::build_ssl_info;

const COMPRESSION_CODINGS: [&str; 4] = ["gzip", "br", "deflate", "zstd"];

/// Everything the scanners produced for one target, ready to be assembled.
pub struct ScanOutcome {
    pub target: NormalizedTarget,
    pub dns: DnsRecordSet,
    pub main_page: HttpProbeResult,
    pub certificate: Option<CertificateInfo>,
    pub ssl_valid: bool,
    pub headers: SecurityHeaderFindings,
    pub seo: SeoFindings,
    pub technologies: Vec<String>,
    pub security: SecurityAssessment,
}

/// Response timing, payload size and compression of the main page.
pub fn measure_performance(probe: &HttpProbeResult) -> PerformanceMetrics {
    let content_length = if probe.fetch_failed {
        None
    } else {
        probe
            .header("content-length")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|len| *len > 0)
            .or(Some(probe.body.len() as u64))
    };

    let compression = probe.header("content-encoding").is_some_and(|encoding| {
        let encoding = encoding.to_ascii_lowercase();
        COMPRESSION_CODINGS.iter().any(|coding| encoding.contains(coding))
    });

    PerformanceMetrics {
        response_time: probe.response_time_ms,
        content_length,
        compression,
    }
}

/// Composes the final report. No analysis happens here.
pub fn assemble_report(outcome: ScanOutcome, assembled_at: DateTime<Utc>) -> AnalysisReport {
    let header_report = build_header_report(&outcome.main_page, &outcome.headers);
    let performance = measure_performance(&outcome.main_page);
    let ssl = build_ssl_info(outcome.ssl_valid, outcome.certificate.as_ref());

    AnalysisReport {
        url: outcome.target.normalized_url.clone(),
        timestamp: assembled_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        basic_info: BasicInfo {
            domain: outcome.target.domain.clone(),
            ip: outcome.dns.a_records.first().cloned(),
            protocol: outcome.target.scheme.to_string(),
            port: outcome.target.port,
        },
        ssl,
        dns: outcome.dns,
        headers: header_report,
        performance,
        technologies: outcome.technologies,
        seo: outcome.seo,
        security: outcome.security,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Grade, SecurityHeaderFlags};
    use chrono::TimeZone;

    fn page(headers: &[(&str, &str)], body: &str) -> HttpProbeResult {
        let mut probe = HttpProbeResult {
            status_ok: true,
            status_code: Some(200),
            body: body.to_string(),
            response_time_ms: 120,
            ..Default::default()
        };
        for (name, value) in headers {
            probe.headers.insert(name.to_string(), value.to_string());
        }
        probe
    }

    #[test]
    fn content_length_prefers_header_then_body() {
        assert_eq!(measure_performance(&page(&[("content-length", "2048")], "abc")).content_length, Some(2048));
        assert_eq!(measure_performance(&page(&[("content-length", "0")], "abc")).content_length, Some(3));
        assert_eq!(measure_performance(&page(&[], "abcd")).content_length, Some(4));
        assert_eq!(measure_performance(&HttpProbeResult::failed(50)).content_length, None);
    }

    #[test]
    fn compression_detects_common_codings() {
        assert!(measure_performance(&page(&[("content-encoding", "GZIP")], "")).compression);
        assert!(measure_performance(&page(&[("content-encoding", "br")], "")).compression);
        assert!(!measure_performance(&page(&[("content-encoding", "identity")], "")).compression);
        assert!(!measure_performance(&page(&[], "")).compression);
    }

    #[test]
    fn ip_comes_from_first_a_record_and_timestamp_is_utc() {
        let outcome = ScanOutcome {
            target: NormalizedTarget::parse("example.com").unwrap(),
            dns: DnsRecordSet {
                a_records: vec!["93.184.216.34".into(), "93.184.216.35".into()],
                ..Default::default()
            },
            main_page: page(&[("content-type", "text/html")], "<title>x</title>"),
            certificate: None,
            ssl_valid: true,
            headers: SecurityHeaderFindings { flags: SecurityHeaderFlags::default(), score: 0 },
            seo: SeoFindings::default(),
            technologies: Vec::new(),
            security: SecurityAssessment { grade: Grade::C, issues: vec![], recommendations: vec![] },
        };
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let report = assemble_report(outcome, at);

        assert_eq!(report.basic_info.ip.as_deref(), Some("93.184.216.34"));
        assert_eq!(report.basic_info.protocol, "https");
        assert_eq!(report.basic_info.port, 443);
        assert_eq!(report.timestamp, "2026-10-19T08:30:00.000Z");
        assert_eq!(report.url, "https://example.com");
        assert_eq!(report.headers.content_type.as_deref(), Some("text/html"));
        assert_eq!(report.ssl.grade, Grade::A);
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let outcome = ScanOutcome {
            target: NormalizedTarget::parse("http://example.com:8080").unwrap(),
            dns: DnsRecordSet::default(),
            main_page: HttpProbeResult::failed(10),
            certificate: None,
            ssl_valid: false,
            headers: SecurityHeaderFindings::default(),
            seo: SeoFindings::default(),
            technologies: Vec::new(),
            security: SecurityAssessment { grade: Grade::F, issues: vec![], recommendations: vec![] },
        };
        let json = serde_json::to_value(assemble_report(outcome, Utc::now())).unwrap();

        assert_eq!(json["basicInfo"]["ip"], serde_json::Value::Null);
        assert_eq!(json["basicInfo"]["port"], 8080);
        assert_eq!(json["dns"]["aRecords"], serde_json::json!([]));
        assert_eq!(json["headers"]["securityHeaders"]["xXssProtection"], false);
        assert_eq!(json["ssl"]["expiresAt"], serde_json::Value::Null);
        assert_eq!(json["ssl"]["grade"], "F");
        assert_eq!(json["seo"]["hasRobotsTxt"], false);
        assert_eq!(json["performance"]["responseTime"], 10);
        assert_eq!(json["security"]["grade"], "F");
    }
}
