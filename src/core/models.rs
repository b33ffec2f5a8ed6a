// src/core/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display};

// --- Scoring Helpers ---

/// Converts a count of passed checks into a rounded percentage.
///
/// `percentage(1, 6)` is 17, `percentage(4, 6)` is 67. Halves round up, which
/// matches how the presentation layer has always displayed these scores.
pub fn percentage(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((passed as f64 / total as f64) * 100.0).round() as u8
}

// --- Grades ---

// The letter grade shared by the SSL block and the overall security assessment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Display, AsRefStr)]
pub enum Grade {
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Maps a 0-100 security score onto its letter grade.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => Grade::APlus,
            s if s >= 80 => Grade::A,
            s if s >= 70 => Grade::B,
            s if s >= 60 => Grade::C,
            s if s >= 50 => Grade::D,
            _ => Grade::F,
        }
    }
}

// --- Target ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

// The canonical form of the user's input. Built once per analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTarget {
    pub raw_url: String,
    pub normalized_url: String,
    pub domain: String,
    pub scheme: Scheme,
    pub port: u16,
}

// --- DNS Models ---

// Answers for each record type. A failed lookup leaves its list empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSet {
    pub a_records: Vec<String>,
    pub mx_records: Vec<String>,
    pub txt_records: Vec<String>,
    pub ns_records: Vec<String>,
}

// --- HTTP Probe Models ---

/// Everything captured from a single GET request.
///
/// Header names are lowercased. When `fetch_failed` is set the body and headers
/// are empty but `response_time_ms` still reports how long the attempt took.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpProbeResult {
    pub status_ok: bool,
    pub status_code: Option<u16>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub response_time_ms: u64,
    pub fetch_failed: bool,
}

impl HttpProbeResult {
    /// A probe that never produced a response.
    pub fn failed(response_time_ms: u64) -> Self {
        Self {
            response_time_ms,
            fetch_failed: true,
            ..Default::default()
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

// --- Header Scanner Models ---

// The checklist of security headers, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityHeader {
    StrictTransportSecurity,
    XFrameOptions,
    XContentTypeOptions,
    ContentSecurityPolicy,
    XXssProtection,
    ReferrerPolicy,
}

impl SecurityHeader {
    /// The lowercased wire name, e.g. `strict-transport-security`.
    pub fn header_name(self) -> &'static str {
        match self {
            SecurityHeader::StrictTransportSecurity => "strict-transport-security",
            SecurityHeader::XFrameOptions => "x-frame-options",
            SecurityHeader::XContentTypeOptions => "x-content-type-options",
            SecurityHeader::ContentSecurityPolicy => "content-security-policy",
            SecurityHeader::XXssProtection => "x-xss-protection",
            SecurityHeader::ReferrerPolicy => "referrer-policy",
        }
    }
}

// Presence flags for each header of the checklist.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHeaderFlags {
    pub strict_transport_security: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
    pub content_security_policy: bool,
    pub x_xss_protection: bool,
    pub referrer_policy: bool,
}

impl SecurityHeaderFlags {
    pub fn is_present(&self, header: SecurityHeader) -> bool {
        match header {
            SecurityHeader::StrictTransportSecurity => self.strict_transport_security,
            SecurityHeader::XFrameOptions => self.x_frame_options,
            SecurityHeader::XContentTypeOptions => self.x_content_type_options,
            SecurityHeader::ContentSecurityPolicy => self.content_security_policy,
            SecurityHeader::XXssProtection => self.x_xss_protection,
            SecurityHeader::ReferrerPolicy => self.referrer_policy,
        }
    }

    pub fn set(&mut self, header: SecurityHeader, present: bool) {
        let slot = match header {
            SecurityHeader::StrictTransportSecurity => &mut self.strict_transport_security,
            SecurityHeader::XFrameOptions => &mut self.x_frame_options,
            SecurityHeader::XContentTypeOptions => &mut self.x_content_type_options,
            SecurityHeader::ContentSecurityPolicy => &mut self.content_security_policy,
            SecurityHeader::XXssProtection => &mut self.x_xss_protection,
            SecurityHeader::ReferrerPolicy => &mut self.referrer_policy,
        };
        *slot = present;
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityHeaderFindings {
    pub flags: SecurityHeaderFlags,
    pub score: u8,
}

// The `headers` block of the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderReport {
    pub server: Option<String>,
    pub x_powered_by: Option<String>,
    pub content_type: Option<String>,
    pub security_headers: SecurityHeaderFlags,
    pub score: u8,
}

// --- SEO Models ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeoFindings {
    pub has_title: bool,
    pub has_description: bool,
    pub has_viewport: bool,
    pub has_canonical: bool,
    pub has_robots_txt: bool,
    pub has_sitemap: bool,
    pub score: u8,
}

// --- SSL Models ---

// Details read from the leaf certificate during inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub subject_name: String,
    pub issuer_name: String,
    pub not_before: chrono::DateTime<chrono::Utc>,
    pub not_after: chrono::DateTime<chrono::Utc>,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SslInfo {
    pub valid: bool,
    pub issuer: Option<String>,
    pub expires_at: Option<String>,
    pub grade: Grade,
    pub protocol: Option<String>,
}

// --- Report ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub domain: String,
    pub ip: Option<String>,
    pub protocol: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Milliseconds from request start to the end of the body (or the failure).
    pub response_time: u64,
    pub content_length: Option<u64>,
    pub compression: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityAssessment {
    pub grade: Grade,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// The complete result of one analysis, serialized as-is to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub url: String,
    pub timestamp: String,
    pub basic_info: BasicInfo,
    pub ssl: SslInfo,
    pub dns: DnsRecordSet,
    pub headers: HeaderReport,
    pub performance: PerformanceMetrics,
    pub technologies: Vec<String>,
    pub seo: SeoFindings,
    pub security: SecurityAssessment,
}
