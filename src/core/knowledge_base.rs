//! Static, read-only table of the findings that lower the security grade.
//!
//! Every entry pairs one missing signal with its penalty and the issue and
//! recommendation shown to the user. The table order is the order in which
//! issues are reported.

use crate::core::models::SecurityHeader;

/// The signal a finding is raised for when it is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredSignal {
    /// The site is served over https and the main page was fetched.
    ValidSsl,
    /// A security header from the checklist.
    Header(SecurityHeader),
}

/// A single entry of the knowledge base.
#[derive(Debug)]
pub struct FindingDetail {
    /// A unique, machine-readable identifier (e.g. "HEADERS_HSTS_MISSING").
    pub code: &'static str,
    pub signal: RequiredSignal,
    /// Points deducted from 100 when the signal is missing.
    pub penalty: i32,
    pub issue: &'static str,
    pub recommendation: &'static str,
}

pub static GRADING_RULES: &[FindingDetail] = &[
    FindingDetail {
        code: "SSL_INVALID",
        signal: RequiredSignal::ValidSsl,
        penalty: 30,
        issue: "SSL certificate is invalid or missing",
        recommendation: "Install a valid SSL certificate",
    },
    FindingDetail {
        code: "HEADERS_HSTS_MISSING",
        signal: RequiredSignal::Header(SecurityHeader::StrictTransportSecurity),
        penalty: 10,
        issue: "Missing Strict-Transport-Security header",
        recommendation: "Add HSTS header to enforce HTTPS",
    },
    FindingDetail {
        code: "HEADERS_X_FRAME_OPTIONS_MISSING",
        signal: RequiredSignal::Header(SecurityHeader::XFrameOptions),
        penalty: 10,
        issue: "Missing X-Frame-Options header",
        recommendation: "Add X-Frame-Options to prevent clickjacking",
    },
    FindingDetail {
        code: "HEADERS_CSP_MISSING",
        signal: RequiredSignal::Header(SecurityHeader::ContentSecurityPolicy),
        penalty: 10,
        issue: "Missing Content-Security-Policy header",
        recommendation: "Implement CSP to prevent XSS attacks",
    },
    FindingDetail {
        code: "HEADERS_X_CONTENT_TYPE_OPTIONS_MISSING",
        signal: RequiredSignal::Header(SecurityHeader::XContentTypeOptions),
        penalty: 5,
        issue: "Missing X-Content-Type-Options header",
        recommendation: "Add X-Content-Type-Options: nosniff",
    },
];
