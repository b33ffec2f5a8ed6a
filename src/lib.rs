//! SiteScope: on-demand analysis of a single website.
//!
//! [`analyze_url`] normalizes the input, probes DNS (over HTTPS), the page and
//! its `/robots.txt` and `/sitemap.xml` concurrently, then scores security
//! headers, SEO and the overall security grade and detects the technologies
//! in use. [`api::handle_request`] wraps it in the JSON request/response
//! contract used by the web front end.

pub mod api;
pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::AnalyzerConfig;
pub use crate::core::error::{AnalysisError, AnalysisResult};
pub use crate::core::models::AnalysisReport;
pub use crate::core::scanner::analyze_url;
