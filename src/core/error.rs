// src/core/error.rs

use thiserror::Error;

/// Errors that abort an analysis before a report can be assembled.
///
/// Probe failures never show up here; they are folded into empty or false
/// report fields by the scanner that hit them.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The caller sent no URL, or only whitespace.
    #[error("URL is required")]
    MissingUrl,

    /// The input could not be turned into anything resembling a domain.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body was not a JSON object.
    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    /// The HTTP client for this analysis could not be built.
    #[error("HTTP client initialization error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// The HTTP status the request boundary answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::MissingUrl => 400,
            _ => 500,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
