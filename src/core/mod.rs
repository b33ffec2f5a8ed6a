// src/core/mod.rs

/// Data structures shared by every stage of an analysis, from the normalized
/// target down to the final `AnalysisReport`.
pub mod models;

/// The error type for analyses that cannot produce a report.
pub mod error;

/// URL normalization: user input to a fetchable target.
pub mod target;

/// The probes and analyzers, plus `analyze_url`, which runs them all.
pub mod scanner;

/// Static table of grade penalties with their issue and recommendation text.
pub mod knowledge_base;

pub mod grading;

pub mod report;
