// src/core/grading.rs

use tracing::{debug, info};

use crate::core::knowledge_base::{RequiredSignal, GRADING_RULES};
use crate::core::models::{Grade, SecurityAssessment, SecurityHeaderFindings};

/// Folds SSL validity and header findings into the overall security grade.
///
/// Starts from 100 and applies each knowledge-base penalty whose signal is
/// missing, collecting one issue and one recommendation per penalty.
pub fn assess_security(ssl_valid: bool, headers: &SecurityHeaderFindings) -> SecurityAssessment {
    let mut score: i32 = 100;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    for rule in GRADING_RULES {
        let satisfied = match rule.signal {
            RequiredSignal::ValidSsl => ssl_valid,
            RequiredSignal::Header(header) => headers.flags.is_present(header),
        };
        if satisfied {
            continue;
        }
        debug!(code = rule.code, penalty = rule.penalty, "Applying grade penalty.");
        score -= rule.penalty;
        issues.push(rule.issue.to_string());
        recommendations.push(rule.recommendation.to_string());
    }

    let grade = Grade::from_score(score.max(0));
    info!(score, %grade, issues = issues.len(), "Security grade computed.");
    SecurityAssessment {
        grade,
        issues,
        recommendations,
    }
}
