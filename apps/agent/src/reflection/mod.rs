//! Reflection/Validation Engine.
//!
//! Scores a finished analysis for completeness and reliability, produces a
//! typed issue list, and decides whether the artifact requires revision.
//! The engine is pure and infallible: absence of data always becomes a low
//! score plus an explanatory issue, never an error.

use serde::{Deserialize, Serialize};

mod feedback;
mod validators;

pub use feedback::get_reflection_feedback;
pub use validators::{
    calculate_analysis_metrics, validate_analysis, validate_data_sources,
    validate_github_integration, validate_learning_plan_quality, validate_skill_coverage,
    ValidationInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationRisk {
    /// Analysis must be revised.
    Critical,
    /// Significant quality issues.
    High,
    /// Minor quality issues.
    Medium,
    /// Negligible impact.
    Low,
    /// No issues.
    None,
}

/// A single flagged quality/completeness problem. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub risk_level: ValidationRisk,
    pub category: String,
    pub description: String,
    pub recommendation: String,
    /// 0-1: how much this affects overall quality.
    pub impact_score: f64,
}

impl ValidationIssue {
    pub fn new(
        risk_level: ValidationRisk,
        category: &str,
        description: impl Into<String>,
        recommendation: &str,
        impact_score: f64,
    ) -> Self {
        Self {
            risk_level,
            category: category.to_string(),
            description: description.into(),
            recommendation: recommendation.to_string(),
            impact_score,
        }
    }
}

/// Diagnostic metrics attached to a validation report as its
/// `validation_details`. These feed the reliability aggregate but are
/// otherwise informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub skill_coverage: f64,
    pub learning_resources_coverage: f64,
    pub market_data_coverage: f64,
    pub github_coverage: f64,

    pub gap_analysis_depth: usize,
    pub resource_diversity: usize,
    pub project_type_coverage: usize,

    pub skill_validation_accuracy: f64,
    pub prerequisite_coverage: f64,
    pub time_estimation_confidence: f64,

    pub overall_confidence: f64,
    pub data_quality_score: f64,
    pub analysis_rigor_score: f64,
}

/// Complete validation report for one analysis. Created once per
/// validation-node execution and never mutated; re-entry replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisValidation {
    pub is_valid: bool,
    pub overall_quality_score: f64,
    pub overall_confidence: f64,
    pub completeness_score: f64,
    pub reliability_score: f64,
    pub issues: Vec<ValidationIssue>,
    pub recommendations: Vec<String>,
    pub requires_revision: bool,
    pub validation_details: AnalysisMetrics,
}

impl AnalysisValidation {
    pub fn count_at(&self, risk: ValidationRisk) -> usize {
        self.issues.iter().filter(|i| i.risk_level == risk).count()
    }
}

/// Actionable feedback derived from a validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionFeedback {
    pub should_revise: bool,
    pub revision_focus: Vec<String>,
    pub missing_analysis: Vec<String>,
    pub strong_areas: Vec<String>,
    pub weak_areas: Vec<String>,
    pub action_items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ValidationRisk::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&ValidationRisk::None).unwrap(),
            "\"none\""
        );
    }
}
