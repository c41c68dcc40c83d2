use std::collections::HashMap;

use crate::reflection::{AnalysisValidation, ReflectionFeedback, ValidationRisk};

/// Turns a validation report into revision guidance: which categories to
/// focus on, which analyses are missing, and what is already solid.
pub fn get_reflection_feedback(validation: &AnalysisValidation) -> ReflectionFeedback {
    let mut revision_focus = Vec::new();
    for issue in &validation.issues {
        let severe = matches!(
            issue.risk_level,
            ValidationRisk::Critical | ValidationRisk::High
        );
        if severe && !revision_focus.contains(&issue.category) {
            revision_focus.push(issue.category.clone());
        }
    }

    let missing_analysis: Vec<String> = validation
        .recommendations
        .iter()
        .filter(|r| {
            let lower = r.to_lowercase();
            lower.contains("additional") || lower.contains("perform")
        })
        .cloned()
        .collect();

    let mut strong_areas = Vec::new();
    if validation.completeness_score > 0.8 {
        strong_areas.push("Analysis completeness".to_string());
    }
    if validation.reliability_score > 0.8 {
        strong_areas.push("Data reliability".to_string());
    }
    if validation.count_at(ValidationRisk::Critical) == 0 {
        strong_areas.push("No critical issues".to_string());
    }

    // A category is weak when most of its issues are high or critical.
    let mut per_category: HashMap<&str, (usize, usize)> = HashMap::new();
    for issue in &validation.issues {
        let entry = per_category.entry(issue.category.as_str()).or_default();
        entry.0 += 1;
        if matches!(
            issue.risk_level,
            ValidationRisk::Critical | ValidationRisk::High
        ) {
            entry.1 += 1;
        }
    }
    let mut weak_areas: Vec<String> = Vec::new();
    for issue in &validation.issues {
        let (total, severe) = per_category[issue.category.as_str()];
        if severe as f64 > total as f64 * 0.5 && !weak_areas.contains(&issue.category) {
            weak_areas.push(issue.category.clone());
        }
    }

    ReflectionFeedback {
        should_revise: validation.requires_revision,
        revision_focus,
        missing_analysis,
        strong_areas,
        weak_areas,
        action_items: validation.recommendations.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::{AnalysisMetrics, ValidationIssue};

    fn metrics() -> AnalysisMetrics {
        AnalysisMetrics {
            skill_coverage: 0.0,
            learning_resources_coverage: 0.0,
            market_data_coverage: 0.0,
            github_coverage: 0.5,
            gap_analysis_depth: 0,
            resource_diversity: 0,
            project_type_coverage: 0,
            skill_validation_accuracy: 0.0,
            prerequisite_coverage: 0.0,
            time_estimation_confidence: 0.3,
            overall_confidence: 0.0,
            data_quality_score: 0.5,
            analysis_rigor_score: 0.5,
        }
    }

    fn report(issues: Vec<ValidationIssue>, recommendations: Vec<&str>) -> AnalysisValidation {
        AnalysisValidation {
            is_valid: false,
            overall_quality_score: 0.4,
            overall_confidence: 0.2,
            completeness_score: 0.3,
            reliability_score: 0.5,
            issues,
            recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
            requires_revision: true,
            validation_details: metrics(),
        }
    }

    #[test]
    fn test_revision_focus_lists_severe_categories_once() {
        let issues = vec![
            ValidationIssue::new(ValidationRisk::Critical, "insufficient_data_sources", "d", "r", 0.8),
            ValidationIssue::new(ValidationRisk::High, "skill_coverage", "d", "r", 0.7),
            ValidationIssue::new(ValidationRisk::High, "skill_coverage", "d2", "r", 0.7),
            ValidationIssue::new(ValidationRisk::Medium, "plan_structure", "d", "r", 0.3),
        ];
        let feedback = get_reflection_feedback(&report(issues, vec![]));
        assert_eq!(
            feedback.revision_focus,
            vec!["insufficient_data_sources", "skill_coverage"]
        );
        assert!(feedback.should_revise);
    }

    #[test]
    fn test_missing_analysis_picks_action_recommendations() {
        let feedback = get_reflection_feedback(&report(
            vec![],
            vec![
                "Perform additional RAG queries for uncovered skills",
                "Regenerate learning plan with more detail and structure",
            ],
        ));
        assert_eq!(feedback.missing_analysis.len(), 1);
        assert!(feedback.missing_analysis[0].contains("RAG"));
        assert_eq!(feedback.action_items.len(), 2);
    }

    #[test]
    fn test_strong_areas_from_high_scores() {
        let mut validation = report(vec![], vec![]);
        validation.completeness_score = 0.9;
        validation.reliability_score = 0.85;
        let feedback = get_reflection_feedback(&validation);
        assert_eq!(
            feedback.strong_areas,
            vec!["Analysis completeness", "Data reliability", "No critical issues"]
        );
    }

    #[test]
    fn test_weak_areas_need_majority_severe() {
        let issues = vec![
            ValidationIssue::new(ValidationRisk::High, "resource_guidance", "d", "r", 0.4),
            ValidationIssue::new(ValidationRisk::Medium, "plan_structure", "d", "r", 0.3),
            ValidationIssue::new(ValidationRisk::Medium, "mixed", "d", "r", 0.3),
            ValidationIssue::new(ValidationRisk::High, "mixed", "d2", "r", 0.4),
        ];
        let feedback = get_reflection_feedback(&report(issues, vec![]));
        // "mixed" is exactly half severe, which is not a majority.
        assert_eq!(feedback.weak_areas, vec!["resource_guidance"]);
    }
}
