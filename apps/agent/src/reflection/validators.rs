use std::collections::HashSet;

use crate::capabilities::{
    GapAnalysisResults, GithubAnalysisResults, MarketResearchResults, RagResults,
    SkillValidationResults,
};
use crate::reflection::{
    AnalysisMetrics, AnalysisValidation, ValidationIssue, ValidationRisk,
};

const PHASE_MARKERS: &[&str] = &["phase", "week", "month", "short-term", "medium-term"];
const RESOURCE_MARKERS: &[&str] = &["course", "tutorial", "book", "project", "practice"];
const METRIC_MARKERS: &[&str] = &["metric", "checkpoint", "milestone", "complete", "achieve"];

/// Everything the validators need from a finished run.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub required_skills: &'a [String],
    pub current_skills: &'a [String],
    pub skill_gaps: &'a [String],
    pub learning_plan: &'a str,
    pub github_username: Option<&'a str>,
    pub rag_results: Option<&'a RagResults>,
    pub skill_validation: Option<&'a SkillValidationResults>,
    pub market_research: Option<&'a MarketResearchResults>,
    pub gap_analysis: Option<&'a GapAnalysisResults>,
    pub github_analysis: Option<&'a GithubAnalysisResults>,
}

/// Checks that the required skills are covered somewhere in the gathered
/// analysis: gap-analysis gaps, retrieval resource topics, or GitHub-proven
/// languages/tools. Coverage is 1.0 exactly when every required skill is
/// covered (trivially so when none are required).
pub fn validate_skill_coverage(
    required_skills: &[String],
    gap_analysis: Option<&GapAnalysisResults>,
    rag_results: Option<&RagResults>,
    github_analysis: Option<&GithubAnalysisResults>,
) -> (f64, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let mut covered: HashSet<&str> = HashSet::new();

    if let Some(gaps) = gap_analysis {
        covered.extend(gaps.identified_gaps.iter().map(String::as_str));
    }
    if let Some(rag) = rag_results {
        covered.extend(rag.resources.iter().map(|r| r.topic.as_str()));
    }
    if let Some(github) = github_analysis {
        covered.extend(
            github
                .proven_skills
                .programming_languages
                .iter()
                .map(String::as_str),
        );
        covered.extend(
            github
                .proven_skills
                .frameworks_and_tools
                .iter()
                .map(String::as_str),
        );
    }

    let required_set: HashSet<&str> = required_skills.iter().map(String::as_str).collect();
    let covered_count = required_set.iter().filter(|s| covered.contains(*s)).count();
    let coverage = if required_set.is_empty() {
        1.0
    } else {
        covered_count as f64 / required_set.len() as f64
    };

    // Uncovered skills in declaration order, for a deterministic description.
    let mut seen: HashSet<&str> = HashSet::new();
    let uncovered: Vec<&str> = required_skills
        .iter()
        .map(String::as_str)
        .filter(|s| !covered.contains(*s) && seen.insert(*s))
        .collect();

    if !uncovered.is_empty() && uncovered.len() as f64 > required_set.len() as f64 * 0.3 {
        issues.push(ValidationIssue::new(
            ValidationRisk::High,
            "skill_coverage",
            format!(
                "More than 30% of required skills are uncovered: {}",
                uncovered[..uncovered.len().min(5)].join(", ")
            ),
            "Run additional RAG queries or market research for uncovered skills",
            0.7,
        ));
    }

    (coverage, issues)
}

/// Scores the learning plan by length tier, then penalizes missing phase
/// structure, resource mentions, and success metrics.
pub fn validate_learning_plan_quality(learning_plan: &str) -> (f64, Vec<ValidationIssue>) {
    let mut issues = Vec::new();

    let mut quality_score: f64 = if learning_plan.len() < 500 {
        issues.push(ValidationIssue::new(
            ValidationRisk::Medium,
            "plan_completeness",
            "Learning plan is quite short (less than 500 characters)",
            "Generate a more detailed learning plan with phases and milestones",
            0.4,
        ));
        0.3
    } else if learning_plan.len() > 2000 {
        0.9
    } else {
        0.7
    };

    let plan_lower = learning_plan.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|m| plan_lower.contains(m));

    if !has_any(PHASE_MARKERS) {
        issues.push(ValidationIssue::new(
            ValidationRisk::Medium,
            "plan_structure",
            "Learning plan lacks clear phase-based structure",
            "Organize plan into phases (short/medium/long term)",
            0.3,
        ));
        quality_score -= 0.1;
    }

    if !has_any(RESOURCE_MARKERS) {
        issues.push(ValidationIssue::new(
            ValidationRisk::High,
            "resource_guidance",
            "Learning plan does not reference specific learning resources",
            "Include specific courses, tutorials, books, or projects",
            0.4,
        ));
        quality_score -= 0.2;
    }

    if !has_any(METRIC_MARKERS) {
        issues.push(ValidationIssue::new(
            ValidationRisk::Medium,
            "success_criteria",
            "Learning plan lacks clear success metrics or milestones",
            "Add checkpoints and success criteria for each phase",
            0.3,
        ));
        quality_score -= 0.1;
    }

    (quality_score.clamp(0.0, 1.0), issues)
}

/// Checks that a supplied GitHub profile was actually analyzed and that its
/// proven languages were merged into the declared skills. With no profile
/// supplied there is nothing to validate.
pub fn validate_github_integration(
    github_username: Option<&str>,
    github_analysis: Option<&GithubAnalysisResults>,
    current_skills: &[String],
) -> (f64, Vec<ValidationIssue>) {
    if github_username.is_none() {
        return (1.0, Vec::new());
    }

    let Some(analysis) = github_analysis else {
        return (
            0.3,
            vec![ValidationIssue::new(
                ValidationRisk::High,
                "github_analysis_missing",
                "GitHub username provided but analysis was not completed",
                "Retry GitHub analysis or check API availability",
                0.6,
            )],
        );
    };

    let gh_languages: HashSet<&str> = analysis
        .proven_skills
        .programming_languages
        .iter()
        .map(String::as_str)
        .collect();

    if gh_languages.is_empty() {
        return (
            0.5,
            vec![ValidationIssue::new(
                ValidationRisk::Medium,
                "github_skill_extraction",
                "No programming languages found in GitHub analysis",
                "Verify GitHub profile has repositories with language data",
                0.3,
            )],
        );
    }

    let overlap = current_skills
        .iter()
        .filter(|s| gh_languages.contains(s.as_str()))
        .collect::<HashSet<_>>()
        .len();
    let integration_score = overlap as f64 / gh_languages.len().max(1) as f64;

    let mut issues = Vec::new();
    if integration_score < 0.5 {
        issues.push(ValidationIssue::new(
            ValidationRisk::Low,
            "github_skill_alignment",
            "GitHub-proven skills not well aligned with current skills",
            "This may indicate GitHub profile doesn't match self-reported skills",
            0.2,
        ));
    }

    ((integration_score + 0.5).min(1.0), issues)
}

/// Checks that enough of the four primary data sources fed the analysis.
pub fn validate_data_sources(
    rag_results: Option<&RagResults>,
    skill_validation: Option<&SkillValidationResults>,
    market_research: Option<&MarketResearchResults>,
    gap_analysis: Option<&GapAnalysisResults>,
) -> (f64, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let sources_available = [
        rag_results.is_some(),
        skill_validation.is_some(),
        market_research.is_some(),
        gap_analysis.is_some(),
    ]
    .iter()
    .filter(|b| **b)
    .count();

    let mut source_quality = sources_available as f64 / 4.0;

    if sources_available < 2 {
        issues.push(ValidationIssue::new(
            ValidationRisk::Critical,
            "insufficient_data_sources",
            format!("Only {sources_available} out of 4 data sources are available"),
            "Ensure analysis includes gap analysis and RAG queries at minimum",
            0.8,
        ));
    }

    if let Some(rag) = rag_results {
        if rag.resources.len() < 3 {
            issues.push(ValidationIssue::new(
                ValidationRisk::Medium,
                "insufficient_resources",
                "RAG query returned fewer than 3 learning resources",
                "Run additional RAG queries or use different search terms",
                0.3,
            ));
            source_quality -= 0.1;
        }
    }

    (source_quality.clamp(0.0, 1.0), issues)
}

/// Derives the diagnostic metric set reported as `validation_details`.
pub fn calculate_analysis_metrics(input: &ValidationInput<'_>) -> AnalysisMetrics {
    let skill_coverage = if input.required_skills.is_empty() {
        1.0
    } else {
        input.skill_gaps.len() as f64 / input.required_skills.len() as f64
    };

    let learning_resources = input.rag_results.map_or(0, |r| r.resources.len());
    let resources_coverage =
        (learning_resources as f64 / input.skill_gaps.len().max(1) as f64).min(1.0);

    let market_coverage = if input.market_research.is_some() { 1.0 } else { 0.0 };
    let github_coverage = if input.github_analysis.is_some() { 1.0 } else { 0.5 };

    let gap_depth = input.gap_analysis.map_or(0, |g| g.identified_gaps.len());

    let resource_diversity = input.rag_results.map_or(0, |r| {
        r.resources
            .iter()
            .map(|res| res.resource_type.as_str())
            .collect::<HashSet<_>>()
            .len()
    });

    let project_types = input.github_analysis.map_or(0, |g| g.project_types.len());

    let validation_accuracy = if input.skill_validation.is_some() { 1.0 } else { 0.0 };
    let prerequisites = input.gap_analysis.map_or(0, |g| g.prerequisites.len());
    let prerequisite_coverage =
        (prerequisites as f64 / input.skill_gaps.len().max(1) as f64).min(1.0);
    let time_confidence = match input.gap_analysis {
        Some(g) if g.time_estimates.is_some() => 0.8,
        _ => 0.3,
    };

    let data_sources_used = [
        input.rag_results.is_some(),
        input.skill_validation.is_some(),
        input.market_research.is_some(),
        input.gap_analysis.is_some(),
        input.github_analysis.is_some(),
    ]
    .iter()
    .filter(|b| **b)
    .count();
    let overall_confidence = (data_sources_used as f64 / 4.0).min(1.0);
    let data_quality = (learning_resources as f64 / 5.0 + 0.5).min(1.0);
    let analysis_rigor = (gap_depth as f64 / 5.0 + 0.5).min(1.0);

    AnalysisMetrics {
        skill_coverage,
        learning_resources_coverage: resources_coverage,
        market_data_coverage: market_coverage,
        github_coverage,
        gap_analysis_depth: gap_depth,
        resource_diversity,
        project_type_coverage: project_types,
        skill_validation_accuracy: validation_accuracy,
        prerequisite_coverage,
        time_estimation_confidence: time_confidence,
        overall_confidence,
        data_quality_score: data_quality,
        analysis_rigor_score: analysis_rigor,
    }
}

/// Runs all validators and aggregates scores, issues, recommendations, and
/// the revision decision into one immutable report.
pub fn validate_analysis(input: &ValidationInput<'_>) -> AnalysisValidation {
    let mut all_issues: Vec<ValidationIssue> = Vec::new();

    let (skill_coverage, coverage_issues) = validate_skill_coverage(
        input.required_skills,
        input.gap_analysis,
        input.rag_results,
        input.github_analysis,
    );
    all_issues.extend(coverage_issues);

    let (plan_quality, plan_issues) = validate_learning_plan_quality(input.learning_plan);
    all_issues.extend(plan_issues);

    let (github_quality, github_issues) = validate_github_integration(
        input.github_username,
        input.github_analysis,
        input.current_skills,
    );
    all_issues.extend(github_issues);

    let (source_quality, source_issues) = validate_data_sources(
        input.rag_results,
        input.skill_validation,
        input.market_research,
        input.gap_analysis,
    );
    all_issues.extend(source_issues);

    let metrics = calculate_analysis_metrics(input);

    let completeness_score = ((skill_coverage + source_quality + plan_quality) / 3.0).min(1.0);
    let reliability_score = ((github_quality
        + metrics.data_quality_score
        + metrics.analysis_rigor_score)
        / 3.0)
        .min(1.0);
    let overall_quality = (completeness_score + reliability_score) / 2.0;
    let overall_confidence = metrics.overall_confidence;

    let critical_count = all_issues
        .iter()
        .filter(|i| i.risk_level == ValidationRisk::Critical)
        .count();
    let high_count = all_issues
        .iter()
        .filter(|i| i.risk_level == ValidationRisk::High)
        .count();
    let requires_revision = critical_count > 0 || (high_count > 1 && overall_quality < 0.6);

    let mut recommendations = Vec::new();
    if plan_quality < 0.6 {
        recommendations.push("Regenerate learning plan with more detail and structure".to_string());
    }
    if skill_coverage < 0.7 {
        recommendations.push("Perform additional RAG queries for uncovered skills".to_string());
    }
    if source_quality < 0.5 {
        recommendations.push("Run market research and skill validation tools".to_string());
    }
    if github_quality < 0.5 && input.github_username.is_some() {
        recommendations.push("Retry GitHub profile analysis".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("Analysis looks good - proceed with learning plan".to_string());
    }

    AnalysisValidation {
        is_valid: !requires_revision && overall_quality > 0.5,
        overall_quality_score: overall_quality,
        overall_confidence,
        completeness_score,
        reliability_score,
        issues: all_issues,
        recommendations,
        requires_revision,
        validation_details: metrics,
    }
}
