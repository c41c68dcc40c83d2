use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capabilities::{
    GapAnalysisResults, GithubAnalysisResults, LearningPathResults, MarketResearchResults,
    RagResults, SkillValidationResults,
};
use crate::reflection::{AnalysisValidation, ReflectionFeedback, ValidationInput};
use crate::tools::registry::ToolArgs;

fn default_location() -> String {
    "Remote".to_string()
}

fn default_max_tool_calls() -> u32 {
    5
}

fn default_max_reflection_iterations() -> u32 {
    3
}

/// Input contract for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub job_description: String,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,
    #[serde(default = "default_max_reflection_iterations")]
    pub max_reflection_iterations: u32,
}

/// The run's single source of truth: created once per invocation, mutated in
/// place by each node, owned by exactly one engine execution.
///
/// `executed_tools` and `agent_reasoning` are append-only audit logs; their
/// insertion order is significant and they are never deduplicated. Result
/// slots stay `None` until the matching tool succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    pub session_id: Uuid,

    // Input facts
    pub job_description: String,
    pub current_skills: Vec<String>,
    pub job_title: String,
    pub location: String,
    pub github_username: Option<String>,

    // Derived facts (duplicates not removed automatically)
    pub skills_required: Vec<String>,
    pub skill_gaps: Vec<String>,

    // Per-tool result slots
    pub rag_results: Option<RagResults>,
    pub skill_validation_results: Option<SkillValidationResults>,
    pub market_research_results: Option<MarketResearchResults>,
    pub gap_analysis_results: Option<GapAnalysisResults>,
    pub learning_plan_results: Option<LearningPathResults>,
    pub github_analysis_results: Option<GithubAnalysisResults>,

    // Self-validation
    pub validation_report: Option<AnalysisValidation>,
    pub reflection_feedback: Option<ReflectionFeedback>,
    pub analysis_quality_score: f64,
    pub analysis_confidence_score: f64,

    // Decision tracking
    pub tool_call_count: u32,
    pub max_tool_calls: u32,
    pub reflection_iterations: u32,
    pub max_reflection_iterations: u32,
    pub executed_tools: Vec<String>,
    pub agent_reasoning: Vec<String>,

    // Final artifact
    pub learning_plan: String,
}

impl RunState {
    pub fn new(request: JobRequest) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            job_description: request.job_description,
            current_skills: request.current_skills,
            job_title: request.job_title,
            location: request.location,
            github_username: request.github_username,
            skills_required: Vec::new(),
            skill_gaps: Vec::new(),
            rag_results: None,
            skill_validation_results: None,
            market_research_results: None,
            gap_analysis_results: None,
            learning_plan_results: None,
            github_analysis_results: None,
            validation_report: None,
            reflection_feedback: None,
            analysis_quality_score: 0.0,
            analysis_confidence_score: 0.0,
            tool_call_count: 0,
            max_tool_calls: request.max_tool_calls,
            reflection_iterations: 0,
            max_reflection_iterations: request.max_reflection_iterations,
            executed_tools: Vec::new(),
            agent_reasoning: Vec::new(),
            learning_plan: String::new(),
        }
    }

    pub fn add_reasoning(&mut self, note: impl Into<String>) {
        self.agent_reasoning.push(note.into());
    }

    /// Unions proven languages into the declared skills. Idempotent and
    /// insertion-ordered: existing entries keep their position, new ones are
    /// appended in the order given.
    pub fn merge_github_skills(&mut self, proven_languages: &[String]) {
        for language in proven_languages {
            if !self.current_skills.contains(language) {
                self.current_skills.push(language.clone());
            }
        }
    }

    /// Fraction of the four observation slots (gap, RAG, skill validation,
    /// GitHub) that are populated.
    pub fn information_quality(&self) -> f64 {
        let populated = [
            self.gap_analysis_results.is_some(),
            self.rag_results.is_some(),
            self.skill_validation_results.is_some(),
            self.github_analysis_results.is_some(),
        ]
        .iter()
        .filter(|b| **b)
        .count();
        populated as f64 / 4.0
    }

    pub fn tool_args(&self) -> ToolArgs<'_> {
        ToolArgs {
            required_skills: &self.skills_required,
            current_skills: &self.current_skills,
            skill_gaps: &self.skill_gaps,
            job_title: &self.job_title,
            location: &self.location,
            github_username: self.github_username.as_deref(),
        }
    }

    pub fn validation_input(&self) -> ValidationInput<'_> {
        ValidationInput {
            required_skills: &self.skills_required,
            current_skills: &self.current_skills,
            skill_gaps: &self.skill_gaps,
            learning_plan: &self.learning_plan,
            github_username: self.github_username.as_deref(),
            rag_results: self.rag_results.as_ref(),
            skill_validation: self.skill_validation_results.as_ref(),
            market_research: self.market_research_results.as_ref(),
            gap_analysis: self.gap_analysis_results.as_ref(),
            github_analysis: self.github_analysis_results.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JobRequest {
        serde_json::from_value(serde_json::json!({
            "job_description": "We need a backend engineer."
        }))
        .unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let request = request();
        assert_eq!(request.location, "Remote");
        assert_eq!(request.max_tool_calls, 5);
        assert_eq!(request.max_reflection_iterations, 3);
        assert!(request.current_skills.is_empty());
        assert!(request.github_username.is_none());
    }

    #[test]
    fn test_new_state_is_zeroed() {
        let state = RunState::new(request());
        assert_eq!(state.tool_call_count, 0);
        assert_eq!(state.reflection_iterations, 0);
        assert!(state.rag_results.is_none());
        assert!(state.learning_plan.is_empty());
        assert_eq!(state.information_quality(), 0.0);
    }

    #[test]
    fn test_github_skill_union_is_idempotent() {
        let mut state = RunState::new(request());
        state.current_skills = vec!["Python".to_string()];

        let proven = vec!["Rust".to_string(), "Python".to_string()];
        state.merge_github_skills(&proven);
        state.merge_github_skills(&proven);

        assert_eq!(state.current_skills, vec!["Python", "Rust"]);
    }

    #[test]
    fn test_reasoning_preserves_insertion_order() {
        let mut state = RunState::new(request());
        state.add_reasoning("first");
        state.add_reasoning("second");
        state.add_reasoning("first");
        assert_eq!(state.agent_reasoning, vec!["first", "second", "first"]);
    }
}
