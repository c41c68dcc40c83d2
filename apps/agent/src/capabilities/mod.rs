//! Capability Clients — trait seams for every external collaborator.
//!
//! The workflow engine and the tool registry never talk to a concrete
//! service; they hold `Arc<dyn Trait>` handles injected at construction
//! time. `LlmClient` implements `TextGenerate`; the three prompt-driven
//! analysis capabilities have LLM-backed implementations in `llm_backed`.
//! Retrieval (`RagRetrieve`) and profile analysis (`GithubAnalyze`) stay
//! pure seams here — their backends live outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod llm_backed;
mod prompts;

/// Failure of an outbound capability call. At the tool boundary these are
/// converted into `ToolResult { success: false }` envelopes; inside a node
/// handler they are fatal to the run.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("text generation failed: {0}")]
    Generation(String),

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("upstream service failed: {0}")]
    Upstream(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait seams
// ────────────────────────────────────────────────────────────────────────────

/// Single-shot text generation. No streaming.
#[async_trait]
pub trait TextGenerate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError>;
}

/// Retrieval over the learning-resource corpus.
#[async_trait]
pub trait RagRetrieve: Send + Sync {
    async fn query(&self, query: &str) -> Result<RagResults, CapabilityError>;
}

/// Skill relevance/prerequisite validation.
#[async_trait]
pub trait SkillValidate: Send + Sync {
    async fn validate(
        &self,
        required: &[String],
        current: &[String],
    ) -> Result<SkillValidationResults, CapabilityError>;
}

/// Salary/trend/competitor research for a role.
#[async_trait]
pub trait MarketResearch: Send + Sync {
    async fn research(
        &self,
        job_title: &str,
        required: &[String],
        location: &str,
    ) -> Result<MarketResearchResults, CapabilityError>;
}

/// Skill-gap identification with difficulty and priority.
#[async_trait]
pub trait GapAnalyze: Send + Sync {
    async fn analyze(
        &self,
        required: &[String],
        current: &[String],
    ) -> Result<GapAnalysisResults, CapabilityError>;
}

/// Learning-path drafting for a set of gaps.
#[async_trait]
pub trait LearningPathGenerate: Send + Sync {
    async fn generate_path(
        &self,
        job_title: &str,
        skill_gaps: &[String],
    ) -> Result<LearningPathResults, CapabilityError>;
}

/// Public-profile analysis. May fail (network/auth); the tool boundary turns
/// that failure into a value, never an exception the engine must handle.
#[async_trait]
pub trait GithubAnalyze: Send + Sync {
    async fn analyze(&self, username: &str) -> Result<GithubAnalysisResults, CapabilityError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Capability response records
// ────────────────────────────────────────────────────────────────────────────

/// A single learning resource returned by retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResource {
    pub topic: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResults {
    pub rag_response: String,
    pub resources: Vec<LearningResource>,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillValidationResults {
    pub validation_analysis: String,
    pub matched_skills: usize,
    pub total_required: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketResearchResults {
    pub market_analysis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysisResults {
    pub identified_gaps: Vec<String>,
    pub gap_analysis: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimates: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPathResults {
    pub learning_plan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubMetrics {
    pub total_repos: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubLanguage {
    pub name: String,
    pub repos: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvenSkills {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub frameworks_and_tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubAnalysisResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub metrics: GithubMetrics,
    #[serde(default)]
    pub languages: Vec<GithubLanguage>,
    #[serde(default)]
    pub proven_skills: ProvenSkills,
    #[serde(default)]
    pub project_types: Vec<String>,
}
