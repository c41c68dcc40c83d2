//! Tool identifiers and the uniform result envelope.
//!
//! Every tool invocation — success or failure — produces a `ToolResult`.
//! Failure is a value: exceptions never cross the tool boundary.

use serde::{Deserialize, Serialize};

use crate::capabilities::{
    GapAnalysisResults, GithubAnalysisResults, LearningPathResults, MarketResearchResults,
    RagResults, SkillValidationResults,
};

pub mod registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    RagQuery,
    SkillValidator,
    MarketResearch,
    GapAnalyzer,
    LearningPathGenerator,
    GithubAnalyzer,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::RagQuery => "rag_query",
            ToolKind::SkillValidator => "skill_validator",
            ToolKind::MarketResearch => "market_research",
            ToolKind::GapAnalyzer => "gap_analyzer",
            ToolKind::LearningPathGenerator => "learning_path_generator",
            ToolKind::GithubAnalyzer => "github_analyzer",
        }
    }
}

/// Structured payload of a tool invocation. Serializes as a plain JSON
/// mapping; the `Empty` variant (failures, unknown tools) serializes as `{}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolData {
    Rag(RagResults),
    SkillValidation(SkillValidationResults),
    Market(MarketResearchResults),
    Gap(GapAnalysisResults),
    LearningPath(LearningPathResults),
    Github(GithubAnalysisResults),
    Empty {},
}

/// Output envelope of one tool invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub tool: ToolKind,
    pub success: bool,
    pub data: ToolData,
    pub confidence: f64,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(tool: ToolKind, data: ToolData, confidence: f64) -> Self {
        Self {
            tool,
            success: true,
            data,
            confidence,
            error: None,
        }
    }

    pub fn failure(tool: ToolKind, error: impl Into<String>) -> Self {
        Self {
            tool,
            success: false,
            data: ToolData::Empty {},
            confidence: 0.0,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ToolKind::GapAnalyzer).unwrap();
        assert_eq!(json, "\"gap_analyzer\"");
    }

    #[test]
    fn test_failure_envelope_has_empty_mapping_data() {
        let result = ToolResult::failure(ToolKind::RagQuery, "boom");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["data"], serde_json::json!({}));
        assert_eq!(value["error"], "boom");
        assert_eq!(value["confidence"], 0.0);
    }

    #[test]
    fn test_success_envelope_carries_payload_fields() {
        let result = ToolResult::success(
            ToolKind::MarketResearch,
            ToolData::Market(crate::capabilities::MarketResearchResults {
                market_analysis: "hot market".to_string(),
            }),
            0.8,
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["data"]["market_analysis"], "hot market");
        assert_eq!(value["error"], serde_json::Value::Null);
    }
}
