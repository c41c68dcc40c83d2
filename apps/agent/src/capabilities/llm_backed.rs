//! LLM-backed implementations of the prompt-driven analysis capabilities.
//!
//! Each wraps the `TextGenerate` seam, so any text-generation backend (or a
//! test fake) slots in without touching the implementations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::capabilities::prompts::{
    GAP_DETAIL_PROMPT, GAP_LIST_PROMPT, LEARNING_PATH_PROMPT, MARKET_RESEARCH_PROMPT,
    SKILL_VALIDATION_PROMPT,
};
use crate::capabilities::{
    CapabilityError, GapAnalyze, GapAnalysisResults, LearningPathGenerate, LearningPathResults,
    MarketResearch, MarketResearchResults, SkillValidate, SkillValidationResults, TextGenerate,
};

pub struct LlmSkillValidator {
    text: Arc<dyn TextGenerate>,
}

impl LlmSkillValidator {
    pub fn new(text: Arc<dyn TextGenerate>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl SkillValidate for LlmSkillValidator {
    async fn validate(
        &self,
        required: &[String],
        current: &[String],
    ) -> Result<SkillValidationResults, CapabilityError> {
        let prompt = SKILL_VALIDATION_PROMPT
            .replace("{required_skills}", &required.join(", "))
            .replace("{current_skills}", &current.join(", "));
        let analysis = self.text.generate(&prompt).await?;

        let matched = required.iter().filter(|s| current.contains(s)).count();

        Ok(SkillValidationResults {
            validation_analysis: analysis,
            matched_skills: matched,
            total_required: required.len(),
        })
    }
}

pub struct LlmMarketResearcher {
    text: Arc<dyn TextGenerate>,
}

impl LlmMarketResearcher {
    pub fn new(text: Arc<dyn TextGenerate>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl MarketResearch for LlmMarketResearcher {
    async fn research(
        &self,
        job_title: &str,
        required: &[String],
        location: &str,
    ) -> Result<MarketResearchResults, CapabilityError> {
        let prompt = MARKET_RESEARCH_PROMPT
            .replace("{job_title}", job_title)
            .replace("{location}", location)
            .replace("{required_skills}", &required.join(", "));
        let analysis = self.text.generate(&prompt).await?;

        Ok(MarketResearchResults {
            market_analysis: analysis,
        })
    }
}

pub struct LlmGapAnalyzer {
    text: Arc<dyn TextGenerate>,
}

impl LlmGapAnalyzer {
    pub fn new(text: Arc<dyn TextGenerate>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl GapAnalyze for LlmGapAnalyzer {
    /// Two-step analysis: name the gaps from a comma-delimited reply, then
    /// ask for a detailed roadmap over that list.
    async fn analyze(
        &self,
        required: &[String],
        current: &[String],
    ) -> Result<GapAnalysisResults, CapabilityError> {
        let list_prompt = GAP_LIST_PROMPT
            .replace("{required_skills}", &required.join(", "))
            .replace("{current_skills}", &current.join(", "));
        let gap_reply = self.text.generate(&list_prompt).await?;
        let gaps: Vec<String> = gap_reply
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();

        let detail_prompt = GAP_DETAIL_PROMPT.replace("{gaps}", &gaps.join(", "));
        let detail = self.text.generate(&detail_prompt).await?;

        Ok(GapAnalysisResults {
            identified_gaps: gaps,
            gap_analysis: detail,
            prerequisites: Vec::new(),
            time_estimates: None,
        })
    }
}

pub struct LlmLearningPathGenerator {
    text: Arc<dyn TextGenerate>,
}

impl LlmLearningPathGenerator {
    pub fn new(text: Arc<dyn TextGenerate>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl LearningPathGenerate for LlmLearningPathGenerator {
    async fn generate_path(
        &self,
        job_title: &str,
        skill_gaps: &[String],
    ) -> Result<LearningPathResults, CapabilityError> {
        let prompt = LEARNING_PATH_PROMPT
            .replace("{job_title}", job_title)
            .replace("{gaps}", &skill_gaps.join(", "));
        let plan = self.text.generate(&prompt).await?;

        Ok(LearningPathResults {
            learning_plan: plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedText(Vec<&'static str>);

    #[async_trait]
    impl TextGenerate for ScriptedText {
        async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
            // Replies are keyed on which template the prompt came from.
            if prompt.contains("Return ONLY the missing skills") {
                return Ok(self.0[0].to_string());
            }
            Ok(self.0[self.0.len() - 1].to_string())
        }
    }

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_gap_analyzer_splits_comma_delimited_reply() {
        let analyzer = LlmGapAnalyzer::new(Arc::new(ScriptedText(vec![
            "Django, PostgreSQL",
            "Start with Django basics.",
        ])));
        let result = analyzer
            .analyze(&skills(&["Python", "Django", "PostgreSQL"]), &skills(&["Python"]))
            .await
            .unwrap();
        assert_eq!(result.identified_gaps, skills(&["Django", "PostgreSQL"]));
        assert_eq!(result.gap_analysis, "Start with Django basics.");
    }

    #[tokio::test]
    async fn test_gap_analyzer_drops_empty_fragments() {
        let analyzer =
            LlmGapAnalyzer::new(Arc::new(ScriptedText(vec!["Django, , PostgreSQL,", "ok"])));
        let result = analyzer.analyze(&skills(&["Django"]), &[]).await.unwrap();
        assert_eq!(result.identified_gaps, skills(&["Django", "PostgreSQL"]));
    }

    #[tokio::test]
    async fn test_skill_validator_counts_matches() {
        let validator = LlmSkillValidator::new(Arc::new(ScriptedText(vec!["analysis text"])));
        let result = validator
            .validate(
                &skills(&["Python", "Django", "SQL"]),
                &skills(&["Python", "SQL"]),
            )
            .await
            .unwrap();
        assert_eq!(result.matched_skills, 2);
        assert_eq!(result.total_required, 3);
        assert_eq!(result.validation_analysis, "analysis text");
    }

    #[tokio::test]
    async fn test_market_researcher_returns_analysis() {
        let researcher = LlmMarketResearcher::new(Arc::new(ScriptedText(vec!["market summary"])));
        let result = researcher
            .research("Backend Engineer", &skills(&["Python"]), "Remote")
            .await
            .unwrap();
        assert_eq!(result.market_analysis, "market summary");
    }

    #[tokio::test]
    async fn test_learning_path_generator_returns_plan() {
        let generator =
            LlmLearningPathGenerator::new(Arc::new(ScriptedText(vec!["phase one: Django"])));
        let result = generator
            .generate_path("Backend Engineer", &skills(&["Django"]))
            .await
            .unwrap();
        assert_eq!(result.learning_plan, "phase one: Django");
    }
}
