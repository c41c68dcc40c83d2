//! Tool Registry & Dispatcher.
//!
//! The registry is a strategy map from `ToolKind` to a handler object, so
//! adding a tool kind never touches dispatch logic. The dispatcher owns the
//! one budget rule of the system: no tool call starts once
//! `tool_call_count >= max_tool_calls` — exhaustion is a normal outcome
//! returned to the workflow engine, not an error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::capabilities::{
    GapAnalyze, GithubAnalyze, LearningPathGenerate, MarketResearch, RagRetrieve, SkillValidate,
};
use crate::tools::{ToolData, ToolKind, ToolResult};

/// Named arguments drawn from the run state for one tool pass.
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    pub required_skills: &'a [String],
    pub current_skills: &'a [String],
    pub skill_gaps: &'a [String],
    pub job_title: &'a str,
    pub location: &'a str,
    pub github_username: Option<&'a str>,
}

/// One registered tool. Implementations must catch every capability failure
/// locally and express it as a `success = false` envelope.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult;
}

pub struct RagQueryTool(pub Arc<dyn RagRetrieve>);

#[async_trait]
impl ToolHandler for RagQueryTool {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult {
        let query = format!(
            "Advanced learning plan for skills: {}",
            args.required_skills.join(" ")
        );
        match self.0.query(&query).await {
            Ok(results) => {
                let confidence = results.relevance_score;
                ToolResult::success(ToolKind::RagQuery, ToolData::Rag(results), confidence)
            }
            Err(e) => ToolResult::failure(ToolKind::RagQuery, e.to_string()),
        }
    }
}

pub struct SkillValidatorTool(pub Arc<dyn SkillValidate>);

#[async_trait]
impl ToolHandler for SkillValidatorTool {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult {
        match self
            .0
            .validate(args.required_skills, args.current_skills)
            .await
        {
            Ok(results) => {
                let confidence = if results.total_required > 0 {
                    results.matched_skills as f64 / results.total_required as f64
                } else {
                    0.5
                };
                ToolResult::success(
                    ToolKind::SkillValidator,
                    ToolData::SkillValidation(results),
                    confidence,
                )
            }
            Err(e) => ToolResult::failure(ToolKind::SkillValidator, e.to_string()),
        }
    }
}

pub struct MarketResearchTool(pub Arc<dyn MarketResearch>);

#[async_trait]
impl ToolHandler for MarketResearchTool {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult {
        match self
            .0
            .research(args.job_title, args.required_skills, args.location)
            .await
        {
            Ok(results) => {
                ToolResult::success(ToolKind::MarketResearch, ToolData::Market(results), 0.8)
            }
            Err(e) => ToolResult::failure(ToolKind::MarketResearch, e.to_string()),
        }
    }
}

pub struct GapAnalyzerTool(pub Arc<dyn GapAnalyze>);

#[async_trait]
impl ToolHandler for GapAnalyzerTool {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult {
        match self
            .0
            .analyze(args.required_skills, args.current_skills)
            .await
        {
            Ok(results) => ToolResult::success(ToolKind::GapAnalyzer, ToolData::Gap(results), 0.85),
            Err(e) => ToolResult::failure(ToolKind::GapAnalyzer, e.to_string()),
        }
    }
}

pub struct LearningPathTool(pub Arc<dyn LearningPathGenerate>);

#[async_trait]
impl ToolHandler for LearningPathTool {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult {
        match self
            .0
            .generate_path(args.job_title, args.skill_gaps)
            .await
        {
            Ok(results) => ToolResult::success(
                ToolKind::LearningPathGenerator,
                ToolData::LearningPath(results),
                0.8,
            ),
            Err(e) => ToolResult::failure(ToolKind::LearningPathGenerator, e.to_string()),
        }
    }
}

pub struct GithubAnalyzerTool(pub Arc<dyn GithubAnalyze>);

#[async_trait]
impl ToolHandler for GithubAnalyzerTool {
    async fn run(&self, args: &ToolArgs<'_>) -> ToolResult {
        let Some(username) = args.github_username else {
            return ToolResult::failure(ToolKind::GithubAnalyzer, "no GitHub username provided");
        };
        match self.0.analyze(username).await {
            Ok(results) => {
                ToolResult::success(ToolKind::GithubAnalyzer, ToolData::Github(results), 0.8)
            }
            Err(e) => ToolResult::failure(ToolKind::GithubAnalyzer, e.to_string()),
        }
    }
}

/// Strategy map from tool identifier to handler.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<ToolKind, Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ToolKind, handler: Box<dyn ToolHandler>) {
        self.handlers.insert(kind, handler);
    }

    pub fn is_registered(&self, kind: ToolKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    async fn run(&self, kind: ToolKind, args: &ToolArgs<'_>) -> ToolResult {
        match self.handlers.get(&kind) {
            Some(handler) => handler.run(args).await,
            None => ToolResult::failure(kind, format!("no handler registered for {}", kind.as_str())),
        }
    }
}

/// Outcome of a dispatch attempt.
#[derive(Debug)]
pub enum DispatchOutcome {
    Completed(ToolResult),
    /// The per-run call budget is spent; control returns to the engine.
    BudgetExhausted,
}

/// Budget-enforcing front door for all tool invocations.
pub struct Dispatcher {
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Runs one tool, refusing before the call if the budget is spent.
    pub async fn call(
        &self,
        kind: ToolKind,
        args: &ToolArgs<'_>,
        calls_used: u32,
        max_calls: u32,
    ) -> DispatchOutcome {
        if calls_used >= max_calls {
            return DispatchOutcome::BudgetExhausted;
        }
        DispatchOutcome::Completed(self.registry.run(kind, args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{CapabilityError, RagResults};

    struct FailingRag;

    #[async_trait]
    impl RagRetrieve for FailingRag {
        async fn query(&self, _query: &str) -> Result<RagResults, CapabilityError> {
            Err(CapabilityError::Retrieval("index offline".to_string()))
        }
    }

    fn empty_args() -> ToolArgs<'static> {
        ToolArgs {
            required_skills: &[],
            current_skills: &[],
            skill_gaps: &[],
            job_title: "",
            location: "",
            github_username: None,
        }
    }

    #[tokio::test]
    async fn test_dispatcher_refuses_once_budget_spent() {
        let dispatcher = Dispatcher::new(ToolRegistry::new());
        let outcome = dispatcher
            .call(ToolKind::GapAnalyzer, &empty_args(), 5, 5)
            .await;
        assert!(matches!(outcome, DispatchOutcome::BudgetExhausted));
    }

    #[tokio::test]
    async fn test_unregistered_tool_becomes_failed_envelope() {
        let dispatcher = Dispatcher::new(ToolRegistry::new());
        let outcome = dispatcher
            .call(ToolKind::MarketResearch, &empty_args(), 0, 5)
            .await;
        let DispatchOutcome::Completed(result) = outcome else {
            panic!("expected a completed dispatch");
        };
        assert!(!result.success);
        assert!(result.error.unwrap().contains("market_research"));
    }

    #[tokio::test]
    async fn test_capability_failure_becomes_failed_envelope() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolKind::RagQuery, Box::new(RagQueryTool(Arc::new(FailingRag))));
        let dispatcher = Dispatcher::new(registry);

        let outcome = dispatcher
            .call(ToolKind::RagQuery, &empty_args(), 0, 5)
            .await;
        let DispatchOutcome::Completed(result) = outcome else {
            panic!("expected a completed dispatch");
        };
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.unwrap().contains("index offline"));
    }

    #[tokio::test]
    async fn test_github_tool_without_username_fails_as_value() {
        struct NeverCalled;
        #[async_trait]
        impl GithubAnalyze for NeverCalled {
            async fn analyze(
                &self,
                _username: &str,
            ) -> Result<crate::capabilities::GithubAnalysisResults, CapabilityError> {
                unreachable!("handler must short-circuit without a username");
            }
        }

        let handler = GithubAnalyzerTool(Arc::new(NeverCalled));
        let result = handler.run(&empty_args()).await;
        assert!(!result.success);
    }
}
