//! Caller binary: reads one `JobRequest` as JSON from stdin, executes a
//! single workflow run, streams events as JSON lines to stderr, and prints
//! the final run state as JSON to stdout.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent::capabilities::llm_backed::{
    LlmGapAnalyzer, LlmLearningPathGenerator, LlmMarketResearcher, LlmSkillValidator,
};
use agent::config::Config;
use agent::events::EventBus;
use agent::llm_client::LlmClient;
use agent::tools::registry::{
    Dispatcher, GapAnalyzerTool, LearningPathTool, MarketResearchTool, SkillValidatorTool,
    ToolRegistry,
};
use agent::tools::ToolKind;
use agent::workflow::{JobRequest, WorkflowEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.rust_log))
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read job request from stdin")?;
    let mut request: JobRequest = serde_json::from_str(&input)
        .context("Job request must be a JSON object with at least 'job_description'")?;
    // Budgets are operator policy, not caller input.
    request.max_tool_calls = config.max_tool_calls;
    request.max_reflection_iterations = config.max_reflection_iterations;

    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));

    let mut registry = ToolRegistry::new();
    registry.register(
        ToolKind::SkillValidator,
        Box::new(SkillValidatorTool(Arc::new(LlmSkillValidator::new(
            llm.clone(),
        )))),
    );
    registry.register(
        ToolKind::MarketResearch,
        Box::new(MarketResearchTool(Arc::new(LlmMarketResearcher::new(
            llm.clone(),
        )))),
    );
    registry.register(
        ToolKind::GapAnalyzer,
        Box::new(GapAnalyzerTool(Arc::new(LlmGapAnalyzer::new(llm.clone())))),
    );
    registry.register(
        ToolKind::LearningPathGenerator,
        Box::new(LearningPathTool(Arc::new(LlmLearningPathGenerator::new(
            llm.clone(),
        )))),
    );
    // Retrieval and GitHub analysis backends live outside this binary;
    // their kinds dispatch as failed envelopes when reached.

    let bus = Arc::new(EventBus::new());
    bus.subscribe(|event| eprintln!("{}", event.to_json()));

    let engine = WorkflowEngine::new(llm, Dispatcher::new(registry), bus);

    info!(job_title = %request.job_title, "starting analysis");
    let state = engine.run(request).await?;

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
