//! Node handlers. Each mutates the run state and returns the payload for its
//! `node_end` event; lifecycle events are emitted centrally by the engine
//! loop, intra-node events (`thinking`, `reasoning`, `tool_*`,
//! `validation_result`) are emitted here.

use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AgentError;
use crate::events::{AgentEvent, EventType};
use crate::reflection::{get_reflection_feedback, validate_analysis};
use crate::tools::registry::DispatchOutcome;
use crate::tools::{ToolData, ToolKind};
use crate::workflow::decision::{decode_confidence, decode_think_decision};
use crate::workflow::engine::WorkflowEngine;
use crate::workflow::prompts;
use crate::workflow::state::RunState;

impl WorkflowEngine {
    pub(super) async fn extract_skills(
        &self,
        state: &mut RunState,
    ) -> Result<Option<Value>, AgentError> {
        let prompt = prompts::EXTRACT_SKILLS_PROMPT
            .replace("{job_title}", &state.job_title)
            .replace("{location}", &state.location)
            .replace("{job_description}", &state.job_description);

        let reply = self.llm.generate(&prompt).await?;
        let skills: Vec<String> = reply
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        state.add_reasoning(format!(
            "Extracted {} required skills from job description",
            skills.len()
        ));
        state.skills_required = skills;

        let preview: Vec<&String> = state.skills_required.iter().take(5).collect();
        Ok(Some(json!({
            "skills_count": state.skills_required.len(),
            "skills": preview,
        })))
    }

    pub(super) async fn think(&self, state: &mut RunState) -> Result<Option<Value>, AgentError> {
        self.bus.emit(
            AgentEvent::new(EventType::Thinking, state.session_id)
                .node("think")
                .data(json!({"message": "Analyzing which tools to use..."})),
        );

        let gaps: Vec<&str> = state
            .skills_required
            .iter()
            .filter(|s| !state.current_skills.contains(s))
            .map(String::as_str)
            .collect();
        let github_profile = match &state.github_username {
            Some(username) => format!("Available - {username}"),
            None => "Not provided".to_string(),
        };
        let github_tool_availability = if state.github_username.is_some() {
            "AVAILABLE"
        } else {
            "NOT AVAILABLE - no username provided"
        };

        let prompt = prompts::THINK_PROMPT
            .replace("{job_title}", &state.job_title)
            .replace("{location}", &state.location)
            .replace("{required_skills}", &state.skills_required.join(", "))
            .replace("{current_skills}", &state.current_skills.join(", "))
            .replace("{skill_gaps}", &gaps.join(", "))
            .replace("{github_profile}", &github_profile)
            .replace("{github_tool_availability}", github_tool_availability)
            .replace("{tools_used}", &state.executed_tools.len().to_string())
            .replace("{max_tool_calls}", &state.max_tool_calls.to_string());

        let reply = self.llm.generate(&prompt).await?;
        let decoded = decode_think_decision(&reply);
        if decoded.is_fallback() {
            debug!("think reply had no decodable decision; using default selection");
        }
        let decision = decoded.into_inner();

        state.add_reasoning(decision.reasoning.clone());
        self.bus.emit(
            AgentEvent::new(EventType::Reasoning, state.session_id)
                .node("think")
                .data(json!({
                    "reasoning": decision.reasoning,
                    "tools_selected": decision.selected_tools,
                })),
        );

        Ok(None)
    }

    pub(super) async fn execute_tools(
        &self,
        state: &mut RunState,
    ) -> Result<Option<Value>, AgentError> {
        // The think selection is advisory. Every pass runs the core tools in
        // a fixed order so merges into the state are deterministic.
        let mut pass = vec![
            ToolKind::GapAnalyzer,
            ToolKind::RagQuery,
            ToolKind::SkillValidator,
        ];
        if state.github_username.is_some() {
            pass.insert(0, ToolKind::GithubAnalyzer);
        }

        state.tool_call_count += 1;

        let mut dispatched = 0usize;
        for kind in pass {
            if state.tool_call_count >= state.max_tool_calls {
                break;
            }

            self.bus.emit(
                AgentEvent::new(EventType::ToolStart, state.session_id)
                    .tool(kind.as_str())
                    .status("executing"),
            );

            let outcome = {
                let args = state.tool_args();
                self.dispatcher
                    .call(kind, &args, state.tool_call_count, state.max_tool_calls)
                    .await
            };
            let result = match outcome {
                DispatchOutcome::Completed(result) => result,
                DispatchOutcome::BudgetExhausted => break,
            };

            dispatched += 1;
            state.executed_tools.push(kind.as_str().to_string());

            if result.success {
                match result.data {
                    ToolData::Gap(data) => {
                        state.skill_gaps = data.identified_gaps.clone();
                        state.gap_analysis_results = Some(data);
                    }
                    ToolData::Rag(data) => state.rag_results = Some(data),
                    ToolData::SkillValidation(data) => {
                        state.skill_validation_results = Some(data)
                    }
                    ToolData::Market(data) => state.market_research_results = Some(data),
                    ToolData::LearningPath(data) => state.learning_plan_results = Some(data),
                    ToolData::Github(data) => {
                        state.merge_github_skills(&data.proven_skills.programming_languages);
                        state.github_analysis_results = Some(data);
                    }
                    ToolData::Empty {} => {}
                }
                self.bus.emit(
                    AgentEvent::new(EventType::ToolEnd, state.session_id)
                        .tool(kind.as_str())
                        .status("completed")
                        .data(json!({"success": true})),
                );
            } else {
                self.bus.emit(
                    AgentEvent::new(EventType::ToolError, state.session_id)
                        .tool(kind.as_str())
                        .status("error")
                        .error(result.error.unwrap_or_default()),
                );
            }
        }

        state.add_reasoning(format!("Executed {dispatched} tools"));
        self.bus.emit(
            AgentEvent::new(EventType::StateUpdate, state.session_id)
                .node("execute_tools")
                .data(json!({
                    "tool_call_count": state.tool_call_count,
                    "executed_tools": &state.executed_tools,
                })),
        );

        Ok(Some(json!({"tools_executed": dispatched})))
    }

    pub(super) async fn reflect(&self, state: &mut RunState) -> Result<Option<Value>, AgentError> {
        let info_quality = state.information_quality();

        let prompt = prompts::REFLECT_PROMPT
            .replace(
                "{has_gap_analysis}",
                &state.gap_analysis_results.is_some().to_string(),
            )
            .replace("{has_rag_results}", &state.rag_results.is_some().to_string())
            .replace(
                "{has_skill_validation}",
                &state.skill_validation_results.is_some().to_string(),
            )
            .replace(
                "{has_github_analysis}",
                &state.github_analysis_results.is_some().to_string(),
            )
            .replace("{info_quality}", &format!("{info_quality:.2}"))
            .replace("{tools_used}", &state.executed_tools.join(", "));

        let reply = self.llm.generate(&prompt).await?;
        state.analysis_confidence_score = decode_confidence(&reply, info_quality);
        state.add_reasoning("Reflected on analysis quality");

        Ok(Some(json!({
            "info_quality": info_quality,
            "confidence": state.analysis_confidence_score,
        })))
    }

    pub(super) async fn generate_plan(
        &self,
        state: &mut RunState,
    ) -> Result<Option<Value>, AgentError> {
        let github_summary = match &state.github_analysis_results {
            Some(gh) => {
                let languages: Vec<&str> =
                    gh.languages.iter().take(5).map(|l| l.name.as_str()).collect();
                format!(
                    "GITHUB ANALYSIS:\n\
                     - Profile: {}\n\
                     - Total Repos: {}\n\
                     - Languages: {}\n\
                     - Proven Skills: {}\n\
                     - Project Types: {}\n",
                    gh.profile_url.as_deref().unwrap_or("N/A"),
                    gh.metrics.total_repos,
                    languages.join(", "),
                    gh.proven_skills.programming_languages.join(", "),
                    gh.project_types.join(", "),
                )
            }
            None => String::new(),
        };

        let insights = format!(
            "SKILL GAPS: {}\n\n\
             RAG INSIGHTS: {}\n\n\
             SKILL VALIDATION: {}\n\n\
             GAP ANALYSIS: {}\n\
             {}",
            state.skill_gaps.join(", "),
            state
                .rag_results
                .as_ref()
                .map_or("Not available", |r| r.rag_response.as_str()),
            state
                .skill_validation_results
                .as_ref()
                .map_or("Not available", |v| v.validation_analysis.as_str()),
            state
                .gap_analysis_results
                .as_ref()
                .map_or("Not available", |g| g.gap_analysis.as_str()),
            github_summary,
        );

        let prompt = prompts::GENERATE_PLAN_PROMPT
            .replace("{job_title}", &state.job_title)
            .replace("{location}", &state.location)
            .replace("{insights}", &insights);

        state.learning_plan = self.llm.generate(&prompt).await?;
        state.add_reasoning("Generated comprehensive learning plan");

        Ok(Some(json!({"plan_length": state.learning_plan.len()})))
    }

    pub(super) async fn validate(&self, state: &mut RunState) -> Result<Option<Value>, AgentError> {
        let report = validate_analysis(&state.validation_input());
        let feedback = get_reflection_feedback(&report);

        state.analysis_quality_score = report.overall_quality_score;
        state.analysis_confidence_score = report.overall_confidence;
        state.reflection_iterations += 1;

        state.add_reasoning(format!(
            "Validation complete: Quality={:.2}, Confidence={:.2}, Issues={}",
            report.overall_quality_score,
            report.overall_confidence,
            report.issues.len()
        ));
        if report.requires_revision {
            let focus: Vec<&str> = feedback
                .revision_focus
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            state.add_reasoning(format!("Revision needed - Focus areas: {}", focus.join(", ")));
        }

        self.bus.emit(
            AgentEvent::new(EventType::ValidationResult, state.session_id)
                .node("validate")
                .status("completed")
                .data(json!({
                    "quality_score": report.overall_quality_score,
                    "confidence": report.overall_confidence,
                    "issues_count": report.issues.len(),
                    "requires_revision": report.requires_revision,
                })),
        );

        state.validation_report = Some(report);
        state.reflection_feedback = Some(feedback);

        Ok(None)
    }
}
