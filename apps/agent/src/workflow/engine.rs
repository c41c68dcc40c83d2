use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::capabilities::TextGenerate;
use crate::errors::AgentError;
use crate::events::{AgentEvent, EventBus, EventType};
use crate::tools::registry::Dispatcher;
use crate::workflow::state::{JobRequest, RunState};
use crate::workflow::Node;

/// Chooses the next node after `reflect`. Pure and deterministic given the
/// state: a spent budget or a populated gap + retrieval pair ends the loop.
/// Market research and the remaining tools only run inside a pass, so a run
/// can finish without them; that early termination is a deliberate property
/// of this rule.
pub fn router(state: &RunState) -> Node {
    if state.tool_call_count >= state.max_tool_calls {
        return Node::GeneratePlan;
    }
    if state.gap_analysis_results.is_some() && state.rag_results.is_some() {
        return Node::GeneratePlan;
    }
    Node::ExecuteTools
}

/// Drives one `RunState` through the state machine. Dependencies are
/// injected at construction; the engine holds no per-run state and may be
/// shared across concurrent runs.
pub struct WorkflowEngine {
    pub(super) llm: Arc<dyn TextGenerate>,
    pub(super) dispatcher: Dispatcher,
    pub(super) bus: Arc<EventBus>,
}

impl WorkflowEngine {
    pub fn new(llm: Arc<dyn TextGenerate>, dispatcher: Dispatcher, bus: Arc<EventBus>) -> Self {
        Self {
            llm,
            dispatcher,
            bus,
        }
    }

    async fn run_node(&self, node: Node, state: &mut RunState) -> Result<(), AgentError> {
        self.bus.emit(
            AgentEvent::new(EventType::NodeStart, state.session_id)
                .node(node.id())
                .status("processing"),
        );
        info!(node = node.id(), "entering node");

        let outcome = match node {
            Node::ExtractSkills => self.extract_skills(state).await,
            Node::Think => self.think(state).await,
            Node::ExecuteTools => self.execute_tools(state).await,
            Node::Reflect => self.reflect(state).await,
            Node::GeneratePlan => self.generate_plan(state).await,
            Node::Validate => self.validate(state).await,
        };

        match outcome {
            Ok(data) => {
                let mut event = AgentEvent::new(EventType::NodeEnd, state.session_id)
                    .node(node.id())
                    .status("completed");
                if let Some(data) = data {
                    event = event.data(data);
                }
                self.bus.emit(event);
                Ok(())
            }
            Err(source) => {
                self.bus.emit(
                    AgentEvent::new(EventType::NodeError, state.session_id)
                        .node(node.id())
                        .error(source.to_string()),
                );
                Err(AgentError::Node {
                    node: node.id(),
                    source: Box::new(source),
                })
            }
        }
    }

    /// Executes one full run. Nodes run strictly sequentially; an error in
    /// any node aborts the run after its `node_error` event.
    pub async fn run(&self, request: JobRequest) -> Result<RunState, AgentError> {
        let mut state = RunState::new(request);
        info!(session = %state.session_id, job_title = %state.job_title, "starting analysis run");
        self.bus.emit(
            AgentEvent::new(EventType::AgentStart, state.session_id).data(json!({
                "job_title": &state.job_title,
                "location": &state.location,
            })),
        );

        self.run_node(Node::ExtractSkills, &mut state).await?;
        self.run_node(Node::Think, &mut state).await?;
        loop {
            self.run_node(Node::ExecuteTools, &mut state).await?;
            self.run_node(Node::Reflect, &mut state).await?;
            if router(&state) == Node::GeneratePlan {
                break;
            }
        }
        self.run_node(Node::GeneratePlan, &mut state).await?;
        self.run_node(Node::Validate, &mut state).await?;

        self.bus.emit(
            AgentEvent::new(EventType::AnalysisComplete, state.session_id).data(json!({
                "quality_score": state.analysis_quality_score,
                "confidence": state.analysis_confidence_score,
                "requires_revision": state
                    .validation_report
                    .as_ref()
                    .map(|r| r.requires_revision),
            })),
        );
        self.bus
            .emit(AgentEvent::new(EventType::AgentEnd, state.session_id).status("completed"));
        info!(
            session = %state.session_id,
            quality = state.analysis_quality_score,
            confidence = state.analysis_confidence_score,
            "analysis run finished"
        );

        Ok(state)
    }
}
