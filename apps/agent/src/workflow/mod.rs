//! Workflow Engine.
//!
//! A finite state machine of named nodes:
//! `extract_skills → think → execute_tools → reflect →
//! {generate_plan | execute_tools} → generate_plan → validate`.
//! The engine advances one `RunState` node-by-node; the only branch is the
//! pure `router` after `reflect`. Any error inside a node aborts the run
//! after a `node_error` event; malformed model output never does.

use serde::Serialize;

mod decision;
mod engine;
mod nodes;
mod prompts;
mod state;

pub use decision::{
    decode_confidence, decode_think_decision, extract_json_block, Decoded, ThinkDecision,
};
pub use engine::{router, WorkflowEngine};
pub use state::{JobRequest, RunState};

/// A named step of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    ExtractSkills,
    Think,
    ExecuteTools,
    Reflect,
    GeneratePlan,
    Validate,
}

impl Node {
    pub const ALL: [Node; 6] = [
        Node::ExtractSkills,
        Node::Think,
        Node::ExecuteTools,
        Node::Reflect,
        Node::GeneratePlan,
        Node::Validate,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Node::ExtractSkills => "extract_skills",
            Node::Think => "think",
            Node::ExecuteTools => "execute_tools",
            Node::Reflect => "reflect",
            Node::GeneratePlan => "generate_plan",
            Node::Validate => "validate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Node::ExtractSkills => "Extract Skills",
            Node::Think => "Think",
            Node::ExecuteTools => "Execute Tools",
            Node::Reflect => "Reflect",
            Node::GeneratePlan => "Generate Plan",
            Node::Validate => "Validate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_are_stable() {
        let ids: Vec<&str> = Node::ALL.iter().map(Node::id).collect();
        assert_eq!(
            ids,
            vec![
                "extract_skills",
                "think",
                "execute_tools",
                "reflect",
                "generate_plan",
                "validate"
            ]
        );
    }
}
