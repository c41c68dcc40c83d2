//! Event-streaming observability layer.
//!
//! Every state transition and tool call in a run is mirrored as a
//! structured, timestamped `AgentEvent` on the process-wide `EventBus`.
//! Events carry a session identifier so observers can filter a single run
//! when several execute concurrently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod bus;
mod graph;

pub use bus::{EventBus, SubscriberId, DEFAULT_HISTORY_CAPACITY};
pub use graph::{GraphEdge, GraphNode, GraphView, NodeStatus, TimelineEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AgentStart,
    AgentEnd,

    NodeStart,
    NodeEnd,
    NodeError,

    ToolStart,
    ToolEnd,
    ToolError,

    Thinking,
    Reasoning,

    StateUpdate,
    ValidationResult,

    AnalysisComplete,
}

/// A single event in a workflow run. Serialized one-per-line for external
/// dashboards; `None` fields appear as JSON nulls per the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct AgentEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub node_name: Option<String>,
    pub tool_name: Option<String>,
    pub status: Option<String>,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub progress: Option<f64>,
}

impl AgentEvent {
    pub fn new(event_type: EventType, session_id: Uuid) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            session_id,
            node_name: None,
            tool_name: None,
            status: None,
            data: None,
            error: None,
            progress: None,
        }
    }

    pub fn node(mut self, name: &str) -> Self {
        self.node_name = Some(name.to_string());
        self
    }

    pub fn tool(mut self, name: &str) -> Self {
        self.tool_name = Some(name.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Wire format for external dashboards: one JSON object per line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("event serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serializes_snake_case() {
        let json = serde_json::to_string(&EventType::NodeStart).unwrap();
        assert_eq!(json, "\"node_start\"");
        let json = serde_json::to_string(&EventType::ValidationResult).unwrap();
        assert_eq!(json, "\"validation_result\"");
    }

    #[test]
    fn test_event_wire_shape() {
        let session = Uuid::new_v4();
        let event = AgentEvent::new(EventType::ToolEnd, session)
            .tool("gap_analyzer")
            .status("completed")
            .data(serde_json::json!({"success": true}));

        let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(value["type"], "tool_end");
        assert_eq!(value["tool_name"], "gap_analyzer");
        assert_eq!(value["node_name"], serde_json::Value::Null);
        assert_eq!(value["data"]["success"], true);
        assert_eq!(value["session_id"], session.to_string());
        // ISO-8601 UTC timestamp
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
