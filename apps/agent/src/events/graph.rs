//! Derived graph-visualization view.
//!
//! Replays event history against the fixed workflow topology to produce a
//! per-node status. Status is a pure fold over `NODE_START` / `NODE_END` /
//! `NODE_ERROR` events in arrival order; no other event type affects it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::events::{AgentEvent, EventBus, EventType};
use crate::workflow::Node;

/// The forward edges of the workflow graph as drawn for dashboards. The
/// reflect → execute_tools loop edge is implied by the router and is not
/// rendered.
const WORKFLOW_EDGES: [(&str, &str); 5] = [
    ("extract_skills", "think"),
    ("think", "execute_tools"),
    ("execute_tools", "reflect"),
    ("reflect", "generate_plan"),
    ("generate_plan", "validate"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: &'static str,
    pub label: &'static str,
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub session_id: Uuid,
    pub total_events: usize,
}

/// One row of the flat execution trace.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub node: Option<String>,
    pub tool: Option<String>,
    pub status: Option<String>,
    pub data: Option<serde_json::Value>,
}

fn fold_node_statuses(events: &[AgentEvent]) -> Vec<GraphNode> {
    let mut nodes: Vec<GraphNode> = Node::ALL
        .iter()
        .map(|n| GraphNode {
            id: n.id(),
            label: n.label(),
            status: NodeStatus::Pending,
        })
        .collect();

    for event in events {
        let status = match event.event_type {
            EventType::NodeStart => NodeStatus::Processing,
            EventType::NodeEnd => NodeStatus::Completed,
            EventType::NodeError => NodeStatus::Error,
            _ => continue,
        };
        if let Some(name) = event.node_name.as_deref() {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == name) {
                node.status = status;
            }
        }
    }

    nodes
}

impl EventBus {
    /// Per-node status for one run, derived purely from its event history.
    pub fn graph_view(&self, session_id: Uuid) -> GraphView {
        let events = self.session_history(session_id);
        GraphView {
            nodes: fold_node_statuses(&events),
            edges: WORKFLOW_EDGES
                .iter()
                .map(|&(from, to)| GraphEdge { from, to })
                .collect(),
            session_id,
            total_events: events.len(),
        }
    }

    /// Flat ordered trace of one run for timeline visualizations.
    pub fn timeline(&self, session_id: Uuid) -> Vec<TimelineEntry> {
        self.session_history(session_id)
            .into_iter()
            .map(|e| TimelineEntry {
                timestamp: e.timestamp,
                event_type: e.event_type,
                node: e.node_name,
                tool: e.tool_name,
                status: e.status,
                data: e.data,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_event(session: Uuid, event_type: EventType, node: &str) -> AgentEvent {
        AgentEvent::new(event_type, session).node(node)
    }

    #[test]
    fn test_untouched_nodes_stay_pending() {
        let bus = EventBus::new();
        let view = bus.graph_view(Uuid::new_v4());
        assert_eq!(view.nodes.len(), 6);
        assert!(view.nodes.iter().all(|n| n.status == NodeStatus::Pending));
        assert_eq!(view.edges.len(), 5);
        assert_eq!(view.total_events, 0);
    }

    #[test]
    fn test_fold_tracks_start_end_error() {
        let bus = EventBus::new();
        let session = Uuid::new_v4();
        bus.emit(node_event(session, EventType::NodeStart, "extract_skills"));
        bus.emit(node_event(session, EventType::NodeEnd, "extract_skills"));
        bus.emit(node_event(session, EventType::NodeStart, "think"));
        bus.emit(node_event(session, EventType::NodeError, "think"));

        let view = bus.graph_view(session);
        let status = |id: &str| view.nodes.iter().find(|n| n.id == id).unwrap().status;
        assert_eq!(status("extract_skills"), NodeStatus::Completed);
        assert_eq!(status("think"), NodeStatus::Error);
        assert_eq!(status("execute_tools"), NodeStatus::Pending);
    }

    #[test]
    fn test_fold_ignores_other_sessions() {
        let bus = EventBus::new();
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        bus.emit(node_event(theirs, EventType::NodeStart, "extract_skills"));

        let view = bus.graph_view(mine);
        assert!(view.nodes.iter().all(|n| n.status == NodeStatus::Pending));
        assert_eq!(view.total_events, 0);
    }

    #[test]
    fn test_reentry_moves_completed_back_to_processing() {
        // execute_tools loops; its latest lifecycle event wins.
        let bus = EventBus::new();
        let session = Uuid::new_v4();
        bus.emit(node_event(session, EventType::NodeStart, "execute_tools"));
        bus.emit(node_event(session, EventType::NodeEnd, "execute_tools"));
        bus.emit(node_event(session, EventType::NodeStart, "execute_tools"));

        let view = bus.graph_view(session);
        let node = view.nodes.iter().find(|n| n.id == "execute_tools").unwrap();
        assert_eq!(node.status, NodeStatus::Processing);
    }

    #[test]
    fn test_timeline_preserves_arrival_order() {
        let bus = EventBus::new();
        let session = Uuid::new_v4();
        bus.emit(node_event(session, EventType::NodeStart, "extract_skills"));
        bus.emit(AgentEvent::new(EventType::ToolStart, session).tool("gap_analyzer"));

        let timeline = bus.timeline(session);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].node.as_deref(), Some("extract_skills"));
        assert_eq!(timeline[1].tool.as_deref(), Some("gap_analyzer"));
    }
}
