use thiserror::Error;

use crate::capabilities::CapabilityError;

/// Fatal error taxonomy for a workflow run.
///
/// Only node-level failures surface here. Tool failures are values
/// (`ToolResult { success: false }`) and malformed structured sub-output
/// degrades to a documented default, so neither ever becomes an `AgentError`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("capability call failed: {0}")]
    Capability(#[from] CapabilityError),

    #[error("node '{node}' failed: {source}")]
    Node {
        node: &'static str,
        #[source]
        source: Box<AgentError>,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
