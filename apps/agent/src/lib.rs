//! Agent orchestration and self-validation engine.
//!
//! Given a job description and a candidate profile, the workflow engine
//! decides which analysis capabilities to invoke, aggregates their results,
//! scores the resulting artifact for completeness and reliability, and
//! decides whether it must be revised. Every transition and tool call is
//! mirrored on a process-wide event bus for external observers.
//!
//! Concrete backends (text generation, retrieval, profile analysis) are
//! injected through the trait seams in [`capabilities`]; the engine itself
//! holds no network code.

pub mod capabilities;
pub mod config;
pub mod errors;
pub mod events;
pub mod llm_client;
pub mod reflection;
pub mod tools;
pub mod workflow;

pub use config::Config;
pub use errors::AgentError;
pub use events::{AgentEvent, EventBus, EventType};
pub use llm_client::LlmClient;
pub use workflow::{router, JobRequest, RunState, WorkflowEngine};
