//! Best-effort decoding of JSON fragments embedded in free-form model text.
//!
//! Model replies are commentary with (hopefully) one JSON object inside.
//! Decoding is a visible, tagged branch: `Parsed` when the embedded object
//! decoded cleanly, `Fallback` when a fixed default decision was substituted.
//! The fallback path never raises.

use serde::Deserialize;

use crate::tools::ToolKind;

/// Outcome of an attempted structured decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    Parsed(T),
    /// A documented default substituted for undecodable output.
    Fallback(T),
}

impl<T> Decoded<T> {
    pub fn into_inner(self) -> T {
        match self {
            Decoded::Parsed(value) | Decoded::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback(_))
    }
}

/// Finds the first balanced `{...}` block in `text`, skipping braces inside
/// string literals. Returns `None` when no complete block exists.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn default_true() -> bool {
    true
}

/// The think node's decision about which tools to prioritize next.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThinkDecision {
    pub reasoning: String,
    #[serde(default)]
    pub selected_tools: Vec<String>,
    #[serde(default = "default_true")]
    pub should_continue: bool,
    #[serde(default)]
    pub next_action: String,
}

fn fallback_decision(reasoning: &str, tools: &[ToolKind]) -> ThinkDecision {
    ThinkDecision {
        reasoning: reasoning.to_string(),
        selected_tools: tools.iter().map(|t| t.as_str().to_string()).collect(),
        should_continue: true,
        next_action: "Execute selected tools".to_string(),
    }
}

/// Decodes the think reply. Two fallbacks: no JSON block at all selects the
/// full comprehensive pass; a block that fails to decode selects the minimal
/// gap + retrieval pair.
pub fn decode_think_decision(reply: &str) -> Decoded<ThinkDecision> {
    let Some(block) = extract_json_block(reply) else {
        return Decoded::Fallback(fallback_decision(
            "Insufficient information, running all tools",
            &[
                ToolKind::GapAnalyzer,
                ToolKind::RagQuery,
                ToolKind::SkillValidator,
                ToolKind::MarketResearch,
            ],
        ));
    };

    match serde_json::from_str::<ThinkDecision>(block) {
        Ok(decision) => Decoded::Parsed(decision),
        Err(_) => Decoded::Fallback(fallback_decision(
            "Error parsing decision, using default tools",
            &[ToolKind::GapAnalyzer, ToolKind::RagQuery],
        )),
    }
}

#[derive(Debug, Deserialize)]
struct ReflectionEstimate {
    confidence_in_plan: Option<f64>,
}

/// Parses `confidence_in_plan` from the reflect reply. A decoded object
/// missing the field yields 0.7; an undecodable reply yields the computed
/// information-quality ratio.
pub fn decode_confidence(reply: &str, info_quality: f64) -> f64 {
    match extract_json_block(reply)
        .and_then(|block| serde_json::from_str::<ReflectionEstimate>(block).ok())
    {
        Some(estimate) => estimate.confidence_in_plan.unwrap_or(0.7),
        None => info_quality,
    }
}
