use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub rust_log: String,
    pub max_tool_calls: u32,
    pub max_reflection_iterations: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_tool_calls: parse_env_or("MAX_TOOL_CALLS", 5)?,
            max_reflection_iterations: parse_env_or("MAX_REFLECTION_ITERATIONS", 3)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("'{key}' must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
