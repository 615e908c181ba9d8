use std::env;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_DATABASE_URL: &str = "sqlite:scenario.db";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_BRIEFING_MODEL: &str = "openai/gpt-4o-mini";

/// Server configuration read from the environment.
///
/// Briefing generation is optional: without `SCENARIO_OPENROUTER_API_KEY`
/// the debrief endpoint reports that briefings are not configured, and
/// everything else works normally.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub briefing_model: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("SCENARIO_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            database_url: env::var("SCENARIO_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            openrouter_api_key: env::var("SCENARIO_OPENROUTER_API_KEY").ok(),
            openrouter_base_url: env::var("SCENARIO_OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_BASE_URL.into()),
            briefing_model: env::var("SCENARIO_BRIEFING_MODEL")
                .unwrap_or_else(|_| DEFAULT_BRIEFING_MODEL.into()),
        }
    }
}
