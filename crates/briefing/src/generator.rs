use scenario_core::{Suite, SuiteItem, SuiteRun, SuiteRunItem};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::OpenRouterClient;
use crate::error::{BriefingError, BriefingResult};
use crate::prompts;
use crate::types::ChatMessage;

const DEBRIEF_TEMPERATURE: f32 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefingKind {
    Debrief,
    RiskMap,
}

impl BriefingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debrief => "debrief",
            Self::RiskMap => "risk_map",
        }
    }
}

/// Generated briefing content for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Briefing {
    pub kind: BriefingKind,
    pub content: String,
}

/// Generates run debriefs and risk maps through the chat completions API.
#[derive(Clone)]
pub struct BriefingGenerator {
    client: OpenRouterClient,
    model: String,
}

impl BriefingGenerator {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub async fn generate_debrief(
        &self,
        suite: &Suite,
        run: &SuiteRun,
        items: &[SuiteItem],
        run_items: &[SuiteRunItem],
    ) -> BriefingResult<Briefing> {
        let messages = vec![
            ChatMessage::system(prompts::DEBRIEF_SYSTEM_PROMPT),
            ChatMessage::user(prompts::debrief_prompt(suite, run, items, run_items)),
        ];

        let content = self
            .client
            .chat_completion(
                messages,
                &self.model,
                Some(DEBRIEF_TEMPERATURE),
                Some(MAX_OUTPUT_TOKENS),
            )
            .await?;

        if content.trim().is_empty() {
            return Err(BriefingError::GenerationFailed(
                "Model returned an empty debrief".to_string(),
            ));
        }

        info!(run_id = %run.id, "generated run debrief");
        Ok(Briefing {
            kind: BriefingKind::Debrief,
            content,
        })
    }

    pub async fn generate_risk_map(
        &self,
        suite: &Suite,
        run: &SuiteRun,
        items: &[SuiteItem],
        run_items: &[SuiteRunItem],
    ) -> BriefingResult<Briefing> {
        let messages = vec![
            ChatMessage::system(prompts::RISK_MAP_SYSTEM_PROMPT),
            ChatMessage::user(prompts::risk_map_prompt(suite, items, run_items)),
        ];

        let content = self
            .client
            .chat_completion(
                messages,
                &self.model,
                Some(DEBRIEF_TEMPERATURE),
                Some(MAX_OUTPUT_TOKENS),
            )
            .await?;

        if content.trim().is_empty() {
            return Err(BriefingError::GenerationFailed(
                "Model returned an empty risk map".to_string(),
            ));
        }

        info!(run_id = %run.id, "generated risk map");
        Ok(Briefing {
            kind: BriefingKind::RiskMap,
            content,
        })
    }
}
