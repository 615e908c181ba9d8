//! Event types for the suite orchestration event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Suite events
    /// A new suite was created
    #[serde(rename = "suite.created")]
    SuiteCreated { suite_id: Uuid, org_id: Uuid },

    /// A suite was archived and can no longer start runs
    #[serde(rename = "suite.archived")]
    SuiteArchived { suite_id: Uuid, org_id: Uuid },

    // Run events
    /// A suite run was started
    #[serde(rename = "run.started")]
    RunStarted {
        run_id: Uuid,
        suite_id: Uuid,
        total_items: i64,
    },

    /// A run advanced to the next triggered item
    #[serde(rename = "run.advanced")]
    RunAdvanced { run_id: Uuid, to_index: i64 },

    /// An item's trigger condition did not fire and the item was skipped
    #[serde(rename = "run.item_skipped")]
    RunItemSkipped { run_id: Uuid, order_index: i64 },

    /// The current item's outcome was recorded
    #[serde(rename = "run.item_recorded")]
    RunItemRecorded {
        run_id: Uuid,
        order_index: i64,
        succeeded: bool,
    },

    /// A run exhausted its items and completed
    #[serde(rename = "run.completed")]
    RunCompleted { run_id: Uuid, suite_id: Uuid },

    /// A run was aborted by the caller
    #[serde(rename = "run.aborted")]
    RunAborted { run_id: Uuid, reason: String },

    // Briefing events
    /// A debrief or risk map was generated for a run
    #[serde(rename = "briefing.generated")]
    BriefingGenerated { run_id: Uuid, kind: String },

    // System events
    /// Generic error event
    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}

impl Event {
    /// Get the run ID associated with this event, if any
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            Event::RunStarted { run_id, .. } => Some(*run_id),
            Event::RunAdvanced { run_id, .. } => Some(*run_id),
            Event::RunItemSkipped { run_id, .. } => Some(*run_id),
            Event::RunItemRecorded { run_id, .. } => Some(*run_id),
            Event::RunCompleted { run_id, .. } => Some(*run_id),
            Event::RunAborted { run_id, .. } => Some(*run_id),
            Event::BriefingGenerated { run_id, .. } => Some(*run_id),
            Event::SuiteCreated { .. } | Event::SuiteArchived { .. } | Event::Error { .. } => None,
        }
    }
}
