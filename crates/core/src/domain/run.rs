use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Observation, RiskLevel};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Running,
    Completed,
    Aborted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "aborted" => Some(Self::Aborted),
            _ => None,
        }
    }

    /// Completed and aborted runs never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum RunItemStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
    Failed,
}

impl RunItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "skipped" => Some(Self::Skipped),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One execution pass through a suite's items.
///
/// Invariant: `0 <= current_item_index <= total_items` and `total_items > 0`.
/// Runs are never deleted, only driven to a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SuiteRun {
    pub id: Uuid,
    pub org_id: Uuid,
    pub suite_id: Uuid,
    pub status: RunStatus,
    pub current_item_index: i64,
    pub total_items: i64,
    pub abort_reason: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SuiteRun {
    pub fn new(org_id: Uuid, suite_id: Uuid, total_items: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            org_id,
            suite_id,
            status: RunStatus::Running,
            current_item_index: 0,
            total_items,
            abort_reason: None,
            started_at: now,
            updated_at: now,
        }
    }
}

/// Per-run record of one step's outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SuiteRunItem {
    pub id: Uuid,
    pub run_id: Uuid,
    pub suite_item_id: Uuid,
    pub order_index: i64,
    pub status: RunItemStatus,
    pub risk_level: Option<RiskLevel>,
    pub key_findings: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl SuiteRunItem {
    pub fn pending(run_id: Uuid, suite_item_id: Uuid, order_index: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            suite_item_id,
            order_index,
            status: RunItemStatus::default(),
            risk_level: None,
            key_findings: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Payload recording the outcome of the run's current step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RecordOutcomeRequest {
    /// Whether the step itself succeeded; a failed step is recorded but does
    /// not terminate the run.
    #[serde(default = "default_true")]
    pub succeeded: bool,
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub key_findings: Vec<String>,
    pub narrative: Option<String>,
    pub outcome_type: Option<String>,
    pub sentiment_shift: Option<crate::domain::SentimentShift>,
}

fn default_true() -> bool {
    true
}

impl RecordOutcomeRequest {
    /// View of the recorded outcome as the observation the next trigger
    /// condition will be evaluated against.
    pub fn as_observation(&self) -> Observation {
        Observation {
            risk_level: self.risk_level,
            narrative: self.narrative.clone(),
            outcome_type: self.outcome_type.clone(),
            sentiment_shift: self.sentiment_shift,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AbortRunRequest {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_running_at_index_zero() {
        let run = SuiteRun::new(Uuid::new_v4(), Uuid::new_v4(), 3);

        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.current_item_index, 0);
        assert_eq!(run.total_items, 3);
        assert!(run.abort_reason.is_none());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Aborted.is_terminal());
    }

    #[test]
    fn test_run_item_status_round_trip() {
        for status in [
            RunItemStatus::Pending,
            RunItemStatus::Completed,
            RunItemStatus::Skipped,
            RunItemStatus::Failed,
        ] {
            assert_eq!(RunItemStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RunItemStatus::parse("blocked"), None);
    }

    #[test]
    fn test_record_outcome_as_observation() {
        let payload = RecordOutcomeRequest {
            succeeded: true,
            risk_level: Some(RiskLevel::High),
            key_findings: vec!["coverage spike".into()],
            narrative: Some("Coverage turned hostile overnight".into()),
            outcome_type: Some("escalation".into()),
            sentiment_shift: None,
        };

        let observation = payload.as_observation();
        assert_eq!(observation.risk_level, Some(RiskLevel::High));
        assert_eq!(observation.outcome_type.as_deref(), Some("escalation"));
        assert!(observation.sentiment_shift.is_none());
    }
}
