use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::TriggerCondition;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SuiteStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl SuiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A named, ordered collection of simulation steps executed as one sequence.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Suite {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: SuiteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Suite {
    pub fn new(org_id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            org_id,
            name: name.into(),
            description: description.into(),
            status: SuiteStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status == SuiteStatus::Archived
    }
}

/// One step in a suite, gated by its trigger condition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SuiteItem {
    pub id: Uuid,
    pub suite_id: Uuid,
    /// Position within the suite, unique per suite, ascending.
    pub order_index: i64,
    pub label: String,
    /// Identifier of the simulation to execute when this step triggers.
    pub simulation_id: Uuid,
    pub trigger_condition: TriggerCondition,
    pub created_at: DateTime<Utc>,
}

impl SuiteItem {
    pub fn new(
        suite_id: Uuid,
        order_index: i64,
        label: impl Into<String>,
        simulation_id: Uuid,
        trigger_condition: TriggerCondition,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            suite_id,
            order_index,
            label: label.into(),
            simulation_id,
            trigger_condition,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CreateSuiteRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UpdateSuiteRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<SuiteStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AddSuiteItemRequest {
    pub label: String,
    pub simulation_id: Uuid,
    pub trigger_condition: TriggerCondition,
}

impl AddSuiteItemRequest {
    /// The sum type rules out structurally-missing fields; this covers the
    /// residual cases the type system cannot: empty strings and lists.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.label.trim().is_empty() {
            return Err(CoreError::Validation("Item label cannot be empty".into()));
        }
        match &self.trigger_condition {
            TriggerCondition::KeywordMatch { keywords, .. } => {
                if keywords.is_empty() {
                    return Err(CoreError::Validation(
                        "Keyword match condition requires at least one keyword".into(),
                    ));
                }
                if keywords.iter().any(|k| k.trim().is_empty()) {
                    return Err(CoreError::Validation(
                        "Keywords cannot be empty strings".into(),
                    ));
                }
            }
            TriggerCondition::OutcomeMatch { outcome_type } => {
                if outcome_type.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "Outcome match condition requires an outcome type".into(),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
