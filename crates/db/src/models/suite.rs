use chrono::{DateTime, TimeZone, Utc};
use scenario_core::{Suite, SuiteItem, SuiteStatus, TriggerCondition};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SuiteRow {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SuiteRow {
    pub fn into_domain(self) -> Suite {
        Suite {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            org_id: Uuid::parse_str(&self.org_id).unwrap_or_default(),
            name: self.name,
            description: self.description,
            status: SuiteStatus::parse(&self.status).unwrap_or_default(),
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

impl From<&Suite> for SuiteRow {
    fn from(suite: &Suite) -> Self {
        Self {
            id: suite.id.to_string(),
            org_id: suite.org_id.to_string(),
            name: suite.name.clone(),
            description: suite.description.clone(),
            status: suite.status.as_str().to_string(),
            created_at: suite.created_at.timestamp(),
            updated_at: suite.updated_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SuiteItemRow {
    pub id: String,
    pub suite_id: String,
    pub order_index: i64,
    pub label: String,
    pub simulation_id: String,
    /// JSON-encoded [`TriggerCondition`].
    pub trigger_condition: String,
    pub created_at: i64,
}

impl SuiteItemRow {
    pub fn into_domain(self) -> SuiteItem {
        SuiteItem {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            suite_id: Uuid::parse_str(&self.suite_id).unwrap_or_default(),
            order_index: self.order_index,
            label: self.label,
            simulation_id: Uuid::parse_str(&self.simulation_id).unwrap_or_default(),
            // An unreadable stored condition degrades to `always` rather than
            // poisoning the whole suite load.
            trigger_condition: serde_json::from_str(&self.trigger_condition)
                .unwrap_or(TriggerCondition::Always),
            created_at: timestamp_to_datetime(self.created_at),
        }
    }
}

impl From<&SuiteItem> for SuiteItemRow {
    fn from(item: &SuiteItem) -> Self {
        Self {
            id: item.id.to_string(),
            suite_id: item.suite_id.to_string(),
            order_index: item.order_index,
            label: item.label.clone(),
            simulation_id: item.simulation_id.to_string(),
            trigger_condition: serde_json::to_string(&item.trigger_condition)
                .unwrap_or_else(|_| r#"{"type":"always"}"#.to_string()),
            created_at: item.created_at.timestamp(),
        }
    }
}

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}
