use scenario_core::{RiskLevel, RunItemStatus, RunStatus, SuiteRun, SuiteRunItem};
use uuid::Uuid;

use crate::models::suite::timestamp_to_datetime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SuiteRunRow {
    pub id: String,
    pub org_id: String,
    pub suite_id: String,
    pub status: String,
    pub current_item_index: i64,
    pub total_items: i64,
    pub abort_reason: Option<String>,
    pub started_at: i64,
    pub updated_at: i64,
}

impl SuiteRunRow {
    pub fn into_domain(self) -> SuiteRun {
        SuiteRun {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            org_id: Uuid::parse_str(&self.org_id).unwrap_or_default(),
            suite_id: Uuid::parse_str(&self.suite_id).unwrap_or_default(),
            status: RunStatus::parse(&self.status).unwrap_or_default(),
            current_item_index: self.current_item_index,
            total_items: self.total_items,
            abort_reason: self.abort_reason,
            started_at: timestamp_to_datetime(self.started_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

impl From<&SuiteRun> for SuiteRunRow {
    fn from(run: &SuiteRun) -> Self {
        Self {
            id: run.id.to_string(),
            org_id: run.org_id.to_string(),
            suite_id: run.suite_id.to_string(),
            status: run.status.as_str().to_string(),
            current_item_index: run.current_item_index,
            total_items: run.total_items,
            abort_reason: run.abort_reason.clone(),
            started_at: run.started_at.timestamp(),
            updated_at: run.updated_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SuiteRunItemRow {
    pub id: String,
    pub run_id: String,
    pub suite_item_id: String,
    pub order_index: i64,
    pub status: String,
    pub risk_level: Option<String>,
    /// JSON-encoded string array.
    pub key_findings: String,
    pub updated_at: i64,
}

impl SuiteRunItemRow {
    pub fn into_domain(self) -> SuiteRunItem {
        SuiteRunItem {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            run_id: Uuid::parse_str(&self.run_id).unwrap_or_default(),
            suite_item_id: Uuid::parse_str(&self.suite_item_id).unwrap_or_default(),
            order_index: self.order_index,
            status: RunItemStatus::parse(&self.status).unwrap_or_default(),
            risk_level: self.risk_level.as_deref().and_then(RiskLevel::parse),
            key_findings: serde_json::from_str(&self.key_findings).unwrap_or_default(),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

impl From<&SuiteRunItem> for SuiteRunItemRow {
    fn from(item: &SuiteRunItem) -> Self {
        Self {
            id: item.id.to_string(),
            run_id: item.run_id.to_string(),
            suite_item_id: item.suite_item_id.to_string(),
            order_index: item.order_index,
            status: item.status.as_str().to_string(),
            risk_level: item.risk_level.map(|r| r.as_str().to_string()),
            key_findings: serde_json::to_string(&item.key_findings)
                .unwrap_or_else(|_| "[]".to_string()),
            updated_at: item.updated_at.timestamp(),
        }
    }
}
