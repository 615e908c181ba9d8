use crate::error::DbError;
use crate::models::{SuiteItemRow, SuiteRow};
use chrono::Utc;
use scenario_core::{Suite, SuiteItem, SuiteStatus, UpdateSuiteRequest};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Org-scoped access to suites and their items. Every read and write takes
/// the tenant's `org_id` explicitly; there is no ambient current-org state.
#[derive(Clone)]
pub struct SuiteRepository {
    pool: SqlitePool,
}

impl SuiteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, suite: &Suite) -> Result<Suite, DbError> {
        let row = SuiteRow::from(suite);

        sqlx::query(
            r#"
            INSERT INTO suites (id, org_id, name, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.org_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.status)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(suite.clone())
    }

    pub async fn find_by_id(&self, org_id: Uuid, id: Uuid) -> Result<Option<Suite>, DbError> {
        let row: Option<SuiteRow> = sqlx::query_as(
            r#"
            SELECT id, org_id, name, description, status, created_at, updated_at
            FROM suites
            WHERE id = ? AND org_id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(org_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    pub async fn find_all(&self, org_id: Uuid) -> Result<Vec<Suite>, DbError> {
        let rows: Vec<SuiteRow> = sqlx::query_as(
            r#"
            SELECT id, org_id, name, description, status, created_at, updated_at
            FROM suites
            WHERE org_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(org_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        update: &UpdateSuiteRequest,
    ) -> Result<Option<Suite>, DbError> {
        let existing = self.find_by_id(org_id, id).await?;
        let Some(mut suite) = existing else {
            return Ok(None);
        };

        if let Some(name) = &update.name {
            suite.name = name.clone();
        }
        if let Some(description) = &update.description {
            suite.description = description.clone();
        }
        if let Some(status) = &update.status {
            suite.status = *status;
        }

        suite.updated_at = Utc::now();
        let row = SuiteRow::from(&suite);

        sqlx::query(
            r#"
            UPDATE suites
            SET name = ?, description = ?, status = ?, updated_at = ?
            WHERE id = ? AND org_id = ?
            "#,
        )
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.status)
        .bind(row.updated_at)
        .bind(&row.id)
        .bind(&row.org_id)
        .execute(&self.pool)
        .await?;

        Ok(Some(suite))
    }

    pub async fn archive(&self, org_id: Uuid, id: Uuid) -> Result<Option<Suite>, DbError> {
        let update = UpdateSuiteRequest {
            status: Some(SuiteStatus::Archived),
            ..Default::default()
        };
        self.update(org_id, id, &update).await
    }

    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM suites WHERE id = ? AND org_id = ?")
            .bind(id.to_string())
            .bind(org_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn add_item(&self, item: &SuiteItem) -> Result<SuiteItem, DbError> {
        let row = SuiteItemRow::from(item);

        sqlx::query(
            r#"
            INSERT INTO suite_items (id, suite_id, order_index, label, simulation_id, trigger_condition, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.suite_id)
        .bind(row.order_index)
        .bind(&row.label)
        .bind(&row.simulation_id)
        .bind(&row.trigger_condition)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(item.clone())
    }

    /// Items ordered by `order_index` ascending, as the state machine expects.
    pub async fn items_for_suite(&self, suite_id: Uuid) -> Result<Vec<SuiteItem>, DbError> {
        let rows: Vec<SuiteItemRow> = sqlx::query_as(
            r#"
            SELECT id, suite_id, order_index, label, simulation_id, trigger_condition, created_at
            FROM suite_items
            WHERE suite_id = ?
            ORDER BY order_index ASC
            "#,
        )
        .bind(suite_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    /// Next free position at the end of the suite.
    pub async fn next_order_index(&self, suite_id: Uuid) -> Result<i64, DbError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(order_index) FROM suite_items WHERE suite_id = ?")
                .bind(suite_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(max.map_or(0, |m| m + 1))
    }
}
