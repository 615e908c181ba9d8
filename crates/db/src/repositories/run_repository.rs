use crate::error::DbError;
use crate::models::{SuiteRunItemRow, SuiteRunRow};
use scenario_core::{SuiteRun, SuiteRunItem};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Storage for suite runs and their per-item records.
///
/// `save_run` and `save_run_item` are idempotent upserts keyed by id, so the
/// orchestrator can safely retry persistence. No optimistic locking: two
/// racing writers are last-write-wins, matching the backing store's ordinary
/// row-update semantics.
#[derive(Clone)]
pub struct RunRepository {
    pool: SqlitePool,
}

impl RunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a run together with its pending items in one transaction.
    pub async fn create_run(
        &self,
        run: &SuiteRun,
        items: &[SuiteRunItem],
    ) -> Result<SuiteRun, DbError> {
        let mut tx = self.pool.begin().await?;

        let row = SuiteRunRow::from(run);
        sqlx::query(
            r#"
            INSERT INTO suite_runs (id, org_id, suite_id, status, current_item_index, total_items, abort_reason, started_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.org_id)
        .bind(&row.suite_id)
        .bind(&row.status)
        .bind(row.current_item_index)
        .bind(row.total_items)
        .bind(&row.abort_reason)
        .bind(row.started_at)
        .bind(row.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            let item_row = SuiteRunItemRow::from(item);
            sqlx::query(
                r#"
                INSERT INTO suite_run_items (id, run_id, suite_item_id, order_index, status, risk_level, key_findings, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item_row.id)
            .bind(&item_row.run_id)
            .bind(&item_row.suite_item_id)
            .bind(item_row.order_index)
            .bind(&item_row.status)
            .bind(&item_row.risk_level)
            .bind(&item_row.key_findings)
            .bind(item_row.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(run.clone())
    }

    pub async fn find_by_id(&self, org_id: Uuid, id: Uuid) -> Result<Option<SuiteRun>, DbError> {
        let row: Option<SuiteRunRow> = sqlx::query_as(
            r#"
            SELECT id, org_id, suite_id, status, current_item_index, total_items, abort_reason, started_at, updated_at
            FROM suite_runs
            WHERE id = ? AND org_id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(org_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain()))
    }

    pub async fn find_all_for_suite(
        &self,
        org_id: Uuid,
        suite_id: Uuid,
    ) -> Result<Vec<SuiteRun>, DbError> {
        let rows: Vec<SuiteRunRow> = sqlx::query_as(
            r#"
            SELECT id, org_id, suite_id, status, current_item_index, total_items, abort_reason, started_at, updated_at
            FROM suite_runs
            WHERE suite_id = ? AND org_id = ?
            ORDER BY started_at DESC
            "#,
        )
        .bind(suite_id.to_string())
        .bind(org_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    pub async fn save_run(&self, run: &SuiteRun) -> Result<SuiteRun, DbError> {
        let row = SuiteRunRow::from(run);

        sqlx::query(
            r#"
            INSERT INTO suite_runs (id, org_id, suite_id, status, current_item_index, total_items, abort_reason, started_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                current_item_index = excluded.current_item_index,
                abort_reason = excluded.abort_reason,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.org_id)
        .bind(&row.suite_id)
        .bind(&row.status)
        .bind(row.current_item_index)
        .bind(row.total_items)
        .bind(&row.abort_reason)
        .bind(row.started_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(run.clone())
    }

    pub async fn save_run_item(&self, item: &SuiteRunItem) -> Result<SuiteRunItem, DbError> {
        let row = SuiteRunItemRow::from(item);

        sqlx::query(
            r#"
            INSERT INTO suite_run_items (id, run_id, suite_item_id, order_index, status, risk_level, key_findings, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                risk_level = excluded.risk_level,
                key_findings = excluded.key_findings,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.run_id)
        .bind(&row.suite_item_id)
        .bind(row.order_index)
        .bind(&row.status)
        .bind(&row.risk_level)
        .bind(&row.key_findings)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item.clone())
    }

    /// Run items ordered by `order_index` ascending.
    pub async fn items_for_run(&self, run_id: Uuid) -> Result<Vec<SuiteRunItem>, DbError> {
        let rows: Vec<SuiteRunItemRow> = sqlx::query_as(
            r#"
            SELECT id, run_id, suite_item_id, order_index, status, risk_level, key_findings, updated_at
            FROM suite_run_items
            WHERE run_id = ?
            ORDER BY order_index ASC
            "#,
        )
        .bind(run_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SuiteRepository;
    use crate::{create_pool, run_migrations};
    use scenario_core::{RunItemStatus, RunStatus, Suite, SuiteItem, TriggerCondition};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn seed_suite(pool: &SqlitePool, org_id: Uuid, item_count: i64) -> (Suite, Vec<SuiteItem>) {
        let suites = SuiteRepository::new(pool.clone());
        let suite = Suite::new(org_id, "Drill", "");
        suites.create(&suite).await.unwrap();

        let mut items = Vec::new();
        for index in 0..item_count {
            let item = SuiteItem::new(
                suite.id,
                index,
                format!("step {index}"),
                Uuid::new_v4(),
                TriggerCondition::Always,
            );
            suites.add_item(&item).await.unwrap();
            items.push(item);
        }

        (suite, items)
    }

    #[tokio::test]
    async fn test_create_run_inserts_pending_items() {
        let pool = setup_test_db().await;
        let repo = RunRepository::new(pool.clone());
        let org_id = Uuid::new_v4();
        let (suite, items) = seed_suite(&pool, org_id, 3).await;

        let run = SuiteRun::new(org_id, suite.id, items.len() as i64);
        let run_items: Vec<SuiteRunItem> = items
            .iter()
            .map(|i| SuiteRunItem::pending(run.id, i.id, i.order_index))
            .collect();

        repo.create_run(&run, &run_items).await.unwrap();

        let stored = repo.items_for_run(run.id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|i| i.status == RunItemStatus::Pending));

        let found = repo.find_by_id(org_id, run.id).await.unwrap().unwrap();
        assert_eq!(found.status, RunStatus::Running);
        assert_eq!(found.total_items, 3);
    }

    #[tokio::test]
    async fn test_save_run_is_idempotent_upsert() {
        let pool = setup_test_db().await;
        let repo = RunRepository::new(pool.clone());
        let org_id = Uuid::new_v4();
        let (suite, _) = seed_suite(&pool, org_id, 1).await;

        let mut run = SuiteRun::new(org_id, suite.id, 1);
        repo.save_run(&run).await.unwrap();

        run.status = RunStatus::Completed;
        run.current_item_index = 1;
        repo.save_run(&run).await.unwrap();
        repo.save_run(&run).await.unwrap();

        let found = repo.find_by_id(org_id, run.id).await.unwrap().unwrap();
        assert_eq!(found.status, RunStatus::Completed);
        assert_eq!(found.current_item_index, 1);

        let all = repo.find_all_for_suite(org_id, suite.id).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_run_lookup_is_org_scoped() {
        let pool = setup_test_db().await;
        let repo = RunRepository::new(pool.clone());
        let org_id = Uuid::new_v4();
        let (suite, _) = seed_suite(&pool, org_id, 1).await;

        let run = SuiteRun::new(org_id, suite.id, 1);
        repo.create_run(&run, &[]).await.unwrap();

        assert!(repo
            .find_by_id(Uuid::new_v4(), run.id)
            .await
            .unwrap()
            .is_none());
    }
}
