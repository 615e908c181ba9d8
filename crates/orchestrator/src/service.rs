//! Async service driving suite runs: loads state through the repositories,
//! applies the pure state machine, persists the result, and publishes
//! lifecycle events. Persistence happens after state is finalized, and all
//! writes are idempotent upserts so a retried request converges.

use db::{RunRepository, SuiteRepository};
use events::{Event, EventBus, EventEnvelope};
use scenario_core::{
    Observation, RecordOutcomeRequest, RunItemStatus, RunStatus, SuiteRun, SuiteRunItem,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{OrchestratorError, Result};
use crate::state_machine::{AdvanceOutcome, RunStateMachine};

#[derive(Clone)]
pub struct SuiteRunService {
    suites: SuiteRepository,
    runs: RunRepository,
    event_bus: EventBus,
}

impl SuiteRunService {
    pub fn new(suites: SuiteRepository, runs: RunRepository, event_bus: EventBus) -> Self {
        Self {
            suites,
            runs,
            event_bus,
        }
    }

    /// Start a new run for the suite. Fails if the suite does not exist in
    /// this org, has no items, or is archived.
    pub async fn start_run(&self, org_id: Uuid, suite_id: Uuid) -> Result<SuiteRun> {
        let suite = self
            .suites
            .find_by_id(org_id, suite_id)
            .await?
            .ok_or(OrchestratorError::SuiteNotFound(suite_id))?;
        let items = self.suites.items_for_suite(suite_id).await?;

        let (run, run_items) = RunStateMachine::start_run(&suite, &items)?;
        self.runs.create_run(&run, &run_items).await?;

        info!(run_id = %run.id, suite_id = %suite_id, total_items = run.total_items, "suite run started");
        self.event_bus.publish(EventEnvelope::new(Event::RunStarted {
            run_id: run.id,
            suite_id,
            total_items: run.total_items,
        }));

        Ok(run)
    }

    /// Record the outcome of the run's current item, marking it completed or
    /// failed. Callers do this before advancing; the recorded fields double
    /// as the observation the next trigger condition is evaluated against.
    pub async fn record_outcome(
        &self,
        org_id: Uuid,
        run_id: Uuid,
        payload: &RecordOutcomeRequest,
    ) -> Result<SuiteRunItem> {
        let run = self.load_run(org_id, run_id).await?;
        if run.status != RunStatus::Running {
            return Err(OrchestratorError::InvalidRunState {
                run_id,
                status: run.status,
            });
        }

        let mut run_items = self.runs.items_for_run(run_id).await?;
        let position = usize::try_from(run.current_item_index).unwrap_or_default();
        let Some(item) = run_items.get_mut(position) else {
            return Err(OrchestratorError::Validation(format!(
                "Run {run_id} has no item at index {}",
                run.current_item_index
            )));
        };

        item.status = if payload.succeeded {
            RunItemStatus::Completed
        } else {
            RunItemStatus::Failed
        };
        item.risk_level = payload.risk_level;
        item.key_findings = payload.key_findings.clone();
        item.updated_at = chrono::Utc::now();

        let saved = self.runs.save_run_item(item).await?;

        self.event_bus
            .publish(EventEnvelope::new(Event::RunItemRecorded {
                run_id,
                order_index: saved.order_index,
                succeeded: payload.succeeded,
            }));

        Ok(saved)
    }

    /// Advance the run against the latest observation. Items whose
    /// conditions do not fire are marked skipped within this same call; the
    /// run completes when no remaining item triggers.
    pub async fn advance_run(
        &self,
        org_id: Uuid,
        run_id: Uuid,
        observation: &Observation,
    ) -> Result<AdvanceOutcome> {
        let mut run = self.load_run(org_id, run_id).await?;
        let items = self.suites.items_for_suite(run.suite_id).await?;
        let mut run_items = self.runs.items_for_run(run_id).await?;

        let outcome = RunStateMachine::advance(&mut run, &items, &mut run_items, observation)?;

        // State is final; persist run items first, then the run itself.
        for run_item in run_items
            .iter()
            .filter(|ri| ri.status == RunItemStatus::Skipped)
        {
            self.runs.save_run_item(run_item).await?;
        }
        self.runs.save_run(&run).await?;

        match &outcome {
            AdvanceOutcome::Advanced { to_index, skipped } => {
                debug!(run_id = %run_id, to_index, ?skipped, "run advanced");
                for order_index in skipped {
                    self.event_bus
                        .publish(EventEnvelope::new(Event::RunItemSkipped {
                            run_id,
                            order_index: *order_index,
                        }));
                }
                self.event_bus.publish(EventEnvelope::new(Event::RunAdvanced {
                    run_id,
                    to_index: *to_index,
                }));
            }
            AdvanceOutcome::Completed { skipped } => {
                info!(run_id = %run_id, ?skipped, "run completed");
                for order_index in skipped {
                    self.event_bus
                        .publish(EventEnvelope::new(Event::RunItemSkipped {
                            run_id,
                            order_index: *order_index,
                        }));
                }
                self.event_bus
                    .publish(EventEnvelope::new(Event::RunCompleted {
                        run_id,
                        suite_id: run.suite_id,
                    }));
            }
        }

        Ok(outcome)
    }

    /// Abort a running run with a caller-supplied reason.
    pub async fn abort_run(&self, org_id: Uuid, run_id: Uuid, reason: &str) -> Result<SuiteRun> {
        let mut run = self.load_run(org_id, run_id).await?;
        RunStateMachine::abort(&mut run, reason)?;
        self.runs.save_run(&run).await?;

        info!(run_id = %run_id, reason, "run aborted");
        self.event_bus.publish(EventEnvelope::new(Event::RunAborted {
            run_id,
            reason: reason.to_string(),
        }));

        Ok(run)
    }

    async fn load_run(&self, org_id: Uuid, run_id: Uuid) -> Result<SuiteRun> {
        self.runs
            .find_by_id(org_id, run_id)
            .await?
            .ok_or(OrchestratorError::RunNotFound(run_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{Comparison, RiskLevel, Suite, SuiteItem, TriggerCondition};
    use sqlx::SqlitePool;

    async fn setup() -> (SuiteRunService, SuiteRepository, Uuid) {
        let pool: SqlitePool = db::create_pool("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        let suites = SuiteRepository::new(pool.clone());
        let runs = RunRepository::new(pool);
        let service = SuiteRunService::new(suites.clone(), runs, EventBus::new());
        (service, suites, Uuid::new_v4())
    }

    async fn seed_suite(
        suites: &SuiteRepository,
        org_id: Uuid,
        conditions: Vec<TriggerCondition>,
    ) -> Suite {
        let suite = Suite::new(org_id, "Drill", "");
        suites.create(&suite).await.unwrap();
        for (index, condition) in conditions.into_iter().enumerate() {
            let item = SuiteItem::new(
                suite.id,
                index as i64,
                format!("step {index}"),
                Uuid::new_v4(),
                condition,
            );
            suites.add_item(&item).await.unwrap();
        }
        suite
    }

    #[tokio::test]
    async fn test_start_run_requires_items() {
        let (service, suites, org_id) = setup().await;
        let suite = seed_suite(&suites, org_id, vec![]).await;

        let result = service.start_run(org_id, suite.id).await;
        assert!(matches!(result, Err(OrchestratorError::EmptySuite(_))));
    }

    #[tokio::test]
    async fn test_start_run_unknown_suite() {
        let (service, _, org_id) = setup().await;

        let result = service.start_run(org_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(OrchestratorError::SuiteNotFound(_))));
    }

    #[tokio::test]
    async fn test_full_run_lifecycle() {
        let (service, suites, org_id) = setup().await;
        let suite = seed_suite(
            &suites,
            org_id,
            vec![
                TriggerCondition::Always,
                TriggerCondition::RiskThreshold {
                    min_risk_level: RiskLevel::High,
                    comparison: Comparison::Gte,
                },
            ],
        )
        .await;

        let run = service.start_run(org_id, suite.id).await.unwrap();
        assert_eq!(run.current_item_index, 0);

        let outcome_payload = RecordOutcomeRequest {
            succeeded: true,
            risk_level: Some(RiskLevel::Critical),
            key_findings: vec!["press pile-on".into()],
            narrative: None,
            outcome_type: None,
            sentiment_shift: None,
        };
        let recorded = service
            .record_outcome(org_id, run.id, &outcome_payload)
            .await
            .unwrap();
        assert_eq!(recorded.status, RunItemStatus::Completed);

        let outcome = service
            .advance_run(org_id, run.id, &outcome_payload.as_observation())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                to_index: 1,
                skipped: vec![]
            }
        );

        // Past the last item: the run completes.
        let outcome = service
            .advance_run(org_id, run.id, &Observation::default())
            .await
            .unwrap();
        assert_eq!(outcome, AdvanceOutcome::Completed { skipped: vec![] });

        // Advancing a completed run is a state error.
        let result = service
            .advance_run(org_id, run.id, &Observation::default())
            .await;
        assert!(matches!(
            result,
            Err(OrchestratorError::InvalidRunState { .. })
        ));
    }

    #[tokio::test]
    async fn test_skipped_items_are_persisted() {
        let (service, suites, org_id) = setup().await;
        let suite = seed_suite(
            &suites,
            org_id,
            vec![
                TriggerCondition::Always,
                TriggerCondition::OutcomeMatch {
                    outcome_type: "escalation".into(),
                },
                TriggerCondition::Always,
            ],
        )
        .await;

        let run = service.start_run(org_id, suite.id).await.unwrap();
        let outcome = service
            .advance_run(org_id, run.id, &Observation::default())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                to_index: 2,
                skipped: vec![1]
            }
        );
    }

    #[tokio::test]
    async fn test_abort_is_terminal() {
        let (service, suites, org_id) = setup().await;
        let suite = seed_suite(&suites, org_id, vec![TriggerCondition::Always]).await;
        let run = service.start_run(org_id, suite.id).await.unwrap();

        let aborted = service
            .abort_run(org_id, run.id, "stakeholder call")
            .await
            .unwrap();
        assert_eq!(aborted.status, RunStatus::Aborted);

        let second = service.abort_run(org_id, run.id, "again").await;
        assert!(matches!(second, Err(OrchestratorError::CannotAbort { .. })));
    }

    #[tokio::test]
    async fn test_start_run_rejects_archived_suite() {
        let (service, suites, org_id) = setup().await;
        let suite = seed_suite(&suites, org_id, vec![TriggerCondition::Always]).await;
        suites.archive(org_id, suite.id).await.unwrap();

        let result = service.start_run(org_id, suite.id).await;
        assert!(matches!(result, Err(OrchestratorError::ArchivedSuite(_))));
    }
}
