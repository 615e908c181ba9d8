//! Pure state-transition logic for suite runs. No I/O here: the service
//! layer loads state, calls these functions, and persists the result.

use chrono::Utc;
use scenario_core::{
    Observation, RunItemStatus, RunStatus, Suite, SuiteItem, SuiteRun, SuiteRunItem,
};

use crate::condition;
use crate::error::{OrchestratorError, Result};

/// Outcome of one advance call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The run moved to the item at `to_index`; `skipped` lists the order
    /// indices of items whose conditions did not fire on the way there.
    Advanced { to_index: i64, skipped: Vec<i64> },
    /// No remaining item triggered; the run is complete.
    Completed { skipped: Vec<i64> },
}

pub struct RunStateMachine;

impl RunStateMachine {
    /// Create a new running run over the suite's items, plus one pending
    /// run item per suite item.
    pub fn start_run(suite: &Suite, items: &[SuiteItem]) -> Result<(SuiteRun, Vec<SuiteRunItem>)> {
        if items.is_empty() {
            return Err(OrchestratorError::EmptySuite(suite.id));
        }
        if suite.is_archived() {
            return Err(OrchestratorError::ArchivedSuite(suite.id));
        }

        let run = SuiteRun::new(suite.org_id, suite.id, items.len() as i64);
        let run_items = items
            .iter()
            .map(|item| SuiteRunItem::pending(run.id, item.id, item.order_index))
            .collect();

        Ok((run, run_items))
    }

    /// Advance the run by evaluating trigger conditions against the latest
    /// observation, starting at the item after `current_item_index`.
    ///
    /// A condition that does not fire means "not applicable", not a blocking
    /// failure: the item is marked skipped and the scan continues against the
    /// same observation within this call, until a trigger fires or the items
    /// run out (then the run completes). `items` must be ordered ascending by
    /// `order_index`; positions in the slice are what `current_item_index`
    /// counts.
    pub fn advance(
        run: &mut SuiteRun,
        items: &[SuiteItem],
        run_items: &mut [SuiteRunItem],
        observation: &Observation,
    ) -> Result<AdvanceOutcome> {
        if run.status != RunStatus::Running {
            return Err(OrchestratorError::InvalidRunState {
                run_id: run.id,
                status: run.status,
            });
        }

        let mut skipped = Vec::new();
        let mut index = run.current_item_index + 1;

        loop {
            let Some(item) = usize::try_from(index).ok().and_then(|i| items.get(i)) else {
                // Current index was the last item (or everything after it was
                // skipped): the run is done.
                run.status = RunStatus::Completed;
                run.current_item_index = run.total_items;
                run.updated_at = Utc::now();
                return Ok(AdvanceOutcome::Completed { skipped });
            };

            if condition::evaluate(&item.trigger_condition, observation) {
                run.current_item_index = index;
                run.updated_at = Utc::now();
                return Ok(AdvanceOutcome::Advanced {
                    to_index: index,
                    skipped,
                });
            }

            if let Some(run_item) = run_items
                .iter_mut()
                .find(|ri| ri.suite_item_id == item.id)
            {
                run_item.status = RunItemStatus::Skipped;
                run_item.updated_at = Utc::now();
            }
            skipped.push(item.order_index);
            index += 1;
        }
    }

    /// Abort a running run, recording the caller's reason. Terminal runs
    /// cannot be aborted again.
    pub fn abort(run: &mut SuiteRun, reason: impl Into<String>) -> Result<()> {
        if run.status != RunStatus::Running {
            return Err(OrchestratorError::CannotAbort {
                run_id: run.id,
                status: run.status,
            });
        }

        run.status = RunStatus::Aborted;
        run.abort_reason = Some(reason.into());
        run.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{Comparison, MatchMode, RiskLevel, SuiteStatus, TriggerCondition};
    use uuid::Uuid;

    fn suite() -> Suite {
        Suite::new(Uuid::new_v4(), "Drill", "")
    }

    fn items_with(conditions: Vec<TriggerCondition>) -> Vec<SuiteItem> {
        let suite_id = Uuid::new_v4();
        conditions
            .into_iter()
            .enumerate()
            .map(|(index, condition)| {
                SuiteItem::new(
                    suite_id,
                    index as i64,
                    format!("step {index}"),
                    Uuid::new_v4(),
                    condition,
                )
            })
            .collect()
    }

    fn start(suite: &Suite, items: &[SuiteItem]) -> (SuiteRun, Vec<SuiteRunItem>) {
        RunStateMachine::start_run(suite, items).unwrap()
    }

    #[test]
    fn test_start_run_rejects_empty_suite() {
        let suite = suite();
        let result = RunStateMachine::start_run(&suite, &[]);
        assert!(matches!(result, Err(OrchestratorError::EmptySuite(id)) if id == suite.id));
    }

    #[test]
    fn test_start_run_rejects_archived_suite() {
        let mut suite = suite();
        suite.status = SuiteStatus::Archived;
        let items = items_with(vec![TriggerCondition::Always]);

        let result = RunStateMachine::start_run(&suite, &items);
        assert!(matches!(result, Err(OrchestratorError::ArchivedSuite(_))));
    }

    #[test]
    fn test_start_run_produces_running_run_with_pending_items() {
        let suite = suite();
        let items = items_with(vec![TriggerCondition::Always]);

        let (run, run_items) = start(&suite, &items);

        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.current_item_index, 0);
        assert_eq!(run.total_items, 1);
        assert_eq!(run_items.len(), 1);
        assert_eq!(run_items[0].status, RunItemStatus::Pending);
        assert_eq!(run_items[0].run_id, run.id);
    }

    #[test]
    fn test_advance_past_last_item_completes_run() {
        let suite = suite();
        let items = items_with(vec![TriggerCondition::Always]);
        let (mut run, mut run_items) = start(&suite, &items);

        let outcome =
            RunStateMachine::advance(&mut run, &items, &mut run_items, &Observation::default())
                .unwrap();

        assert_eq!(outcome, AdvanceOutcome::Completed { skipped: vec![] });
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.current_item_index, run.total_items);
    }

    #[test]
    fn test_advance_moves_to_next_triggered_item() {
        let suite = suite();
        let items = items_with(vec![TriggerCondition::Always, TriggerCondition::Always]);
        let (mut run, mut run_items) = start(&suite, &items);

        let outcome =
            RunStateMachine::advance(&mut run, &items, &mut run_items, &Observation::default())
                .unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                to_index: 1,
                skipped: vec![]
            }
        );
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.current_item_index, 1);
    }

    #[test]
    fn test_advance_skips_non_triggering_item_and_continues() {
        let suite = suite();
        let items = items_with(vec![
            TriggerCondition::Always,
            TriggerCondition::RiskThreshold {
                min_risk_level: RiskLevel::Critical,
                comparison: Comparison::Gte,
            },
            TriggerCondition::KeywordMatch {
                keywords: vec!["recall".into()],
                match_mode: MatchMode::Any,
            },
        ]);
        let (mut run, mut run_items) = start(&suite, &items);

        let observation = Observation {
            risk_level: Some(RiskLevel::Medium),
            narrative: Some("Regulator hints at a recall".into()),
            ..Default::default()
        };

        let outcome =
            RunStateMachine::advance(&mut run, &items, &mut run_items, &observation).unwrap();

        // Item 1's risk threshold does not fire; item 2's keyword does.
        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                to_index: 2,
                skipped: vec![1]
            }
        );
        assert_eq!(run_items[1].status, RunItemStatus::Skipped);
        assert_eq!(run.status, RunStatus::Running);
    }

    #[test]
    fn test_advance_skips_everything_and_completes() {
        let suite = suite();
        let items = items_with(vec![
            TriggerCondition::Always,
            TriggerCondition::OutcomeMatch {
                outcome_type: "escalation".into(),
            },
            TriggerCondition::RiskThreshold {
                min_risk_level: RiskLevel::High,
                comparison: Comparison::Gte,
            },
        ]);
        let (mut run, mut run_items) = start(&suite, &items);

        let outcome =
            RunStateMachine::advance(&mut run, &items, &mut run_items, &Observation::default())
                .unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Completed {
                skipped: vec![1, 2]
            }
        );
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run_items[1].status, RunItemStatus::Skipped);
        assert_eq!(run_items[2].status, RunItemStatus::Skipped);
    }

    #[test]
    fn test_advance_rejects_terminal_run() {
        let suite = suite();
        let items = items_with(vec![TriggerCondition::Always]);
        let (mut run, mut run_items) = start(&suite, &items);
        run.status = RunStatus::Completed;

        let result =
            RunStateMachine::advance(&mut run, &items, &mut run_items, &Observation::default());

        assert!(matches!(
            result,
            Err(OrchestratorError::InvalidRunState {
                status: RunStatus::Completed,
                ..
            })
        ));
    }

    #[test]
    fn test_abort_then_abort_again_fails() {
        let suite = suite();
        let items = items_with(vec![TriggerCondition::Always]);
        let (mut run, _) = start(&suite, &items);

        RunStateMachine::abort(&mut run, "stakeholder call").unwrap();
        assert_eq!(run.status, RunStatus::Aborted);
        assert_eq!(run.abort_reason.as_deref(), Some("stakeholder call"));

        let second = RunStateMachine::abort(&mut run, "again");
        assert!(matches!(
            second,
            Err(OrchestratorError::CannotAbort {
                status: RunStatus::Aborted,
                ..
            })
        ));
    }

    #[test]
    fn test_abort_message_names_terminal_status() {
        let suite = suite();
        let items = items_with(vec![TriggerCondition::Always]);
        let (mut run, _) = start(&suite, &items);
        run.status = RunStatus::Completed;

        let error = RunStateMachine::abort(&mut run, "too late").unwrap_err();
        assert!(error.to_string().contains("completed"));
    }
}
