//! Trigger-condition evaluation.
//!
//! One pure function keeps the rule set centrally testable and lets the run
//! state machine stay agnostic of rule internals; adding a condition type
//! means extending the [`TriggerCondition`] enum and the match below, nothing
//! else.

use scenario_core::{MatchMode, Observation, TriggerCondition};

/// Decide whether a trigger condition fires against an observation.
///
/// Total and infallible: a missing or partially-populated observation field
/// evaluates to `false` rather than erroring, so one absent data source never
/// halts an entire suite run. `Always` is the only variant that ignores the
/// observation entirely.
pub fn evaluate(condition: &TriggerCondition, observation: &Observation) -> bool {
    match condition {
        TriggerCondition::Always => true,

        TriggerCondition::RiskThreshold {
            min_risk_level,
            comparison,
        } => match observation.risk_level {
            Some(observed) => comparison.apply(observed.rank(), min_risk_level.rank()),
            None => false,
        },

        TriggerCondition::KeywordMatch {
            keywords,
            match_mode,
        } => {
            let Some(narrative) = observation.narrative.as_deref() else {
                return false;
            };
            if narrative.is_empty() || keywords.is_empty() {
                return false;
            }
            let haystack = narrative.to_lowercase();
            let mut hits = keywords
                .iter()
                .map(|keyword| haystack.contains(&keyword.to_lowercase()));
            match match_mode {
                MatchMode::Any => hits.any(|hit| hit),
                MatchMode::All => hits.all(|hit| hit),
            }
        }

        TriggerCondition::OutcomeMatch { outcome_type } => observation
            .outcome_type
            .as_deref()
            .is_some_and(|observed| observed == outcome_type),

        TriggerCondition::SentimentShift {
            direction,
            magnitude,
        } => observation
            .sentiment_shift
            .is_some_and(|shift| shift.direction == *direction && shift.magnitude == *magnitude),
    }
}
