use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Severity of an observed risk, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema,
)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Ordinal rank used by threshold comparisons: low=1 .. critical=4.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Comparison operator for risk-threshold conditions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Comparison {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gte => ">=",
            Self::Gt => ">",
            Self::Eq => "==",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ">=" => Some(Self::Gte),
            ">" => Some(Self::Gt),
            "==" => Some(Self::Eq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            _ => None,
        }
    }

    /// Apply the operator to two ordinal ranks.
    pub fn apply(&self, lhs: u8, rhs: u8) -> bool {
        match self {
            Self::Gte => lhs >= rhs,
            Self::Gt => lhs > rhs,
            Self::Eq => lhs == rhs,
            Self::Lt => lhs < rhs,
            Self::Lte => lhs <= rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Any,
    All,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SentimentDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SentimentMagnitude {
    Small,
    Large,
}

/// A shift in public sentiment observed between two simulation steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct SentimentShift {
    pub direction: SentimentDirection,
    pub magnitude: SentimentMagnitude,
}

/// Predicate attached to a suite item, evaluated against the observation
/// produced by the previous step to decide whether the item should execute.
///
/// The `type` tag is immutable once stored; each variant carries exactly the
/// fields it needs, so a risk-threshold condition without a threshold is
/// unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Fires unconditionally.
    Always,
    /// Fires when the observed risk level compares against the threshold.
    RiskThreshold {
        min_risk_level: RiskLevel,
        comparison: Comparison,
    },
    /// Fires on case-insensitive keyword hits in the observed narrative.
    KeywordMatch {
        keywords: Vec<String>,
        match_mode: MatchMode,
    },
    /// Fires when the observed outcome type matches exactly.
    OutcomeMatch { outcome_type: String },
    /// Fires when the observed sentiment shift matches in both direction
    /// and magnitude.
    SentimentShift {
        direction: SentimentDirection,
        magnitude: SentimentMagnitude,
    },
}

impl TriggerCondition {
    /// Stable name of the condition variant, matching the serde tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::RiskThreshold { .. } => "risk_threshold",
            Self::KeywordMatch { .. } => "keyword_match",
            Self::OutcomeMatch { .. } => "outcome_match",
            Self::SentimentShift { .. } => "sentiment_shift",
        }
    }
}

/// Data snapshot produced by a simulation step. Every field is optional:
/// different simulations report different subsets, and evaluation treats
/// absence as non-match rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Observation {
    pub risk_level: Option<RiskLevel>,
    pub narrative: Option<String>,
    pub outcome_type: Option<String>,
    pub sentiment_shift: Option<SentimentShift>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(RiskLevel::Low.rank(), 1);
        assert_eq!(RiskLevel::Critical.rank(), 4);
    }

    #[test]
    fn test_risk_level_round_trip() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Critical,
        ] {
            assert_eq!(RiskLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(RiskLevel::parse("severe"), None);
    }

    #[test]
    fn test_comparison_apply() {
        assert!(Comparison::Gte.apply(3, 3));
        assert!(!Comparison::Gt.apply(3, 3));
        assert!(Comparison::Eq.apply(2, 2));
        assert!(Comparison::Lt.apply(1, 4));
        assert!(Comparison::Lte.apply(4, 4));
    }

    #[test]
    fn test_condition_tagged_serialization() {
        let condition = TriggerCondition::RiskThreshold {
            min_risk_level: RiskLevel::High,
            comparison: Comparison::Gte,
        };

        let json = serde_json::to_string(&condition).unwrap();
        assert!(json.contains(r#""type":"risk_threshold""#));
        assert!(json.contains(r#""min_risk_level":"high""#));
        assert!(json.contains(r#""comparison":">=""#));

        let parsed: TriggerCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, condition);
    }

    #[test]
    fn test_condition_always_deserializes_without_fields() {
        let parsed: TriggerCondition = serde_json::from_str(r#"{"type":"always"}"#).unwrap();
        assert_eq!(parsed, TriggerCondition::Always);
        assert_eq!(parsed.type_name(), "always");
    }

    #[test]
    fn test_observation_default_is_empty() {
        let observation = Observation::default();
        assert!(observation.risk_level.is_none());
        assert!(observation.narrative.is_none());
        assert!(observation.outcome_type.is_none());
        assert!(observation.sentiment_shift.is_none());
    }
}
