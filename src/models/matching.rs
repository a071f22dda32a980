//! Matching Models
//!
//! Results produced by the group matchers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Recommended groups with a short rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecommendation {
    /// Names of the suggested groups, best match first.
    pub suggested_groups: Vec<String>,
    /// Why these groups were suggested.
    pub reasoning: String,
}

impl GroupRecommendation {
    pub fn new(suggested_groups: Vec<String>, reasoning: impl Into<String>) -> Self {
        Self {
            suggested_groups,
            reasoning: reasoning.into(),
        }
    }

    /// A recommendation with no groups.
    pub fn empty(reasoning: impl Into<String>) -> Self {
        Self::new(Vec::new(), reasoning)
    }

    pub fn is_empty(&self) -> bool {
        self.suggested_groups.is_empty()
    }
}

/// One scored candidate. `index` points into the input group list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub index: usize,
    pub name: String,
    pub score: f32,
}

/// What the matching service hands back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub recommendation: GroupRecommendation,
    /// Set when the ranking backend was unavailable and the unranked
    /// fallback list was returned instead.
    pub degraded: bool,
}
