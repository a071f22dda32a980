//! Group Matching Service
//!
//! Caller-facing entry point: loads the profile and groups from the stores,
//! runs the orchestrator, and degrades to an unranked list when the
//! embedding backend is down.

use std::sync::Arc;

use super::documents::MatchQuery;
use super::orchestrator::{MatchingError, MatchingOrchestrator, NO_GROUPS_REASONING};
use crate::models::{GroupDocument, GroupRecommendation, MatchOutcome};
use crate::storage::{GroupStore, ProfileStore};
use crate::utils::error::{AppError, AppResult};

pub const FALLBACK_REASONING: &str =
    "Recommendations are temporarily unavailable. Here are some groups you can browse.";

pub struct GroupMatchingService {
    profiles: Arc<dyn ProfileStore>,
    groups: Arc<dyn GroupStore>,
    orchestrator: MatchingOrchestrator,
    fallback_count: usize,
}

impl GroupMatchingService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        groups: Arc<dyn GroupStore>,
        orchestrator: MatchingOrchestrator,
        fallback_count: usize,
    ) -> Self {
        Self {
            profiles,
            groups,
            orchestrator,
            fallback_count,
        }
    }

    /// Recommend groups for `user_id`.
    pub async fn suggest_for_user(&self, user_id: &str) -> AppResult<MatchOutcome> {
        let profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("profile {}", user_id)))?;

        let documents: Vec<GroupDocument> = self
            .groups
            .list_groups()
            .await?
            .iter()
            .map(|g| g.to_document())
            .collect();

        let query = MatchQuery::from(&profile);
        match self.orchestrator.recommend(&query, &documents).await {
            Ok(recommendation) => Ok(MatchOutcome {
                recommendation,
                degraded: false,
            }),
            Err(MatchingError::MatchingUnavailable { source }) => {
                tracing::warn!(
                    user_id,
                    error = %source,
                    fallback_count = self.fallback_count,
                    "matching unavailable, returning unranked groups"
                );
                Ok(MatchOutcome {
                    recommendation: self.fallback(&documents),
                    degraded: true,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn fallback(&self, documents: &[GroupDocument]) -> GroupRecommendation {
        if documents.is_empty() {
            return GroupRecommendation::empty(NO_GROUPS_REASONING);
        }
        let names = documents
            .iter()
            .take(self.fallback_count)
            .map(|d| d.name.clone())
            .collect();
        GroupRecommendation::new(names, FALLBACK_REASONING)
    }
}
