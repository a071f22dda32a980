//! Prompt Matcher
//!
//! Asks the generative model to pick groups from the existing list. Unlike
//! the embedding ranker this sees the profile tags, but its answers are
//! checked against the list before they are returned.

use std::sync::Arc;

use studylink_llm::LlmProvider;

use super::orchestrator::NO_GROUPS_REASONING;
use crate::models::{GroupRecommendation, Profile};
use crate::services::assistant::prompts::{group_match_prompt, GROUP_MATCH_SYSTEM};
use crate::services::assistant::structured::request_structured;
use crate::services::assistant::AssistantError;
use crate::services::retry::RetryPolicy;

pub struct PromptMatcher {
    llm: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl PromptMatcher {
    pub fn new(llm: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    /// Pick groups for `profile` from `group_names`.
    ///
    /// An empty suggestion list is a valid answer (the model proposes a new
    /// group in the reasoning). Names outside `group_names` are rejected.
    pub async fn suggest(
        &self,
        profile: &Profile,
        group_names: &[String],
    ) -> Result<GroupRecommendation, AssistantError> {
        if group_names.is_empty() {
            return Ok(GroupRecommendation::empty(NO_GROUPS_REASONING));
        }

        let recommendation: GroupRecommendation = request_structured(
            self.llm.as_ref(),
            &self.retry,
            "group_match",
            GROUP_MATCH_SYSTEM,
            group_match_prompt(profile, group_names),
        )
        .await?;

        if let Some(unknown) = recommendation
            .suggested_groups
            .iter()
            .find(|name| !group_names.contains(name))
        {
            return Err(AssistantError::malformed(format!(
                "suggested group '{}' is not in the group list",
                unknown
            )));
        }

        tracing::info!(
            user_id = %profile.id,
            candidates = group_names.len(),
            suggested = recommendation.suggested_groups.len(),
            "prompt match computed"
        );
        Ok(recommendation)
    }
}
