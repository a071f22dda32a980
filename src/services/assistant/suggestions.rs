//! Study Suggestions
//!
//! Generates study tips for a topic and makes sure every returned link is
//! an absolute http(s) URL. When the model offers no links, curated ones
//! from the resource catalog are attached.

use std::sync::Arc;

use studylink_llm::LlmProvider;
use url::Url;

use super::error::AssistantError;
use super::prompts::{suggestion_prompt, SUGGESTION_SYSTEM};
use super::resources::resources_for_topic;
use super::structured::request_structured;
use crate::models::{ResourceLink, StudySuggestion};
use crate::services::retry::RetryPolicy;

pub struct StudySuggestionGenerator {
    llm: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl StudySuggestionGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    pub async fn suggest(
        &self,
        topic: &str,
        recent_history: &[String],
    ) -> Result<StudySuggestion, AssistantError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AssistantError::EmptyTopic);
        }

        let mut suggestion: StudySuggestion = request_structured(
            self.llm.as_ref(),
            &self.retry,
            "study_suggestion",
            SUGGESTION_SYSTEM,
            suggestion_prompt(topic, recent_history),
        )
        .await?;

        if suggestion.suggestions.trim().is_empty() {
            return Err(AssistantError::malformed("suggestions are empty"));
        }
        for link in &suggestion.links {
            validate_link(link)?;
        }

        if suggestion.links.is_empty() {
            suggestion.links = resources_for_topic(topic);
            tracing::debug!(
                topic,
                links = suggestion.links.len(),
                "attached catalog resources"
            );
        }
        Ok(suggestion)
    }
}

fn validate_link(link: &ResourceLink) -> Result<(), AssistantError> {
    let url = Url::parse(&link.url).map_err(|e| {
        AssistantError::malformed(format!("invalid resource url '{}': {}", link.url, e))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AssistantError::malformed(format!(
            "resource url '{}' uses unsupported scheme '{}'",
            link.url, other
        ))),
    }
}
