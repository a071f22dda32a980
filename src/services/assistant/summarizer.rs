//! Chat Summarizer

use std::sync::Arc;

use studylink_llm::LlmProvider;

use super::error::AssistantError;
use super::prompts::{summary_prompt, SUMMARY_SYSTEM};
use super::structured::request_structured;
use crate::models::ChatSummary;
use crate::services::retry::RetryPolicy;

/// Summarizes a chat history in one stateless generative call.
pub struct ChatSummarizer {
    llm: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl ChatSummarizer {
    pub fn new(llm: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    /// Summarize `history`, one message per line, oldest first.
    ///
    /// Blank lines are ignored. A single line is enough.
    pub async fn summarize(&self, history: &[String]) -> Result<ChatSummary, AssistantError> {
        let lines: Vec<String> = history
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            return Err(AssistantError::EmptyHistory);
        }

        let summary: ChatSummary = request_structured(
            self.llm.as_ref(),
            &self.retry,
            "chat_summary",
            SUMMARY_SYSTEM,
            summary_prompt(&lines),
        )
        .await?;

        let text = summary.summary.trim();
        if text.is_empty() {
            return Err(AssistantError::malformed("summary is empty"));
        }

        tracing::info!(lines = lines.len(), chars = text.len(), "chat summarized");
        Ok(ChatSummary {
            summary: text.to_string(),
        })
    }
}
