//! Assistant errors

use studylink_llm::LlmError;
use thiserror::Error;

/// Errors returned by the generative flows (summaries, suggestions and the
/// prompt-based group matcher).
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("chat history is empty")]
    EmptyHistory,

    #[error("topic is empty")]
    EmptyTopic,

    /// The generative call failed, after retries where the error allowed.
    #[error("assistant is unavailable: {source}")]
    AssistantUnavailable { source: LlmError },

    /// The model answered, but not with the requested structure.
    #[error("malformed assistant response: {message}")]
    MalformedResponse { message: String },
}

impl AssistantError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(message = %message, "assistant response rejected");
        AssistantError::MalformedResponse { message }
    }
}

impl From<LlmError> for AssistantError {
    fn from(source: LlmError) -> Self {
        AssistantError::AssistantUnavailable { source }
    }
}
