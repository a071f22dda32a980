//! Structured Output
//!
//! Sends a prompt with a JSON Schema response format derived from the
//! output type, then parses the reply strictly into that type.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use studylink_llm::{LlmProvider, LlmRequestOptions, Message, ResponseFormat};

use super::error::AssistantError;
use crate::services::retry::RetryPolicy;

/// Response format carrying the JSON Schema of `T`.
pub fn response_format_for<T: JsonSchema>(name: &str) -> ResponseFormat {
    ResponseFormat::JsonSchema {
        name: name.to_string(),
        schema: schemars::schema_for!(T).to_value(),
    }
}

/// One structured generative call, retried per `retry`.
pub(crate) async fn request_structured<T>(
    llm: &dyn LlmProvider,
    retry: &RetryPolicy,
    operation: &str,
    system: &str,
    prompt: String,
) -> Result<T, AssistantError>
where
    T: DeserializeOwned + JsonSchema,
{
    let options = LlmRequestOptions {
        temperature_override: None,
        response_format: response_format_for::<T>(operation),
    };

    let response = retry
        .run(operation, || {
            llm.send_message(
                vec![Message::user(prompt.clone())],
                Some(system.to_string()),
                options.clone(),
            )
        })
        .await?;

    tracing::debug!(
        operation,
        provider = llm.name(),
        model = %response.model,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "structured response received"
    );

    if response.is_truncated() {
        return Err(AssistantError::malformed(format!(
            "{} response was cut off at the token limit",
            operation
        )));
    }
    parse_structured(response.text())
}

/// Parse model output into `T`, failing on anything that does not match.
///
/// Markdown code fences around the JSON object are tolerated.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, AssistantError> {
    let json = extract_json_object(text);
    if json.is_empty() {
        return Err(AssistantError::malformed("response is empty"));
    }
    serde_json::from_str(json)
        .map_err(|e| AssistantError::malformed(format!("response does not match schema: {}", e)))
}

fn extract_json_object(text: &str) -> &str {
    let trimmed = text.trim();

    // ```json ... ``` or ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}
