//! Ollama Provider
//!
//! Implementation of the LlmProvider trait for Ollama local inference
//! using the ollama-rs native SDK. No API key is needed.

use async_trait::async_trait;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::chat::{ChatMessage, ChatMessageResponse};
use ollama_rs::generation::parameters::{FormatType, JsonStructure};
use ollama_rs::models::ModelOptions;
use ollama_rs::Ollama;
use studylink_core::transport::TransportConfig;

use super::http_client::build_http_client;
use super::provider::LlmProvider;
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, MessageRole, ProviderConfig,
    ResponseFormat, StopReason, UsageStats,
};

/// Default Ollama API endpoint
const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default Ollama port when the base URL omits one
const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Ollama provider for local inference using the native ollama-rs SDK
pub struct OllamaProvider {
    config: ProviderConfig,
    client: Ollama,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given configuration
    pub fn new(config: ProviderConfig, transport: &TransportConfig) -> LlmResult<Self> {
        let base_url = config.base_url.as_deref().unwrap_or(OLLAMA_DEFAULT_URL);
        let client = Self::create_client(base_url, transport)?;
        Ok(Self { config, client })
    }

    /// Create an Ollama SDK client from a base URL string.
    ///
    /// `Ollama::new_with_client` takes host and port separately, so the URL
    /// is split here and the shared transport client is injected.
    fn create_client(base_url: &str, transport: &TransportConfig) -> LlmResult<Ollama> {
        let parsed = url::Url::parse(base_url).map_err(|e| LlmError::InvalidRequest {
            message: format!("invalid Ollama URL '{}': {}", base_url, e),
        })?;
        let host = parsed.host_str().unwrap_or("localhost");
        let port = parsed.port().unwrap_or(OLLAMA_DEFAULT_PORT);
        let host_url = format!("{}://{}", parsed.scheme(), host);

        let http_client = build_http_client(transport).map_err(|e| LlmError::InvalidRequest {
            message: format!("failed to build HTTP client: {}", e),
        })?;
        Ok(Ollama::new_with_client(host_url, port, http_client))
    }

    /// Get the base URL for the Ollama server (used in error messages)
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(OLLAMA_DEFAULT_URL)
    }

    /// Map the response format onto Ollama's `format` field.
    ///
    /// A named schema is sent as structured output. If it is not a valid
    /// JSON Schema the request falls back to plain JSON mode.
    fn format_type(format: &ResponseFormat) -> Option<FormatType> {
        match format {
            ResponseFormat::Text => None,
            ResponseFormat::Json => Some(FormatType::Json),
            ResponseFormat::JsonSchema { name, schema } => {
                match serde_json::from_value::<schemars::Schema>(schema.clone()) {
                    Ok(schema) => Some(FormatType::StructuredJson(Box::new(
                        JsonStructure::new_for_schema(schema),
                    ))),
                    Err(e) => {
                        tracing::warn!(
                            schema = %name,
                            error = %e,
                            "invalid JSON schema, using plain JSON mode"
                        );
                        Some(FormatType::Json)
                    }
                }
            }
        }
    }

    /// Build a ChatMessageRequest from our unified types
    fn build_chat_request(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> ChatMessageRequest {
        let mut chat_messages: Vec<ChatMessage> = Vec::new();

        if let Some(sys) = system {
            chat_messages.push(ChatMessage::system(sys.to_string()));
        }

        for msg in messages {
            let converted = match msg.role {
                MessageRole::System => ChatMessage::system(msg.content.clone()),
                MessageRole::User => ChatMessage::user(msg.content.clone()),
                MessageRole::Assistant => ChatMessage::assistant(msg.content.clone()),
            };
            chat_messages.push(converted);
        }

        let temperature = request_options
            .temperature_override
            .unwrap_or(self.config.temperature);
        let num_predict = i32::try_from(self.config.max_tokens).unwrap_or(i32::MAX);
        let opts = ModelOptions::default()
            .temperature(temperature)
            .num_predict(num_predict);

        let mut request =
            ChatMessageRequest::new(self.config.model.clone(), chat_messages).options(opts);
        if let Some(format) = Self::format_type(&request_options.response_format) {
            request = request.format(format);
        }
        request
    }

    /// Convert an ollama-rs ChatMessageResponse to our unified LlmResponse.
    fn convert_response(&self, response: &ChatMessageResponse) -> LlmResponse {
        let text = response.message.content.trim();
        let content = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };

        let usage = response
            .final_data
            .as_ref()
            .map(|final_data| UsageStats {
                input_tokens: u32::try_from(final_data.prompt_eval_count).unwrap_or(u32::MAX),
                output_tokens: u32::try_from(final_data.eval_count).unwrap_or(u32::MAX),
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            stop_reason: StopReason::EndTurn,
            usage,
            model: response.model.clone(),
        }
    }

    fn map_ollama_error(&self, err: ollama_rs::error::OllamaError) -> LlmError {
        let msg = err.to_string();
        if msg.contains("connect") || msg.contains("Connection refused") {
            LlmError::ProviderUnavailable {
                message: format!("Cannot connect to Ollama at {}: {}", self.base_url(), msg),
            }
        } else if msg.contains("not found") || msg.contains("404") {
            LlmError::ModelNotFound {
                model: self.config.model.clone(),
            }
        } else {
            LlmError::NetworkError { message: msg }
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let request = self.build_chat_request(&messages, system.as_deref(), &request_options);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| self.map_ollama_error(e))?;

        Ok(self.convert_response(&response))
    }

    async fn health_check(&self) -> LlmResult<()> {
        self.client
            .list_local_models()
            .await
            .map_err(|e| self.map_ollama_error(e))?;
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
