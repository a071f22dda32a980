//! LLM Provider Trait
//!
//! Defines the common interface for all generative providers.

use std::sync::Arc;

use async_trait::async_trait;
use studylink_core::transport::TransportConfig;

use super::ollama::OllamaProvider;
use super::openai::OpenAIProvider;
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig, ProviderType,
};

/// Trait that all LLM providers must implement.
///
/// Provides a unified interface for:
/// - Single message completions (send_message)
/// - Health checking
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send a message and get a complete response.
    ///
    /// # Arguments
    /// * `messages` - Conversation so far
    /// * `system` - Optional system prompt
    /// * `request_options` - Temperature override and response format
    ///
    /// # Returns
    /// Complete response from the model
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse>;

    /// Check if the provider is healthy and reachable.
    ///
    /// For API providers, this validates the API key.
    /// For Ollama, this checks if the server is running.
    async fn health_check(&self) -> LlmResult<()>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Build the provider selected by `config.provider`.
pub fn create_provider(
    config: ProviderConfig,
    transport: &TransportConfig,
) -> LlmResult<Arc<dyn LlmProvider>> {
    config
        .validate()
        .map_err(|message| LlmError::InvalidRequest { message })?;

    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(config, transport)?),
        ProviderType::Ollama => Arc::new(OllamaProvider::new(config, transport)?),
    };
    tracing::debug!(
        provider = provider.name(),
        model = provider.model(),
        "LLM provider created"
    );
    Ok(provider)
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Map a `reqwest` failure onto the matching error variant.
pub fn map_reqwest_error(err: reqwest::Error, provider: &str) -> LlmError {
    if err.is_connect() {
        LlmError::ProviderUnavailable {
            message: format!("{}: cannot connect: {}", provider, err),
        }
    } else {
        LlmError::NetworkError {
            message: format!("{}: {}", provider, err),
        }
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
            retry_after: None,
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_error() {
        let err = missing_api_key_error("openai");
        match err {
            LlmError::AuthenticationFailed { message } => {
                assert!(message.contains("openai"));
            }
            _ => panic!("Expected AuthenticationFailed"),
        }
    }

    #[test]
    fn test_parse_http_error() {
        let err = parse_http_error(401, "unauthorized", "openai");
        assert!(matches!(err, LlmError::AuthenticationFailed { .. }));

        let err = parse_http_error(429, "rate limited", "openai");
        assert!(matches!(err, LlmError::RateLimited { .. }));
        assert!(err.is_retryable());

        let err = parse_http_error(503, "overloaded", "openai");
        assert!(matches!(
            err,
            LlmError::ServerError {
                status: Some(503),
                ..
            }
        ));

        let err = parse_http_error(418, "teapot", "openai");
        assert!(matches!(err, LlmError::Other { .. }));
    }

    #[test]
    fn test_create_provider_openai() {
        let config = ProviderConfig {
            api_key: Some("sk-test".to_string()),
            ..ProviderConfig::default()
        };
        let provider = create_provider(config, &TransportConfig::default()).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_provider_ollama() {
        let config = ProviderConfig {
            provider: ProviderType::Ollama,
            model: "llama3.1".to_string(),
            ..ProviderConfig::default()
        };
        let provider = create_provider(config, &TransportConfig::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_create_provider_rejects_invalid_config() {
        let config = ProviderConfig {
            model: String::new(),
            ..ProviderConfig::default()
        };
        let result = create_provider(config, &TransportConfig::default());
        assert!(matches!(result, Err(LlmError::InvalidRequest { .. })));
    }

    #[test]
    fn provider_is_object_safe() {
        fn _assert_object_safe(_: &dyn LlmProvider) {}
    }
}
