//! OpenAI Embedding Provider
//!
//! Implements the `EmbeddingProvider` trait for OpenAI's embedding models
//! using reqwest HTTP transport.
//!
//! ## API Details
//!
//! - Endpoint: `POST https://api.openai.com/v1/embeddings`
//! - Auth: `Authorization: Bearer {api_key}`
//! - Body: `{ model, input: ["text1", ...], dimensions? }`
//! - Response: `{ data: [{ embedding, index }], model, usage }`
//!
//! A custom `base_url` points the provider at OpenAI-compatible APIs
//! (Azure OpenAI, vLLM, LiteLLM).

use async_trait::async_trait;
use serde::Deserialize;
use studylink_core::transport::TransportConfig;
use studylink_llm::build_http_client;

use super::provider::{
    check_batch_size, EmbeddingError, EmbeddingProvider, EmbeddingProviderConfig,
    EmbeddingProviderType, EmbeddingResult,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default OpenAI embedding API endpoint.
const OPENAI_EMBEDDING_API_URL: &str = "https://api.openai.com/v1/embeddings";

/// Default embedding model.
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Default embedding dimension for text-embedding-3-small.
const DEFAULT_DIMENSION: usize = 1536;

/// Maximum batch size supported by OpenAI embedding API.
const MAX_BATCH_SIZE: usize = 2048;

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// OpenAI embedding API response.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

/// Individual embedding result within the response.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
}

/// OpenAI API error response.
#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: Option<OpenAIErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// OpenAI embedding provider using the OpenAI embeddings API.
///
/// The reqwest `Client` is internally reference counted and every field is
/// immutable after construction, so the provider is `Send + Sync`.
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    dimension: usize,
    display_name: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a new OpenAI embedding provider from an `EmbeddingProviderConfig`.
    pub fn new(
        config: &EmbeddingProviderConfig,
        transport: &TransportConfig,
    ) -> EmbeddingResult<Self> {
        let model = if config.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.trim().to_string()
        };

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(OPENAI_EMBEDDING_API_URL)
            .to_string();

        let client = build_http_client(transport).map_err(|e| EmbeddingError::InvalidConfig {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        let dimension = config.dimension.unwrap_or(DEFAULT_DIMENSION);
        let display_name = format!("OpenAI ({})", model);
        let api_key = config.api_key.clone().unwrap_or_default();

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
            dimension,
            display_name,
        })
    }

    /// Build the JSON request body for the embedding API.
    fn build_request_body(&self, input: serde_json::Value) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": input,
        });

        // Only text-embedding-3-* accept a reduced `dimensions`; older and
        // compatible models use their native size.
        if self.dimension != DEFAULT_DIMENSION || self.model.contains("text-embedding-3") {
            body["dimensions"] = serde_json::json!(self.dimension);
        }

        body
    }

    /// Send a POST request to the embedding API and parse the response.
    async fn post_embeddings(
        &self,
        body: &serde_json::Value,
    ) -> EmbeddingResult<OpenAIEmbeddingResponse> {
        if self.api_key.trim().is_empty() {
            return Err(EmbeddingError::AuthenticationFailed {
                message: "OpenAI API key is not configured. Set STUDYLINK_EMBEDDING_API_KEY."
                    .to_string(),
            });
        }

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());

        if status == 200 {
            let resp_text = response
                .text()
                .await
                .map_err(|e| EmbeddingError::NetworkError {
                    message: format!("failed to read response body: {}", e),
                })?;

            let parsed = serde_json::from_str::<OpenAIEmbeddingResponse>(&resp_text).map_err(
                |e| EmbeddingError::ParseError {
                    message: format!("failed to parse embedding response: {}", e),
                },
            )?;

            if let Some(tokens) = parsed.usage.as_ref().and_then(|u| u.prompt_tokens) {
                tracing::debug!(model = %self.model, prompt_tokens = tokens, "openai embeddings received");
            }
            Ok(parsed)
        } else {
            let body_text = response.text().await.unwrap_or_default();
            Err(self.map_http_error(status, &body_text, retry_after))
        }
    }

    /// Map a reqwest transport error to `EmbeddingError`.
    fn map_reqwest_error(&self, err: reqwest::Error) -> EmbeddingError {
        let msg = err.to_string();

        if err.is_connect() || msg.contains("Connection refused") {
            EmbeddingError::ProviderUnavailable {
                message: format!(
                    "Cannot connect to OpenAI API at {}. Check your network connectivity.",
                    self.base_url
                ),
            }
        } else if err.is_timeout() {
            EmbeddingError::NetworkError {
                message: format!("Request to OpenAI API timed out: {}", msg),
            }
        } else {
            EmbeddingError::NetworkError { message: msg }
        }
    }

    /// Map an HTTP error response to `EmbeddingError`.
    fn map_http_error(
        &self,
        status: u16,
        body_text: &str,
        retry_after: Option<u32>,
    ) -> EmbeddingError {
        let error_detail = serde_json::from_str::<OpenAIErrorResponse>(body_text)
            .ok()
            .and_then(|r| r.error);

        let error_message = error_detail
            .as_ref()
            .and_then(|d| d.message.as_deref())
            .unwrap_or(body_text);

        match status {
            401 | 403 => EmbeddingError::AuthenticationFailed {
                message: format!("OpenAI authentication failed: {}", error_message),
            },
            429 => EmbeddingError::RateLimited {
                message: format!("OpenAI rate limit exceeded: {}", error_message),
                retry_after,
            },
            400 => {
                if error_message.contains("token") || error_message.contains("length") {
                    EmbeddingError::InputTooLong {
                        message: format!("OpenAI: {}", error_message),
                    }
                } else {
                    EmbeddingError::InvalidConfig {
                        message: format!("OpenAI bad request: {}", error_message),
                    }
                }
            }
            404 => EmbeddingError::ModelNotFound {
                model: format!(
                    "'{}' not found at {}. {}",
                    self.model, self.base_url, error_message
                ),
            },
            500..=599 => EmbeddingError::ServerError {
                message: format!("OpenAI server error (HTTP {}): {}", status, error_message),
                status: Some(status),
            },
            _ => EmbeddingError::Other {
                message: format!(
                    "OpenAI unexpected response (HTTP {}): {}",
                    status, error_message
                ),
            },
        }
    }

    /// Sort and extract embedding vectors from the API response.
    fn extract_embeddings(
        &self,
        mut response: OpenAIEmbeddingResponse,
        expected_count: usize,
    ) -> EmbeddingResult<Vec<Vec<f32>>> {
        if response.data.len() != expected_count {
            return Err(EmbeddingError::ParseError {
                message: format!(
                    "expected {} embeddings but OpenAI returned {}",
                    expected_count,
                    response.data.len()
                ),
            });
        }

        // The API may return items out of order.
        response.data.sort_by_key(|d| d.index);
        if let Some((position, item)) = response
            .data
            .iter()
            .enumerate()
            .find(|(position, item)| item.index != *position)
        {
            return Err(EmbeddingError::ParseError {
                message: format!(
                    "OpenAI embedding indices are not 0..{}: found index {} at position {}",
                    expected_count, item.index, position
                ),
            });
        }

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed_documents(&self, documents: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        check_batch_size(documents.len(), MAX_BATCH_SIZE)?;

        let body = self.build_request_body(serde_json::json!(documents));
        let response = self.post_embeddings(&body).await?;

        self.extract_embeddings(response, documents.len())
    }

    async fn embed_query(&self, query: &str) -> EmbeddingResult<Vec<f32>> {
        let body = self.build_request_body(serde_json::json!(query));
        let response = self.post_embeddings(&body).await?;

        self.extract_embeddings(response, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::ParseError {
                message: "OpenAI returned empty embeddings for query".to_string(),
            })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn health_check(&self) -> EmbeddingResult<()> {
        let body = self.build_request_body(serde_json::json!("health check"));
        self.post_embeddings(&body).await?;
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::OpenAI
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
