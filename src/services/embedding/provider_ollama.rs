//! Ollama Embedding Provider
//!
//! Implements the `EmbeddingProvider` trait for Ollama local embedding models
//! using the `ollama-rs` native SDK. Requires no API key.
//!
//! Uses `nomic-embed-text` (768-dimensional) by default. The dimension is
//! updated from the first successful response.

use async_trait::async_trait;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};
use ollama_rs::Ollama;
use std::sync::atomic::{AtomicUsize, Ordering};
use studylink_core::transport::TransportConfig;
use studylink_llm::build_http_client;

use super::provider::{
    check_batch_size, EmbeddingError, EmbeddingProvider, EmbeddingProviderConfig,
    EmbeddingProviderType, EmbeddingResult,
};

/// Default Ollama API endpoint.
const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default Ollama port when the base URL omits one.
const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Default embedding model.
const DEFAULT_MODEL: &str = "nomic-embed-text";

/// Default dimension for nomic-embed-text.
const DEFAULT_DIMENSION: usize = 768;

/// Maximum batch size for Ollama embedding requests.
const MAX_BATCH_SIZE: usize = 64;

/// Ollama embedding provider using the native ollama-rs SDK.
///
/// Batches go through Ollama's `/api/embed` endpoint, which accepts
/// multiple inputs in a single request.
pub struct OllamaEmbeddingProvider {
    client: Ollama,
    model: String,
    /// Last observed embedding dimension.
    dimension: AtomicUsize,
    display_name: String,
    /// The base URL string (for error messages).
    base_url: String,
}

impl OllamaEmbeddingProvider {
    /// Create a new Ollama embedding provider from an `EmbeddingProviderConfig`.
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
            .unwrap_or(OLLAMA_DEFAULT_URL)
            .to_string();

        let client = Self::create_client(&base_url, transport)?;
        let display_name = format!("Ollama ({})", model);

        Ok(Self {
            client,
            model,
            dimension: AtomicUsize::new(config.dimension.unwrap_or(DEFAULT_DIMENSION)),
            display_name,
            base_url,
        })
    }

    /// Create an Ollama SDK client from a base URL string.
    ///
    /// `Ollama::new_with_client` takes host and port separately.
    fn create_client(base_url: &str, transport: &TransportConfig) -> EmbeddingResult<Ollama> {
        let parsed = url::Url::parse(base_url).map_err(|e| EmbeddingError::InvalidConfig {
            message: format!("invalid Ollama URL '{}': {}", base_url, e),
        })?;
        let host = parsed.host_str().unwrap_or("localhost");
        let port = parsed.port().unwrap_or(OLLAMA_DEFAULT_PORT);
        let host_url = format!("{}://{}", parsed.scheme(), host);

        let http_client = build_http_client(transport).map_err(|e| EmbeddingError::InvalidConfig {
            message: format!("failed to build HTTP client: {}", e),
        })?;
        Ok(Ollama::new_with_client(host_url, port, http_client))
    }

    /// Map an ollama-rs error to our `EmbeddingError` type.
    fn map_ollama_error(&self, err: ollama_rs::error::OllamaError) -> EmbeddingError {
        let msg = err.to_string();

        if msg.contains("connect") || msg.contains("Connection refused") {
            EmbeddingError::ProviderUnavailable {
                message: format!(
                    "Cannot connect to Ollama at {}. Is the Ollama server running? \
                     Start it with: ollama serve",
                    self.base_url
                ),
            }
        } else if msg.contains("not found") || msg.contains("404") {
            EmbeddingError::ModelNotFound {
                model: self.model.clone(),
            }
        } else if msg.contains("timed out") {
            EmbeddingError::NetworkError {
                message: format!("Request to Ollama timed out: {}", msg),
            }
        } else {
            EmbeddingError::Other { message: msg }
        }
    }

    /// Update the stored dimension from a successful embedding response.
    fn update_dimension(&self, embeddings: &[Vec<f32>]) {
        if let Some(first) = embeddings.first() {
            if !first.is_empty() {
                self.dimension.store(first.len(), Ordering::Relaxed);
            }
        }
    }

    async fn generate(&self, input: EmbeddingsInput) -> EmbeddingResult<Vec<Vec<f32>>> {
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), input);
        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| self.map_ollama_error(e))?;
        self.update_dimension(&response.embeddings);
        Ok(response.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed_documents(&self, documents: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        check_batch_size(documents.len(), MAX_BATCH_SIZE)?;

        let embeddings = self.generate(EmbeddingsInput::from(documents.to_vec())).await?;

        if embeddings.len() != documents.len() {
            return Err(EmbeddingError::ParseError {
                message: format!(
                    "expected {} embeddings but Ollama returned {}",
                    documents.len(),
                    embeddings.len()
                ),
            });
        }

        Ok(embeddings)
    }

    async fn embed_query(&self, query: &str) -> EmbeddingResult<Vec<f32>> {
        // Ollama has no separate query mode.
        self.generate(EmbeddingsInput::from(query))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::ParseError {
                message: "Ollama returned empty embeddings for query".to_string(),
            })
    }

    fn dimension(&self) -> usize {
        self.dimension.load(Ordering::Relaxed)
    }

    async fn health_check(&self) -> EmbeddingResult<()> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| self.map_ollama_error(e))?;

        // "nomic-embed-text" matches a local "nomic-embed-text:latest".
        let model_base = self.model.split(':').next().unwrap_or(&self.model);
        let model_available = models.iter().any(|m| {
            let local_base = m.name.split(':').next().unwrap_or(&m.name);
            local_base == model_base || m.name == self.model
        });

        if !model_available {
            return Err(EmbeddingError::ModelNotFound {
                model: format!(
                    "'{}' is not available locally. Pull it with: ollama pull {}",
                    self.model, self.model
                ),
            });
        }

        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Ollama
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
