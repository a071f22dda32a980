//! Embedding Provider Abstraction Layer
//!
//! Defines the async `EmbeddingProvider` trait and supporting types for
//! pluggable embedding backends. Each backend (OpenAI-compatible HTTP,
//! Ollama) implements this trait so the matcher never sees transport details.
//!
//! Embedding is a distinct responsibility from chat completion, so this
//! trait lives apart from `LlmProvider`. It is object-safe and `Send + Sync`
//! so handles can be shared as `Arc<dyn EmbeddingProvider>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during embedding operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmbeddingError {
    /// Authentication failed (invalid or missing API key).
    AuthenticationFailed { message: String },

    /// The requested model was not found or is not available.
    ModelNotFound { model: String },

    /// The provider is not reachable or not running.
    ProviderUnavailable { message: String },

    /// The input batch exceeds the provider's maximum batch size.
    BatchSizeLimitExceeded {
        requested: usize,
        max_allowed: usize,
    },

    /// The input text exceeds the provider's maximum token/character limit.
    InputTooLong { message: String },

    /// A network or connection error occurred.
    NetworkError { message: String },

    /// The provider returned an unexpected or unparseable response.
    ParseError { message: String },

    /// The provider returned an HTTP error.
    ServerError {
        message: String,
        status: Option<u16>,
    },

    /// Rate limit exceeded.
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },

    /// Configuration is invalid or incomplete.
    InvalidConfig { message: String },

    /// Any other error.
    Other { message: String },
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed { message } => {
                write!(f, "authentication failed: {}", message)
            }
            Self::ModelNotFound { model } => write!(f, "model not found: {}", model),
            Self::ProviderUnavailable { message } => {
                write!(f, "provider unavailable: {}", message)
            }
            Self::BatchSizeLimitExceeded {
                requested,
                max_allowed,
            } => write!(
                f,
                "batch size {} exceeds maximum {}",
                requested, max_allowed
            ),
            Self::InputTooLong { message } => write!(f, "input too long: {}", message),
            Self::NetworkError { message } => write!(f, "network error: {}", message),
            Self::ParseError { message } => write!(f, "parse error: {}", message),
            Self::ServerError { message, status } => {
                if let Some(code) = status {
                    write!(f, "server error (HTTP {}): {}", code, message)
                } else {
                    write!(f, "server error: {}", message)
                }
            }
            Self::RateLimited { message, .. } => write!(f, "rate limited: {}", message),
            Self::InvalidConfig { message } => write!(f, "invalid config: {}", message),
            Self::Other { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for EmbeddingError {}

impl EmbeddingError {
    /// Whether this error is transient and the operation should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::NetworkError { .. }
                | EmbeddingError::RateLimited { .. }
                | EmbeddingError::ServerError { .. }
                | EmbeddingError::ProviderUnavailable { .. }
        )
    }

    /// For rate-limited errors, return the suggested wait time in seconds.
    pub fn retry_after_secs(&self) -> Option<u64> {
        if let EmbeddingError::RateLimited { retry_after, .. } = self {
            retry_after.map(u64::from)
        } else {
            None
        }
    }
}

/// Convenience alias for embedding operation results.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

// ---------------------------------------------------------------------------
// Provider type enum
// ---------------------------------------------------------------------------

/// Identifies the embedding backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI embedding models and OpenAI-compatible endpoints.
    #[serde(rename = "open_ai")]
    OpenAI,
    /// Ollama local embedding models.
    Ollama,
}

impl EmbeddingProviderType {
    /// Returns the default capability metadata for this provider type.
    pub fn default_capability(&self) -> EmbeddingProviderCapability {
        match self {
            Self::OpenAI => EmbeddingProviderCapability {
                provider_type: *self,
                display_name: "OpenAI".to_string(),
                is_local: false,
                requires_api_key: true,
                default_model: "text-embedding-3-small".to_string(),
                default_dimension: 1536,
                max_batch_size: 2048,
                supported_dimensions: Some(vec![256, 512, 1024, 1536, 3072]),
            },
            Self::Ollama => EmbeddingProviderCapability {
                provider_type: *self,
                display_name: "Ollama".to_string(),
                is_local: true,
                requires_api_key: false,
                default_model: "nomic-embed-text".to_string(),
                default_dimension: 768,
                max_batch_size: 64,
                supported_dimensions: None,
            },
        }
    }

    /// Returns all supported provider types.
    pub fn all() -> &'static [EmbeddingProviderType] {
        &[Self::OpenAI, Self::Ollama]
    }
}

impl fmt::Display for EmbeddingProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider configuration
// ---------------------------------------------------------------------------

/// Configuration for an embedding provider instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingProviderConfig {
    /// The embedding backend type.
    pub provider: EmbeddingProviderType,

    /// Model identifier (e.g., "text-embedding-3-small", "nomic-embed-text").
    pub model: String,

    /// API key for remote providers. Never written back to disk.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,

    /// Base URL override for the provider API. If `None`, the provider's
    /// default endpoint is used.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub base_url: Option<String>,

    /// Desired embedding dimension. If `None`, the provider's default is used.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dimension: Option<usize>,
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self::new(EmbeddingProviderType::OpenAI)
    }
}

impl EmbeddingProviderConfig {
    /// Create a new configuration with sensible defaults for the given provider type.
    pub fn new(provider: EmbeddingProviderType) -> Self {
        let capability = provider.default_capability();
        Self {
            provider,
            model: capability.default_model,
            api_key: None,
            base_url: None,
            dimension: None,
        }
    }

    /// Validate the configuration and return the first issue found.
    pub fn validate(&self) -> EmbeddingResult<()> {
        let capability = self.provider.default_capability();

        if capability.requires_api_key
            && self.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(EmbeddingError::InvalidConfig {
                message: format!(
                    "{} requires an API key but none was provided",
                    capability.display_name
                ),
            });
        }

        self.validate_settings()
    }

    /// Validate everything except the API key, which is not stored on disk.
    pub fn validate_settings(&self) -> EmbeddingResult<()> {
        let capability = self.provider.default_capability();

        if self.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                message: "model name must not be empty".to_string(),
            });
        }

        if let Some(base_url) = &self.base_url {
            let parsed = url::Url::parse(base_url).map_err(|e| EmbeddingError::InvalidConfig {
                message: format!("invalid base_url '{}': {}", base_url, e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(EmbeddingError::InvalidConfig {
                    message: format!("base_url must be http or https: {}", base_url),
                });
            }
        }

        if let Some(dim) = self.dimension {
            if dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    message: "dimension must be at least 1".to_string(),
                });
            }
            if let Some(ref supported) = capability.supported_dimensions {
                if !supported.contains(&dim) {
                    return Err(EmbeddingError::InvalidConfig {
                        message: format!(
                            "dimension {} is not supported by {}; supported: {:?}",
                            dim, capability.display_name, supported
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns the effective dimension: the configured dimension or the provider's default.
    pub fn effective_dimension(&self) -> usize {
        self.dimension
            .unwrap_or(self.provider.default_capability().default_dimension)
    }

    /// Returns the effective model name (trimmed).
    pub fn effective_model(&self) -> &str {
        self.model.trim()
    }
}

// ---------------------------------------------------------------------------
// Provider capability metadata
// ---------------------------------------------------------------------------

/// Metadata describing a provider's capabilities and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingProviderCapability {
    pub provider_type: EmbeddingProviderType,
    pub display_name: String,
    /// Whether this provider runs on the local machine.
    pub is_local: bool,
    pub requires_api_key: bool,
    pub default_model: String,
    pub default_dimension: usize,
    /// Maximum number of texts that can be embedded in one batch.
    pub max_batch_size: usize,
    /// `None` means the dimension is fixed by the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_dimensions: Option<Vec<usize>>,
}

// ---------------------------------------------------------------------------
// Embedding provider trait
// ---------------------------------------------------------------------------

/// Async trait for embedding providers.
///
/// Implementations produce dense vector representations of text. Vectors are
/// never cached: every call reaches the backend.
///
/// ```ignore
/// let provider = create_embedding_provider(&config, &transport)?;
/// let vectors = provider.embed_documents(&["Calc Crew: Mathematics. ..."]).await?;
/// let query_vec = provider.embed_query("Student interested in ...").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of document texts in one request.
    ///
    /// Returns one vector per input, in input order. Batches larger than
    /// `max_batch_size()` are rejected with `BatchSizeLimitExceeded`.
    async fn embed_documents(&self, documents: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embed a single query text into a dense vector.
    ///
    /// The default implementation delegates to `embed_documents` with a
    /// single-element slice.
    async fn embed_query(&self, query: &str) -> EmbeddingResult<Vec<f32>> {
        let results = self.embed_documents(&[query]).await?;
        results.into_iter().next().ok_or_else(|| EmbeddingError::ParseError {
            message: "embed_documents returned empty results for single query".to_string(),
        })
    }

    /// Returns the dimensionality of the embedding vectors produced.
    fn dimension(&self) -> usize;

    /// Check if the provider is healthy and reachable.
    async fn health_check(&self) -> EmbeddingResult<()>;

    /// Returns the maximum number of texts accepted by one `embed_documents` call.
    fn max_batch_size(&self) -> usize;

    /// Returns the provider type identifier.
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Returns a human-readable name for this provider instance.
    fn display_name(&self) -> &str;
}

/// Reject a batch that exceeds `max_allowed` before any request is made.
pub(crate) fn check_batch_size(requested: usize, max_allowed: usize) -> EmbeddingResult<()> {
    if requested > max_allowed {
        return Err(EmbeddingError::BatchSizeLimitExceeded {
            requested,
            max_allowed,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
