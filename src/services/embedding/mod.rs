//! Embedding Service
//!
//! Text-to-vector providers used by the group matcher.

pub mod provider;
pub mod provider_ollama;
pub mod provider_openai;

use std::sync::Arc;

use studylink_core::transport::TransportConfig;

pub use provider::{
    EmbeddingError, EmbeddingProvider, EmbeddingProviderCapability, EmbeddingProviderConfig,
    EmbeddingProviderType, EmbeddingResult,
};
pub use provider_ollama::OllamaEmbeddingProvider;
pub use provider_openai::OpenAIEmbeddingProvider;

/// Build the embedding provider selected by `config.provider`.
///
/// The configuration is validated first so a missing API key surfaces here
/// rather than on the first matching request.
pub fn create_embedding_provider(
    config: &EmbeddingProviderConfig,
    transport: &TransportConfig,
) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
    config.validate()?;

    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderType::OpenAI => Arc::new(OpenAIEmbeddingProvider::new(config, transport)?),
        EmbeddingProviderType::Ollama => Arc::new(OllamaEmbeddingProvider::new(config, transport)?),
    };

    tracing::info!(
        provider = %config.provider,
        model = config.effective_model(),
        dimension = provider.dimension(),
        "embedding provider created"
    );
    Ok(provider)
}
