//! Application State
//!
//! Builds every service from one `AppConfig` and shares the provider and
//! store handles between them.

use std::sync::Arc;

use studylink_llm::{create_provider, LlmProvider};

use crate::models::settings::AppConfig;
use crate::services::assistant::{ChatSummarizer, StudySuggestionGenerator};
use crate::services::embedding::{create_embedding_provider, EmbeddingProvider};
use crate::services::matching::{GroupMatchingService, MatchingOrchestrator, PromptMatcher};
use crate::storage::{GroupStore, ProfileStore};
use crate::utils::error::{AppError, AppResult};

/// All services, wired to shared providers and stores
pub struct AppState {
    pub matching: GroupMatchingService,
    pub prompt_matcher: PromptMatcher,
    pub summarizer: ChatSummarizer,
    pub suggestions: StudySuggestionGenerator,
}

impl AppState {
    /// Build providers from `config`, then the services on top of them.
    pub fn from_config(
        config: &AppConfig,
        profiles: Arc<dyn ProfileStore>,
        groups: Arc<dyn GroupStore>,
    ) -> AppResult<Self> {
        config.validate().map_err(AppError::validation)?;

        let embedder = create_embedding_provider(&config.embedding, &config.transport)
            .map_err(|e| AppError::config(format!("embedding provider: {}", e)))?;
        let llm = create_provider(config.llm.clone(), &config.transport)
            .map_err(|e| AppError::config(format!("llm provider: {}", e)))?;

        Ok(Self::with_providers(config, embedder, llm, profiles, groups))
    }

    /// Wire services around existing provider handles.
    pub fn with_providers(
        config: &AppConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        profiles: Arc<dyn ProfileStore>,
        groups: Arc<dyn GroupStore>,
    ) -> Self {
        let orchestrator = MatchingOrchestrator::new(embedder, &config.matching, config.retry);
        Self {
            matching: GroupMatchingService::new(
                profiles,
                groups,
                orchestrator,
                config.matching.fallback_count,
            ),
            prompt_matcher: PromptMatcher::new(llm.clone(), config.retry),
            summarizer: ChatSummarizer::new(llm.clone(), config.retry),
            suggestions: StudySuggestionGenerator::new(llm, config.retry),
        }
    }
}
