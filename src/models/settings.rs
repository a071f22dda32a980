//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};
use studylink_core::transport::TransportConfig;
use studylink_llm::ProviderConfig;

use crate::services::embedding::EmbeddingProviderConfig;
use crate::services::matching::MatchingConfig;
use crate::services::retry::RetryPolicy;

/// Application configuration stored in config.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Embedding backend used for group matching
    #[serde(default)]
    pub embedding: EmbeddingProviderConfig,
    /// Generative backend used by the assistant and the prompt matcher
    #[serde(default)]
    pub llm: ProviderConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub embedding: Option<EmbeddingProviderConfig>,
    pub llm: Option<ProviderConfig>,
    pub matching: Option<MatchingConfig>,
    pub retry: Option<RetryPolicy>,
    pub transport: Option<TransportConfig>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(embedding) = update.embedding {
            self.embedding = embedding;
        }
        if let Some(llm) = update.llm {
            self.llm = llm;
        }
        if let Some(matching) = update.matching {
            self.matching = matching;
        }
        if let Some(retry) = update.retry {
            self.retry = retry;
        }
        if let Some(transport) = update.transport {
            self.transport = transport;
        }
    }

    /// Validate the configuration
    ///
    /// API keys are not checked here; they are required only when a
    /// provider is built.
    pub fn validate(&self) -> Result<(), String> {
        self.embedding
            .validate_settings()
            .map_err(|e| format!("embedding: {}", e))?;
        self.llm.validate().map_err(|e| format!("llm: {}", e))?;
        self.matching.validate()?;
        self.retry.validate()?;
        self.transport
            .validate()
            .map_err(|e| format!("transport: {}", e))?;
        Ok(())
    }

    /// Copy of the config that is safe to write to disk.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.embedding.api_key = None;
        config.llm.api_key = None;
        config
    }
}
