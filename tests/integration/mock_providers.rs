//! Deterministic providers shared by the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use studylink::services::embedding::{
    EmbeddingError, EmbeddingProvider, EmbeddingProviderType, EmbeddingResult,
};
use studylink_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig,
    StopReason, UsageStats,
};

/// Embeds text by keyword: each `(needle, vector)` pair is checked in
/// order and the first needle found in the text wins.
pub struct KeywordEmbedder {
    table: Vec<(&'static str, Vec<f32>)>,
    fallback: Vec<f32>,
    failure: Option<EmbeddingError>,
    pub query_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(table: Vec<(&'static str, Vec<f32>)>, fallback: Vec<f32>) -> Self {
        Self {
            table,
            fallback,
            failure: None,
            query_calls: AtomicUsize::new(0),
            document_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(failure: EmbeddingError) -> Self {
        let mut embedder = Self::new(Vec::new(), vec![0.0]);
        embedder.failure = Some(failure);
        embedder
    }

    pub fn total_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst) + self.document_calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        self.table
            .iter()
            .find(|(needle, _)| text.contains(needle))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed_documents(&self, documents: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(documents.iter().map(|d| self.vector_for(d)).collect())
    }

    async fn embed_query(&self, query: &str) -> EmbeddingResult<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.vector_for(query))
    }

    fn dimension(&self) -> usize {
        self.fallback.len()
    }

    async fn health_check(&self) -> EmbeddingResult<()> {
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        128
    }

    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Ollama
    }

    fn display_name(&self) -> &str {
        "keyword"
    }
}

/// Always answers with the same text, or the same error.
pub struct FixedLlm {
    reply: LlmResult<String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    config: ProviderConfig,
}

impl FixedLlm {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(err: LlmError) -> Self {
        Self::with_reply(Err(err))
    }

    fn with_reply(reply: LlmResult<String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            config: ProviderConfig::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FixedLlm {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn model(&self) -> &str {
        "fixed-model"
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(last) = messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        self.reply.clone().map(|text| LlmResponse {
            content: Some(text),
            stop_reason: StopReason::EndTurn,
            usage: UsageStats::default(),
            model: "fixed-model".to_string(),
        })
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
