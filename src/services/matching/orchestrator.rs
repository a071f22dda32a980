//! Matching Orchestrator
//!
//! Turns a profile and the current group list into a short list of
//! recommended group names:
//!
//! 1. Build the query text and one document text per group.
//! 2. Embed the query and the whole document batch concurrently.
//! 3. Check the response shape, score, rank, and keep the top K.
//!
//! Vectors are never cached; every request embeds from scratch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::documents::{document_text, query_text, MatchQuery};
use super::ranker::{SimilarityMetric, SimilarityRanker};
use crate::models::{GroupDocument, GroupRecommendation, RankedGroup};
use crate::services::embedding::{EmbeddingError, EmbeddingProvider};
use crate::services::retry::RetryPolicy;

pub const NO_GROUPS_REASONING: &str = "No groups available to recommend.";
pub const NO_SUBJECTS_REASONING: &str =
    "Add at least one subject to your profile to get recommendations.";
pub const NO_CLOSE_MATCH_REASONING: &str = "No groups closely match your profile yet.";
pub const MATCHES_FOUND_REASONING: &str =
    "Found top matches based on your profile's similarity to group descriptions.";

/// Matching settings (the `matching` section of the app config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Maximum number of groups recommended.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Number of unranked groups shown when ranking is unavailable.
    #[serde(default = "default_fallback_count")]
    pub fallback_count: usize,
    #[serde(default)]
    pub similarity: SimilarityMetric,
}

fn default_top_k() -> usize {
    3
}

fn default_fallback_count() -> usize {
    3
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            fallback_count: default_fallback_count(),
            similarity: SimilarityMetric::default(),
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("matching.top_k must be at least 1".to_string());
        }
        if self.top_k > 50 {
            return Err("matching.top_k cannot exceed 50".to_string());
        }
        if self.fallback_count > 50 {
            return Err("matching.fallback_count cannot exceed 50".to_string());
        }
        Ok(())
    }
}

/// Errors returned by the orchestrator.
#[derive(Debug, Error)]
pub enum MatchingError {
    /// The embedding service failed after the retry budget was spent, or
    /// failed with a non-retryable error.
    #[error("group matching is unavailable: {source}")]
    MatchingUnavailable { source: EmbeddingError },

    /// The embedding service answered with vectors that cannot be ranked.
    #[error("malformed embedding response: {message}")]
    MalformedResponse { message: String },
}

impl MatchingError {
    fn malformed(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(message = %message, "embedding response rejected");
        MatchingError::MalformedResponse { message }
    }
}

impl From<EmbeddingError> for MatchingError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::ParseError { message } => MatchingError::malformed(message),
            source => MatchingError::MatchingUnavailable { source },
        }
    }
}

/// Embedding-based group recommender.
pub struct MatchingOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    ranker: SimilarityRanker,
    top_k: usize,
    retry: RetryPolicy,
}

impl MatchingOrchestrator {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        config: &MatchingConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            embedder,
            ranker: SimilarityRanker::new(config.similarity),
            top_k: config.top_k.max(1),
            retry,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Recommend up to `top_k` groups for the student.
    ///
    /// No groups, or a profile without subjects, short-circuits with an
    /// empty recommendation and no embedding call.
    pub async fn recommend(
        &self,
        query: &MatchQuery,
        groups: &[GroupDocument],
    ) -> Result<GroupRecommendation, MatchingError> {
        if groups.is_empty() {
            return Ok(GroupRecommendation::empty(NO_GROUPS_REASONING));
        }
        if query.has_no_subjects() {
            return Ok(GroupRecommendation::empty(NO_SUBJECTS_REASONING));
        }

        let ranked = self.rank(query, groups).await?;
        let suggested: Vec<String> = ranked
            .into_iter()
            .filter(|r| r.score > 0.0)
            .take(self.top_k)
            .map(|r| r.name)
            .collect();

        tracing::info!(
            candidates = groups.len(),
            suggested = suggested.len(),
            metric = ?self.ranker.metric(),
            "group recommendation computed"
        );

        if suggested.is_empty() {
            Ok(GroupRecommendation::empty(NO_CLOSE_MATCH_REASONING))
        } else {
            Ok(GroupRecommendation::new(suggested, MATCHES_FOUND_REASONING))
        }
    }

    /// Score every group against the student, best first.
    ///
    /// The result has one entry per group.
    pub async fn rank(
        &self,
        query: &MatchQuery,
        groups: &[GroupDocument],
    ) -> Result<Vec<RankedGroup>, MatchingError> {
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let query_text = query_text(query);
        let doc_texts: Vec<String> = groups.iter().map(document_text).collect();
        let doc_refs: Vec<&str> = doc_texts.iter().map(String::as_str).collect();
        let embedder = self.embedder.as_ref();

        let (query_vector, doc_vectors) = tokio::try_join!(
            self.retry
                .run("embed_query", || embedder.embed_query(&query_text)),
            self.retry
                .run("embed_documents", || embedder.embed_documents(&doc_refs)),
        )?;

        check_vectors(&query_vector, &doc_vectors, groups.len())?;

        Ok(self.ranker.rank(&query_vector, &doc_vectors, groups))
    }
}

/// Reject responses whose shape would misalign scores and groups.
fn check_vectors(
    query: &[f32],
    candidates: &[Vec<f32>],
    expected: usize,
) -> Result<(), MatchingError> {
    if candidates.len() != expected {
        return Err(MatchingError::malformed(format!(
            "expected {} candidate vectors, got {}",
            expected,
            candidates.len()
        )));
    }
    if query.is_empty() {
        return Err(MatchingError::malformed("query vector is empty"));
    }
    for (i, vector) in candidates.iter().enumerate() {
        if vector.len() != query.len() {
            return Err(MatchingError::malformed(format!(
                "candidate {} has dimension {}, query has {}",
                i,
                vector.len(),
                query.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::embedding::{EmbeddingProviderType, EmbeddingResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // =========================================================================
    // Stub embedder
    // =========================================================================

    /// Deterministic embedder driven by a plain function.
    struct StubEmbedder {
        embed: fn(&str) -> Vec<f32>,
        query_calls: AtomicUsize,
        document_calls: AtomicUsize,
        /// Errors returned (in order) before answering normally.
        failures: Mutex<Vec<EmbeddingError>>,
        drop_last_document: bool,
    }

    impl StubEmbedder {
        fn new(embed: fn(&str) -> Vec<f32>) -> Self {
            Self {
                embed,
                query_calls: AtomicUsize::new(0),
                document_calls: AtomicUsize::new(0),
                failures: Mutex::new(Vec::new()),
                drop_last_document: false,
            }
        }

        fn failing_with(self, errors: Vec<EmbeddingError>) -> Self {
            *self.failures.lock().unwrap() = errors;
            self
        }

        fn total_calls(&self) -> usize {
            self.query_calls.load(Ordering::SeqCst) + self.document_calls.load(Ordering::SeqCst)
        }

        fn next_failure(&self) -> Option<EmbeddingError> {
            let mut failures = self.failures.lock().unwrap();
            if failures.is_empty() {
                None
            } else {
                Some(failures.remove(0))
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed_documents(&self, documents: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
            self.document_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.next_failure() {
                return Err(err);
            }
            let mut vectors: Vec<Vec<f32>> = documents.iter().map(|d| (self.embed)(d)).collect();
            if self.drop_last_document {
                vectors.pop();
            }
            Ok(vectors)
        }

        async fn embed_query(&self, query: &str) -> EmbeddingResult<Vec<f32>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.embed)(query))
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn health_check(&self) -> EmbeddingResult<()> {
            Ok(())
        }

        fn max_batch_size(&self) -> usize {
            16
        }

        fn provider_type(&self) -> EmbeddingProviderType {
            EmbeddingProviderType::Ollama
        }

        fn display_name(&self) -> &str {
            "stub"
        }
    }

    fn calc_vs_art(text: &str) -> Vec<f32> {
        if text.starts_with("Student") {
            vec![1.0, 0.0]
        } else if text.starts_with("Calc Crew") {
            vec![0.9, 0.1]
        } else {
            vec![0.2, 0.8]
        }
    }

    fn art_is_opposite(text: &str) -> Vec<f32> {
        if text.starts_with("Student") {
            vec![1.0, 0.0]
        } else if text.starts_with("Calc Crew") {
            vec![0.9, 0.1]
        } else {
            vec![-0.3, 0.5]
        }
    }

    fn query() -> MatchQuery {
        MatchQuery::new(
            vec!["Calculus".to_string()],
            vec!["Python".to_string()],
            "evenings",
        )
    }

    fn groups() -> Vec<GroupDocument> {
        vec![
            GroupDocument::new("Art Club", "Art", "Sketching and painting"),
            GroupDocument::new("Calc Crew", "Mathematics", "Limits and derivatives"),
        ]
    }

    fn orchestrator(embedder: Arc<StubEmbedder>) -> MatchingOrchestrator {
        MatchingOrchestrator::new(embedder, &MatchingConfig::default(), RetryPolicy::default())
    }

    // =========================================================================
    // Short-circuit tests
    // =========================================================================

    #[tokio::test]
    async fn no_groups_returns_fixed_result_without_embedding() {
        let embedder = Arc::new(StubEmbedder::new(calc_vs_art));
        let result = orchestrator(embedder.clone())
            .recommend(&query(), &[])
            .await
            .unwrap();
        assert!(result.suggested_groups.is_empty());
        assert_eq!(result.reasoning, "No groups available to recommend.");
        assert_eq!(embedder.total_calls(), 0);
    }

    #[tokio::test]
    async fn empty_subjects_short_circuits_without_embedding() {
        let embedder = Arc::new(StubEmbedder::new(calc_vs_art));
        let query = MatchQuery::new(Vec::new(), vec!["Python".to_string()], "evenings");
        let result = orchestrator(embedder.clone())
            .recommend(&query, &groups())
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.reasoning, NO_SUBJECTS_REASONING);
        assert_eq!(embedder.total_calls(), 0);
    }

    // =========================================================================
    // Ranking tests
    // =========================================================================

    #[tokio::test]
    async fn recommends_both_positive_matches_best_first() {
        let embedder = Arc::new(StubEmbedder::new(calc_vs_art));
        let result = orchestrator(embedder.clone())
            .recommend(&query(), &groups())
            .await
            .unwrap();
        assert_eq!(result.suggested_groups, vec!["Calc Crew", "Art Club"]);
        assert_eq!(result.reasoning, MATCHES_FOUND_REASONING);
        // One query call and one batched document call.
        assert_eq!(embedder.query_calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.document_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn excludes_non_positive_matches() {
        let embedder = Arc::new(StubEmbedder::new(art_is_opposite));
        let result = orchestrator(embedder)
            .recommend(&query(), &groups())
            .await
            .unwrap();
        assert_eq!(result.suggested_groups, vec!["Calc Crew"]);
    }

    #[tokio::test]
    async fn no_positive_matches_uses_no_close_match_reasoning() {
        let embedder = Arc::new(StubEmbedder::new(|text| {
            if text.starts_with("Student") {
                vec![1.0, 0.0]
            } else {
                vec![-1.0, 0.0]
            }
        }));
        let result = orchestrator(embedder)
            .recommend(&query(), &groups())
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.reasoning, NO_CLOSE_MATCH_REASONING);
    }

    #[tokio::test]
    async fn caps_at_top_k() {
        let embedder = Arc::new(StubEmbedder::new(|_| vec![1.0, 1.0]));
        let groups: Vec<GroupDocument> = (0..5)
            .map(|i| GroupDocument::new(format!("Group {}", i), "Math", ""))
            .collect();
        let result = orchestrator(embedder)
            .recommend(&query(), &groups)
            .await
            .unwrap();
        // Equal scores keep input order.
        assert_eq!(result.suggested_groups, vec!["Group 0", "Group 1", "Group 2"]);
    }

    #[tokio::test]
    async fn rank_returns_one_score_per_group() {
        let embedder = Arc::new(StubEmbedder::new(art_is_opposite));
        let ranked = orchestrator(embedder)
            .rank(&query(), &groups())
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Calc Crew");
        assert_eq!(ranked[0].index, 1);
        assert!(ranked[1].score < 0.0);
    }

    #[tokio::test]
    async fn recommend_is_idempotent() {
        let embedder = Arc::new(StubEmbedder::new(calc_vs_art));
        let orchestrator = orchestrator(embedder);
        let first = orchestrator.recommend(&query(), &groups()).await.unwrap();
        let second = orchestrator.recommend(&query(), &groups()).await.unwrap();
        assert_eq!(first, second);
    }

    // =========================================================================
    // Error tests
    // =========================================================================

    #[tokio::test]
    async fn count_mismatch_is_malformed() {
        let mut stub = StubEmbedder::new(calc_vs_art);
        stub.drop_last_document = true;
        let err = orchestrator(Arc::new(stub))
            .recommend(&query(), &groups())
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_malformed() {
        let embedder = Arc::new(StubEmbedder::new(|text| {
            if text.starts_with("Student") {
                vec![1.0, 0.0, 0.0]
            } else {
                vec![1.0, 0.0]
            }
        }));
        let err = orchestrator(embedder)
            .recommend(&query(), &groups())
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn empty_query_vector_is_malformed() {
        let embedder = Arc::new(StubEmbedder::new(|text| {
            if text.starts_with("Student") {
                Vec::new()
            } else {
                vec![1.0]
            }
        }));
        let err = orchestrator(embedder)
            .rank(&query(), &groups())
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn provider_parse_error_is_malformed_and_not_retried() {
        let stub = StubEmbedder::new(calc_vs_art).failing_with(vec![EmbeddingError::ParseError {
            message: "expected 2 embeddings".to_string(),
        }]);
        let embedder = Arc::new(stub);
        let err = orchestrator(embedder.clone())
            .recommend(&query(), &groups())
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::MalformedResponse { .. }));
        assert_eq!(embedder.document_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried() {
        let stub = StubEmbedder::new(calc_vs_art).failing_with(vec![EmbeddingError::ServerError {
            message: "overloaded".to_string(),
            status: Some(503),
        }]);
        let embedder = Arc::new(stub);
        let result = orchestrator(embedder.clone())
            .recommend(&query(), &groups())
            .await
            .unwrap();
        assert_eq!(result.suggested_groups[0], "Calc Crew");
        assert_eq!(embedder.document_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_are_unavailable() {
        let stub = StubEmbedder::new(calc_vs_art).failing_with(vec![
            EmbeddingError::NetworkError {
                message: "reset".to_string(),
            },
            EmbeddingError::NetworkError {
                message: "reset".to_string(),
            },
        ]);
        let err = orchestrator(Arc::new(stub))
            .recommend(&query(), &groups())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MatchingError::MatchingUnavailable {
                source: EmbeddingError::NetworkError { .. }
            }
        ));
    }

    #[tokio::test]
    async fn batch_limit_is_unavailable_and_not_retried() {
        let stub = StubEmbedder::new(calc_vs_art).failing_with(vec![
            EmbeddingError::BatchSizeLimitExceeded {
                requested: 2,
                max_allowed: 1,
            },
        ]);
        let embedder = Arc::new(stub);
        let err = orchestrator(embedder.clone())
            .recommend(&query(), &groups())
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::MatchingUnavailable { .. }));
        assert_eq!(embedder.document_calls.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // Config tests
    // =========================================================================

    #[test]
    fn config_defaults_and_validation() {
        let config = MatchingConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.fallback_count, 3);
        assert_eq!(config.similarity, SimilarityMetric::Dot);
        assert!(config.validate().is_ok());

        let bad = MatchingConfig {
            top_k: 0,
            ..config
        };
        assert!(bad.validate().is_err());
    }
}
