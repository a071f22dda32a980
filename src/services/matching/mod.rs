//! Group Matching
//!
//! Embedding-based ranking of study groups against a student profile, the
//! caller-side fallback around it, and the prompt-based matcher.

pub mod documents;
pub mod orchestrator;
pub mod prompt_matcher;
pub mod ranker;
pub mod service;

pub use documents::{document_text, query_text, MatchQuery};
pub use orchestrator::{
    MatchingConfig, MatchingError, MatchingOrchestrator, MATCHES_FOUND_REASONING,
    NO_CLOSE_MATCH_REASONING, NO_GROUPS_REASONING, NO_SUBJECTS_REASONING,
};
pub use prompt_matcher::PromptMatcher;
pub use ranker::{SimilarityMetric, SimilarityRanker};
pub use service::{GroupMatchingService, FALLBACK_REASONING};
