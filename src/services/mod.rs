//! Services
//!
//! Business logic: embedding providers, group matching, the chat
//! assistant flows, and the shared retry policy.

pub mod assistant;
pub mod embedding;
pub mod matching;
pub mod retry;

pub use assistant::{AssistantError, ChatSummarizer, StudySuggestionGenerator};
pub use embedding::{create_embedding_provider, EmbeddingProvider};
pub use matching::{GroupMatchingService, MatchingError, MatchingOrchestrator, PromptMatcher};
pub use retry::RetryPolicy;
