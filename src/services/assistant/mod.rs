//! Chat Assistant
//!
//! Stateless generative flows used inside group workspaces: chat
//! summaries and study suggestions, plus the curated resource catalog.

pub mod error;
pub mod prompts;
pub mod resources;
pub mod structured;
pub mod suggestions;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AssistantError;
pub use resources::resources_for_topic;
pub use structured::{parse_structured, response_format_for};
pub use suggestions::StudySuggestionGenerator;
pub use summarizer::ChatSummarizer;
