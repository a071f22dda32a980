//! StudyLink LLM
//!
//! Provides a unified interface for the generative calls behind the study
//! assistant flows and the prompt-based group matcher:
//! - OpenAI and OpenAI-compatible chat completion APIs
//! - Ollama (local inference)
//!
//! Also includes the HTTP client factory shared with the embedding providers.

pub mod http_client;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{create_provider, LlmProvider};
pub use types::*;
