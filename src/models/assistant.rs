//! Assistant Models
//!
//! Structured outputs of the chat assistant flows. Each type derives
//! `JsonSchema` so the schema sent to the model and the parser agree.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Summary of a chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatSummary {
    /// Concise summary of the key points, questions, and decisions.
    pub summary: String,
}

/// What kind of help a suggestion offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    PracticeProblems,
    KeyConcepts,
    ExternalResource,
    Mixed,
}

/// An external learning resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceLink {
    pub title: String,
    /// Absolute http(s) URL.
    pub url: String,
    pub description: String,
}

impl ResourceLink {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// An actionable study suggestion for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StudySuggestion {
    /// Study tips, practice problems, or concepts to review.
    pub suggestions: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub links: Vec<ResourceLink>,
}
