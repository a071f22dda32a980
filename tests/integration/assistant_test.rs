//! Chat Assistant Integration Tests

use std::sync::Arc;

use chrono::{Duration, Utc};
use studylink::models::{history_lines, ChatMessage, ChatMessageKind, ResourceType};
use studylink::services::assistant::{
    resources_for_topic, AssistantError, ChatSummarizer, StudySuggestionGenerator,
};
use studylink::services::retry::RetryPolicy;
use studylink_llm::LlmError;

use crate::mock_providers::FixedLlm;

fn message(sender: &str, text: &str, minutes: i64) -> ChatMessage {
    ChatMessage {
        id: format!("m-{}", minutes),
        group_id: "g-1".to_string(),
        sender_id: sender.to_lowercase(),
        sender_name: sender.to_string(),
        message: text.to_string(),
        timestamp: Utc::now() + Duration::minutes(minutes),
        kind: ChatMessageKind::Text,
    }
}

#[tokio::test]
async fn test_summarize_one_line_history() {
    let llm = Arc::new(FixedLlm::replying(
        r#"{"summary":"Asha wants to review limits on Friday."}"#,
    ));
    let summarizer = ChatSummarizer::new(llm.clone(), RetryPolicy::default());
    let history = history_lines(&[message("Asha", "Review limits on Friday?", 0)]);

    let summary = summarizer.summarize(&history).await.unwrap();
    assert!(!summary.summary.is_empty());
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_summarize_empty_history() {
    let llm = Arc::new(FixedLlm::replying(r#"{"summary":"unused"}"#));
    let summarizer = ChatSummarizer::new(llm.clone(), RetryPolicy::default());
    let err = summarizer.summarize(&[]).await.unwrap_err();
    assert!(matches!(err, AssistantError::EmptyHistory));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_summarize_gives_up_after_retry_budget() {
    let llm = Arc::new(FixedLlm::failing(LlmError::NetworkError {
        message: "timeout".to_string(),
    }));
    let summarizer = ChatSummarizer::new(llm.clone(), RetryPolicy::default());
    let err = summarizer
        .summarize(&["Ravi: hello".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::AssistantUnavailable { .. }));
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_suggestion_falls_back_to_catalog_links() {
    let llm = Arc::new(FixedLlm::replying(
        r#"{"suggestions":"Drill integration by parts.","resource_type":"practice_problems","links":[]}"#,
    ));
    let generator = StudySuggestionGenerator::new(llm, RetryPolicy::default());
    let suggestion = generator
        .suggest("calculus", &["Asha: integration is hard".to_string()])
        .await
        .unwrap();
    assert_eq!(suggestion.resource_type, ResourceType::PracticeProblems);
    assert_eq!(suggestion.links, resources_for_topic("calculus"));
}

#[tokio::test]
async fn test_suggestion_rejects_bad_link() {
    let llm = Arc::new(FixedLlm::replying(
        r#"{"suggestions":"See notes.","resource_type":"external_resource",
            "links":[{"title":"Notes","url":"ftp://example.org/notes","description":"notes"}]}"#,
    ));
    let generator = StudySuggestionGenerator::new(llm, RetryPolicy::default());
    let err = generator.suggest("Physics", &[]).await.unwrap_err();
    assert!(matches!(err, AssistantError::MalformedResponse { .. }));
}
