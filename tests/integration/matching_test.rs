//! Group Matching Integration Tests
//!
//! Runs the matching service end to end over the in-memory store with
//! deterministic embedders.

use std::sync::Arc;

use studylink::models::{Availability, NewGroup, Profile};
use studylink::services::embedding::EmbeddingError;
use studylink::services::matching::{
    GroupMatchingService, MatchingConfig, MatchingError, MatchingOrchestrator,
    FALLBACK_REASONING, MATCHES_FOUND_REASONING,
};
use studylink::services::retry::RetryPolicy;
use studylink::storage::{GroupStore, InMemoryStore, ProfileStore};
use studylink::{AppConfig, AppError, AppState};

use crate::mock_providers::{FixedLlm, KeywordEmbedder};

// ============================================================================
// Fixtures
// ============================================================================

async fn calc_and_art_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store
        .upsert_profile(
            Profile::new("u-1", "Asha")
                .with_subjects(["Calculus"])
                .with_skills(["Python"])
                .with_availability(Availability::Text("evenings".to_string())),
        )
        .await
        .unwrap();
    for (name, subject, description) in [
        ("Calc Crew", "Mathematics", "Weekly problem sessions"),
        ("Art Club", "Art", "Sketching and painting"),
    ] {
        store
            .create_group(
                "owner",
                NewGroup {
                    name: name.to_string(),
                    subject: subject.to_string(),
                    description: description.to_string(),
                    tags: Vec::new(),
                },
            )
            .await
            .unwrap();
    }
    store
}

fn service(store: Arc<InMemoryStore>, embedder: Arc<KeywordEmbedder>) -> GroupMatchingService {
    let orchestrator = MatchingOrchestrator::new(
        embedder,
        &MatchingConfig::default(),
        RetryPolicy::no_retry(),
    );
    GroupMatchingService::new(store.clone(), store, orchestrator, 3)
}

fn embedder_with_art(art: Vec<f32>) -> Arc<KeywordEmbedder> {
    Arc::new(KeywordEmbedder::new(
        vec![
            ("Student", vec![1.0, 0.0]),
            ("Calc Crew", vec![0.9, 0.1]),
            ("Art Club", art),
        ],
        vec![0.0, 0.0],
    ))
}

// ============================================================================
// Ranking scenarios
// ============================================================================

#[tokio::test]
async fn test_both_positive_matches_ranked() {
    let store = calc_and_art_store().await;
    let embedder = embedder_with_art(vec![0.2, 0.8]);
    let outcome = service(store, embedder.clone())
        .suggest_for_user("u-1")
        .await
        .unwrap();

    assert!(!outcome.degraded);
    assert_eq!(
        outcome.recommendation.suggested_groups,
        vec!["Calc Crew", "Art Club"]
    );
    assert_eq!(outcome.recommendation.reasoning, MATCHES_FOUND_REASONING);
    assert_eq!(embedder.total_calls(), 2);
}

#[tokio::test]
async fn test_negative_match_excluded() {
    let store = calc_and_art_store().await;
    let outcome = service(store, embedder_with_art(vec![-0.3, 0.5]))
        .suggest_for_user("u-1")
        .await
        .unwrap();
    assert_eq!(outcome.recommendation.suggested_groups, vec!["Calc Crew"]);
}

#[tokio::test]
async fn test_zero_groups_exact_result() {
    let store = Arc::new(InMemoryStore::new());
    store
        .upsert_profile(Profile::new("u-1", "Asha").with_subjects(["Calculus"]))
        .await
        .unwrap();
    let embedder = embedder_with_art(vec![0.2, 0.8]);
    let outcome = service(store, embedder.clone())
        .suggest_for_user("u-1")
        .await
        .unwrap();

    let json = serde_json::to_string(&outcome.recommendation).unwrap();
    assert_eq!(
        json,
        r#"{"suggestedGroups":[],"reasoning":"No groups available to recommend."}"#
    );
    assert_eq!(embedder.total_calls(), 0);
}

#[tokio::test]
async fn test_profile_without_subjects_makes_no_embedding_call() {
    let store = calc_and_art_store().await;
    store
        .upsert_profile(Profile::new("u-2", "Ravi").with_skills(["Drawing"]))
        .await
        .unwrap();
    let embedder = embedder_with_art(vec![0.2, 0.8]);
    let outcome = service(store, embedder.clone())
        .suggest_for_user("u-2")
        .await
        .unwrap();
    assert!(outcome.recommendation.suggested_groups.is_empty());
    assert_eq!(embedder.total_calls(), 0);
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn test_unavailable_embedder_degrades_to_unranked_list() {
    let store = calc_and_art_store().await;
    let embedder = Arc::new(KeywordEmbedder::failing(EmbeddingError::ProviderUnavailable {
        message: "connection refused".to_string(),
    }));
    let outcome = service(store, embedder)
        .suggest_for_user("u-1")
        .await
        .unwrap();
    assert!(outcome.degraded);
    assert_eq!(
        outcome.recommendation.suggested_groups,
        vec!["Calc Crew", "Art Club"]
    );
    assert_eq!(outcome.recommendation.reasoning, FALLBACK_REASONING);
}

#[tokio::test]
async fn test_dimension_mismatch_is_not_hidden() {
    let store = calc_and_art_store().await;
    let embedder = Arc::new(KeywordEmbedder::new(
        vec![("Student", vec![1.0, 0.0, 0.0])],
        vec![1.0, 0.0],
    ));
    let err = service(store, embedder)
        .suggest_for_user("u-1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Matching(MatchingError::MalformedResponse { .. })
    ));
}

// ============================================================================
// Wiring through AppState
// ============================================================================

#[tokio::test]
async fn test_app_state_wires_matching_and_prompt_matcher() {
    let store = calc_and_art_store().await;
    let llm = Arc::new(FixedLlm::replying(
        r#"{"suggestedGroups":["Calc Crew"],"reasoning":"Calculus overlap."}"#,
    ));
    let state = AppState::with_providers(
        &AppConfig::default(),
        embedder_with_art(vec![0.2, 0.8]),
        llm.clone(),
        store.clone(),
        store.clone(),
    );

    let outcome = state.matching.suggest_for_user("u-1").await.unwrap();
    assert_eq!(outcome.recommendation.suggested_groups[0], "Calc Crew");

    let profile = store.get_profile("u-1").await.unwrap().unwrap();
    let names: Vec<String> = store
        .list_groups()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    let rec = state.prompt_matcher.suggest(&profile, &names).await.unwrap();
    assert_eq!(rec.suggested_groups, vec!["Calc Crew"]);
    assert_eq!(llm.call_count(), 1);
    assert!(llm.prompts.lock().unwrap()[0].contains("- Art Club"));
}
