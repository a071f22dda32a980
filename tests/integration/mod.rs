//! Integration Tests Module
//!
//! End-to-end tests for group matching and the chat assistant flows,
//! driven by deterministic providers.

mod mock_providers;

// Matching service, orchestrator and prompt matcher
mod matching_test;

// Summaries and study suggestions
mod assistant_test;
