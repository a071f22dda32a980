//! StudyLink Core
//!
//! Foundational error and transport types shared by the StudyLink workspace.
//! This crate has no dependencies on provider SDKs, HTTP clients, or the
//! async runtime.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `transport` - HTTP transport settings (timeouts, proxy) shared by
//!   embedding and generative providers

pub mod error;
pub mod transport;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Transport Types ────────────────────────────────────────────────────
pub use transport::{ProxyConfig, ProxyProtocol, TransportConfig};
