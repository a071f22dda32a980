//! StudyLink Core Library
//!
//! Non-UI core of StudyLink:
//! - Embedding-based profile-to-group matching with an unranked fallback
//! - Prompt-based group matching
//! - Chat summaries and study suggestions
//! - Profile/group store seams and JSON configuration

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::settings::{AppConfig, SettingsUpdate};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
