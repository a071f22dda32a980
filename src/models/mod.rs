//! Data Models
//!
//! Plain data shared by the services and stores.

pub mod assistant;
pub mod chat;
pub mod group;
pub mod matching;
pub mod profile;
pub mod settings;

pub use assistant::*;
pub use chat::*;
pub use group::*;
pub use matching::*;
pub use profile::*;
pub use settings::*;
