//! Store Seams
//!
//! Persistence traits for profiles and groups. Services receive these as
//! `Arc<dyn ...>` handles; the backing store is chosen by the caller.

use async_trait::async_trait;

use crate::models::{Group, GroupEvent, NewGroup, Profile, ProfileUpdate};
use crate::utils::error::AppResult;

/// Profile persistence
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile, `None` when the user has none yet.
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<Profile>>;

    /// Insert or replace a whole profile.
    async fn upsert_profile(&self, profile: Profile) -> AppResult<Profile>;

    /// Apply a partial update. `NotFound` if the profile does not exist.
    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> AppResult<Profile>;
}

/// Group persistence
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// All groups in creation order.
    async fn list_groups(&self) -> AppResult<Vec<Group>>;

    async fn get_group(&self, group_id: &str) -> AppResult<Option<Group>>;

    /// Create a group owned (and joined) by `owner_id`.
    async fn create_group(&self, owner_id: &str, new_group: NewGroup) -> AppResult<Group>;

    /// Add a member. Joining twice is a no-op.
    async fn join_group(&self, group_id: &str, user_id: &str) -> AppResult<Group>;

    /// Remove a member. Leaving as a non-member is a no-op; the owner
    /// cannot leave.
    async fn leave_group(&self, group_id: &str, user_id: &str) -> AppResult<Group>;

    async fn add_event(&self, group_id: &str, event: GroupEvent) -> AppResult<Group>;
}
