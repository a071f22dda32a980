//! In-Memory Store
//!
//! `ProfileStore` and `GroupStore` backed by process memory. Used by tests
//! and by hosts that keep their own persistence elsewhere.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{GroupStore, ProfileStore};
use crate::models::{Group, GroupEvent, NewGroup, Profile, ProfileUpdate};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, Profile>>,
    /// Creation order is listing order.
    groups: RwLock<Vec<Group>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_data(profiles: Vec<Profile>, groups: Vec<Group>) -> Self {
        Self {
            profiles: RwLock::new(profiles.into_iter().map(|p| (p.id.clone(), p)).collect()),
            groups: RwLock::new(groups),
        }
    }

    async fn modify_group<F>(&self, group_id: &str, change: F) -> AppResult<Group>
    where
        F: FnOnce(&mut Group) -> Result<(), String>,
    {
        let mut groups = self.groups.write().await;
        let group = groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| AppError::not_found(format!("group {}", group_id)))?;
        change(group).map_err(AppError::validation)?;
        Ok(group.clone())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: Profile) -> AppResult<Profile> {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> AppResult<Profile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| AppError::not_found(format!("profile {}", user_id)))?;
        profile.apply_update(update).map_err(AppError::validation)?;
        Ok(profile.clone())
    }
}

#[async_trait]
impl GroupStore for InMemoryStore {
    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        Ok(self.groups.read().await.clone())
    }

    async fn get_group(&self, group_id: &str) -> AppResult<Option<Group>> {
        Ok(self
            .groups
            .read()
            .await
            .iter()
            .find(|g| g.id == group_id)
            .cloned())
    }

    async fn create_group(&self, owner_id: &str, new_group: NewGroup) -> AppResult<Group> {
        let group = Group::create(owner_id, new_group).map_err(AppError::validation)?;
        tracing::debug!(group_id = %group.id, owner_id, "group created");
        self.groups.write().await.push(group.clone());
        Ok(group)
    }

    async fn join_group(&self, group_id: &str, user_id: &str) -> AppResult<Group> {
        self.modify_group(group_id, |group| {
            group.join(user_id);
            Ok(())
        })
        .await
    }

    async fn leave_group(&self, group_id: &str, user_id: &str) -> AppResult<Group> {
        self.modify_group(group_id, |group| group.leave(user_id).map(|_| ()))
            .await
    }

    async fn add_event(&self, group_id: &str, event: GroupEvent) -> AppResult<Group> {
        self.modify_group(group_id, |group| group.add_event(event))
            .await
    }
}
