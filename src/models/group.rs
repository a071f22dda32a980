//! Group Models
//!
//! Study groups, their calendar events, and the reduced view used for
//! matching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum length of a group name, in characters.
pub const MIN_GROUP_NAME_LEN: usize = 3;

/// Kind of calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Study,
    Exam,
    Discussion,
    Project,
}

/// A scheduled session on a group's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl GroupEvent {
    pub fn new(
        title: impl Into<String>,
        date: DateTime<Utc>,
        duration_minutes: u32,
        kind: EventKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            date,
            duration_minutes,
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("event title must not be empty".to_string());
        }
        if self.duration_minutes == 0 {
            return Err("event duration must be at least 1 minute".to_string());
        }
        Ok(())
    }
}

/// Request to create a group
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewGroup {
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewGroup {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().chars().count() < MIN_GROUP_NAME_LEN {
            return Err(format!(
                "group name must be at least {} characters",
                MIN_GROUP_NAME_LEN
            ));
        }
        if self.subject.trim().is_empty() {
            return Err("subject is required".to_string());
        }
        Ok(())
    }
}

/// A study group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    /// Member ids in join order; no duplicates.
    pub member_ids: Vec<String>,
    pub owner_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub events: Vec<GroupEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a group owned (and joined) by `owner_id`.
    pub fn create(owner_id: impl Into<String>, new_group: NewGroup) -> Result<Self, String> {
        new_group.validate()?;
        let owner_id = owner_id.into();
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: new_group.name.trim().to_string(),
            subject: new_group.subject.trim().to_string(),
            description: new_group.description.trim().to_string(),
            member_ids: vec![owner_id.clone()],
            owner_id,
            tags: new_group.tags,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    /// Add a member. Returns `false` if already a member.
    pub fn join(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.member_ids.push(user_id.to_string());
        self.updated_at = Utc::now();
        true
    }

    /// Remove a member. Returns `Ok(false)` if the user was not a member.
    ///
    /// The owner cannot leave their own group.
    pub fn leave(&mut self, user_id: &str) -> Result<bool, String> {
        if user_id == self.owner_id {
            return Err(format!(
                "owner {} cannot leave group {}",
                user_id, self.id
            ));
        }
        let before = self.member_ids.len();
        self.member_ids.retain(|id| id != user_id);
        let removed = self.member_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        Ok(removed)
    }

    /// Add an event, keeping the calendar sorted by date.
    pub fn add_event(&mut self, event: GroupEvent) -> Result<(), String> {
        event.validate()?;
        let pos = self.events.partition_point(|e| e.date <= event.date);
        self.events.insert(pos, event);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Events starting at or after `now`, earliest first.
    pub fn upcoming_events(&self, now: DateTime<Utc>) -> impl Iterator<Item = &GroupEvent> {
        self.events.iter().filter(move |e| e.date >= now)
    }

    pub fn to_document(&self) -> GroupDocument {
        GroupDocument {
            name: self.name.clone(),
            subject: self.subject.clone(),
            description: self.description.clone(),
        }
    }
}

/// The part of a group that takes part in similarity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDocument {
    pub name: String,
    pub subject: String,
    pub description: String,
}

impl GroupDocument {
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            description: description.into(),
        }
    }
}
