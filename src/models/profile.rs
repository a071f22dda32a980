//! Profile Models
//!
//! Student profile data used as the matching input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum length of a display name, in characters.
pub const MIN_NAME_LEN: usize = 2;

/// A fixed availability slot picked during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilitySlot {
    WeekdayMornings,
    WeekdayAfternoons,
    WeekdayEvenings,
    WeekendMornings,
    WeekendAfternoons,
    WeekendEvenings,
    LateNight,
    Flexible,
}

impl AvailabilitySlot {
    /// Human-readable label used when the slot is rendered into text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WeekdayMornings => "Weekday Mornings",
            Self::WeekdayAfternoons => "Weekday Afternoons",
            Self::WeekdayEvenings => "Weekday Evenings",
            Self::WeekendMornings => "Weekend Mornings",
            Self::WeekendAfternoons => "Weekend Afternoons",
            Self::WeekendEvenings => "Weekend Evenings",
            Self::LateNight => "Late Night Study",
            Self::Flexible => "Flexible Schedule",
        }
    }

    /// snake_case storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::WeekdayMornings => "weekday_mornings",
            Self::WeekdayAfternoons => "weekday_afternoons",
            Self::WeekdayEvenings => "weekday_evenings",
            Self::WeekendMornings => "weekend_mornings",
            Self::WeekendAfternoons => "weekend_afternoons",
            Self::WeekendEvenings => "weekend_evenings",
            Self::LateNight => "late_night",
            Self::Flexible => "flexible",
        }
    }

    /// Every slot, in onboarding order.
    pub fn all() -> &'static [AvailabilitySlot] {
        &[
            Self::WeekdayMornings,
            Self::WeekdayAfternoons,
            Self::WeekdayEvenings,
            Self::WeekendMornings,
            Self::WeekendAfternoons,
            Self::WeekendEvenings,
            Self::LateNight,
            Self::Flexible,
        ]
    }

    /// Recognize a stored entry, either the label or the snake_case key.
    pub fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        Self::all().iter().copied().find(|slot| {
            slot.label().eq_ignore_ascii_case(entry) || slot.key() == entry
        })
    }
}

/// When a student can study.
///
/// Older profiles carry free-form text; onboarding stores a set of entries,
/// usually slot labels ("Weekday Evenings") but any text is kept as-is.
/// Both forms render to one string for prompts and embeddings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Availability {
    Slots(Vec<String>),
    Text(String),
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Text(String::new())
    }
}

impl Availability {
    /// Render as a single line of text.
    pub fn render(&self) -> String {
        match self {
            Availability::Text(text) => text.trim().to_string(),
            Availability::Slots(entries) => entries
                .iter()
                .map(|entry| match AvailabilitySlot::parse(entry) {
                    Some(slot) => slot.label(),
                    None => entry.trim(),
                })
                .filter(|entry| !entry.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Slot set stored by label.
    pub fn from_slots(slots: &[AvailabilitySlot]) -> Self {
        Availability::Slots(slots.iter().map(|s| s.label().to_string()).collect())
    }

    /// Parse the comma-separated availability field of a profile form.
    pub fn from_form(input: &str) -> Self {
        Availability::Slots(parse_list(input))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Availability::Text(text) => text.trim().is_empty(),
            Availability::Slots(entries) => entries.iter().all(|e| e.trim().is_empty()),
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// A student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Opaque identifier issued by the identity provider.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
    /// Exams the student is preparing for, e.g. "GATE" or "SAT".
    #[serde(default)]
    pub exam_tags: Vec<String>,
    #[serde(default)]
    pub skill_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create an empty profile at account creation.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            subjects: Vec::new(),
            skills: Vec::new(),
            availability: Availability::default(),
            exam_tags: Vec::new(),
            skill_tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// All tags (exam tags first, then skill tags), without duplicates.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.exam_tags.iter().chain(self.skill_tags.iter()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    /// Apply an owner-initiated partial update.
    pub fn apply_update(&mut self, update: ProfileUpdate) -> Result<(), String> {
        update.validate()?;

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(subjects) = update.subjects {
            self.subjects = clean_list(subjects);
        }
        if let Some(skills) = update.skills {
            self.skills = clean_list(skills);
        }
        if let Some(availability) = update.availability {
            self.availability = availability;
        }
        if let Some(exam_tags) = update.exam_tags {
            self.exam_tags = clean_list(exam_tags);
        }
        if let Some(skill_tags) = update.skill_tags {
            self.skill_tags = clean_list(skill_tags);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial profile update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub availability: Option<Availability>,
    pub exam_tags: Option<Vec<String>>,
    pub skill_tags: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().chars().count() < MIN_NAME_LEN {
                return Err(format!(
                    "name must be at least {} characters",
                    MIN_NAME_LEN
                ));
            }
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(format!("invalid email address: {}", email));
            }
        }
        Ok(())
    }
}

/// Split comma-separated form input into trimmed, non-empty entries.
pub fn parse_list(input: &str) -> Vec<String> {
    clean_list(input.split(',').map(str::to_string))
}

fn clean_list(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
