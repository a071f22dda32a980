//! Query and document text for embedding.
//!
//! The wording is fixed so identical inputs always embed identically.

use crate::models::{GroupDocument, Profile};

/// The profile fields that take part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchQuery {
    pub subjects: Vec<String>,
    pub skills: Vec<String>,
    pub availability: String,
}

impl MatchQuery {
    pub fn new(subjects: Vec<String>, skills: Vec<String>, availability: impl Into<String>) -> Self {
        Self {
            subjects,
            skills,
            availability: availability.into(),
        }
    }

    /// True when no subject carries any text.
    pub fn has_no_subjects(&self) -> bool {
        self.subjects.iter().all(|s| s.trim().is_empty())
    }
}

impl From<&Profile> for MatchQuery {
    fn from(profile: &Profile) -> Self {
        Self {
            subjects: profile.subjects.clone(),
            skills: profile.skills.clone(),
            availability: profile.availability.render(),
        }
    }
}

/// Text embedded for the student.
pub fn query_text(query: &MatchQuery) -> String {
    format!(
        "Student interested in subjects: {}. Skills: {}. Availability: {}.",
        query.subjects.join(", "),
        query.skills.join(", "),
        query.availability
    )
}

/// Text embedded for one candidate group.
pub fn document_text(document: &GroupDocument) -> String {
    format!(
        "{}: {}. {}",
        document.name, document.subject, document.description
    )
}
