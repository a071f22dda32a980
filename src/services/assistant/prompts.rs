//! Prompt templates for the generative flows.

use crate::models::Profile;

pub const SUMMARY_SYSTEM: &str = "You are a study group assistant. Summarize group chat \
conversations concisely, keeping the key points, open questions, and decisions. \
Reply with a JSON object that matches the requested schema.";

pub const SUGGESTION_SYSTEM: &str = "You are a study assistant. Give actionable study \
suggestions for the topic: practice problems, key concepts to review, or reputable \
external resources. Only include links you are confident exist, as absolute https URLs. \
Reply with a JSON object that matches the requested schema.";

pub const GROUP_MATCH_SYSTEM: &str = "You match students to existing study groups. \
Only suggest group names that appear in the provided list, exactly as written. \
If none fit, return an empty list and suggest creating a new group in the reasoning. \
Reply with a JSON object that matches the requested schema.";

pub fn summary_prompt(history: &[String]) -> String {
    format!(
        "Summarize this study group chat:\n\n{}",
        history.join("\n")
    )
}

pub fn suggestion_prompt(topic: &str, recent_history: &[String]) -> String {
    let mut prompt = format!("Topic: {}\n", topic);
    if !recent_history.is_empty() {
        prompt.push_str("\nRecent discussion:\n");
        prompt.push_str(&recent_history.join("\n"));
        prompt.push('\n');
    }
    prompt
}

pub fn group_match_prompt(profile: &Profile, group_names: &[String]) -> String {
    let tags = profile.tags();
    format!(
        "Student profile:\n\
         - Subjects: {}\n\
         - Skills: {}\n\
         - Availability: {}\n\
         - Tags: {}\n\n\
         Existing groups:\n{}",
        profile.subjects.join(", "),
        profile.skills.join(", "),
        profile.availability.render(),
        if tags.is_empty() {
            "none".to_string()
        } else {
            tags.join(", ")
        },
        group_names
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n")
    )
}
