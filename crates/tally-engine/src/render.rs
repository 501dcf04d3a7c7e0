//! User-facing text rendering
//!
//! Turns service results and domain errors into the messages posted back to
//! the channel. The engine itself has no wire format of its own; this is
//! the whole presentation layer.

use tally_core::{DomainError, LeaderboardEntry, UserId};

use crate::services::TallyReport;

/// The divider message posted by `/divide`
pub const DIVIDER_MESSAGE: &str = "➡➡➡ DIVIDER 🔶 DIVIDER 🔵 DIVIDER 🔶 DIVIDER ⬅⬅⬅";

const PLACE_LABELS: [&str; 3] = ["first", "second", "third"];

fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

fn pluralize<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Render a tally report
pub fn tally_report(report: &TallyReport) -> String {
    if report.candidates.is_empty() {
        return "No posts with reactions since the divider.".to_string();
    }

    let lines: Vec<String> = report
        .candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let link = candidate.permalink.as_deref().unwrap_or("");
            format!(
                "{}. <{}|Post> by {}: *{}* {}",
                i + 1,
                link,
                mention(&candidate.author_id),
                candidate.engagement_count,
                pluralize(candidate.engagement_count, "reaction", "reactions"),
            )
        })
        .collect();

    let heading = if report.has_surplus() {
        "Top 10 posts"
    } else {
        "Tally of posts"
    };

    format!("📊 {} since the divider:\n{}", heading, lines.join("\n"))
}

/// Render an award announcement
pub fn award_announcement(places: &[Vec<UserId>]) -> String {
    if places.len() == 1 && places[0].len() == 1 {
        return format!("🎉 The winner is {}", mention(&places[0][0]));
    }

    let listed = places
        .iter()
        .enumerate()
        .map(|(i, users)| {
            let mentions: Vec<String> = users.iter().map(|u| mention(u)).collect();
            format!("{} ({})", mentions.join(", "), PLACE_LABELS[i.min(2)])
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("🎉 The winners are: {listed}")
}

/// Render the leaderboard
pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No winners awarded yet.".to_string();
    }

    let mut lines = vec!["🏆 Leaderboard 🏆".to_string()];
    lines.extend(entries.iter().enumerate().map(|(i, entry)| {
        let c = entry.counts;
        format!(
            "{}. {}: *{}* {}, *{}* {}, *{}* {}",
            i + 1,
            mention(&entry.user_id),
            c.firsts,
            pluralize(c.firsts as usize, "first", "firsts"),
            c.seconds,
            pluralize(c.seconds as usize, "second", "seconds"),
            c.thirds,
            pluralize(c.thirds as usize, "third", "thirds"),
        )
    }));

    lines.join("\n")
}

/// Confirmation for a freshly posted divider
pub fn divider_saved() -> String {
    "✂ Divider saved. `/tally` now counts from here.".to_string()
}

/// Render a domain error as a friendly in-channel message
pub fn error_message(error: &DomainError) -> String {
    match error {
        DomainError::ApiError(reason) => {
            format!("⚠ Slack API request failed. Error: {reason}")
        }
        DomainError::NoSavedBoundary(_) | DomainError::StartBoundaryNotFound(_) => {
            "⚠ No divider found. If you have a manually created divider message, \
             type `/tally <message link>` to use that message as the divider."
                .to_string()
        }
        DomainError::ExplicitBoundaryNotFound => {
            "⚠ Given divider message not found. Check the message link and try again.".to_string()
        }
        DomainError::NoAwardee => {
            "⚠ No one to award. Mention the winners, or run `/award` with no text \
             to award the current tally."
                .to_string()
        }
        DomainError::AwarderRestricted(user_id) => {
            format!(
                "I'm sorry {}, but I'm afraid I can't let you do that.",
                mention(user_id)
            )
        }
        DomainError::StorageError(_) => {
            "⚠ An unexpected error occured. Please try again.".to_string()
        }
    }
}
