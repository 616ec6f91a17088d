//! Chat interface — view types, derived queries, and the advisor exchange.
//!
//! Builds on top of:
//! - `models::ChatMessage` (data struct)
//! - `db::repository::chat` (low-level insert/query with cap eviction)
//! - `advisor` (prompt, window assembly, chat-completion client)
//!
//! This module adds:
//! - Frontend-specific types (MessageView, ChatTimeRangeView, suggestions)
//! - The synchronous send flow: persist the user turn, call the API with a
//!   bounded window, persist the reply (fallback text on failure)

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::advisor::{build_system_prompt, build_window, ChatBackend};
use crate::db::repository::{self, chat as chat_repo};
use crate::db::DatabaseError;
use crate::models::enums::ChatRole;
use crate::models::ChatMessage;

// ═══════════════════════════════════════════
// Frontend-facing types
// ═══════════════════════════════════════════

/// Chat message as displayed in the transcript widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i64,
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

impl From<ChatMessage> for MessageView {
    fn from(m: ChatMessage) -> Self {
        MessageView {
            id: m.id,
            role: m.role.as_str().to_string(),
            content: m.content,
            timestamp: m.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// First/last message timestamps for the header label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTimeRangeView {
    pub first: String,
    pub last: String,
}

/// Prompt suggestion for an empty conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSuggestion {
    pub text: String,
    pub category: String,
}

// ═══════════════════════════════════════════
// Advisor exchange
// ═══════════════════════════════════════════

/// Fallback reply recorded when the advisor call fails. The error is kept
/// in the transcript so the parent sees why there was no answer.
fn failure_reply(error: &impl std::fmt::Display) -> String {
    format!("The advisor could not answer right now: {error}. Please try again later.")
}

/// Run one synchronous advisor exchange for a child.
///
/// Flow (the call blocks until the API responds):
/// 1. Persist the user turn (cap eviction applies)
/// 2. Interpolate the latest snapshot into the system prompt
/// 3. Send the bounded window of prior turns plus the new message
/// 4. Persist and return the reply (a fallback string when the call fails)
pub fn run_exchange(
    conn: &Connection,
    backend: &dyn ChatBackend,
    child_name: &str,
    text: &str,
    window: usize,
) -> Result<ChatMessage, DatabaseError> {
    let latest = repository::latest_snapshot(conn, child_name)?;
    let system_prompt = build_system_prompt(latest.as_ref());

    // Window of turns before this message
    let history = chat_repo::recent_history(conn, child_name, window.saturating_sub(1))?;

    chat_repo::append_message(conn, child_name, ChatRole::User, text)?;

    let turns = build_window(&system_prompt, &history, text, window);
    let reply = match backend.complete(&turns) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Advisor request failed for {child_name}: {e}");
            failure_reply(&e)
        }
    };

    let reply_id = chat_repo::append_message(conn, child_name, ChatRole::Assistant, &reply)?;
    let history = chat_repo::chat_history(conn, child_name)?;
    history
        .into_iter()
        .rev()
        .find(|m| m.id == reply_id)
        .ok_or(DatabaseError::NotFound {
            entity_type: "ChatMessage".into(),
            id: reply_id.to_string(),
        })
}

// ═══════════════════════════════════════════
// Prompt suggestions
// ═══════════════════════════════════════════

/// Default prompt suggestions for an empty conversation.
pub fn default_prompt_suggestions() -> Vec<PromptSuggestion> {
    vec![
        PromptSuggestion {
            text: "What should a day of meals look like at this age?".into(),
            category: "meals".into(),
        },
        PromptSuggestion {
            text: "Is the current milk intake about right?".into(),
            category: "feeding".into(),
        },
        PromptSuggestion {
            text: "Which new foods are safe to introduce now?".into(),
            category: "solids".into(),
        },
        PromptSuggestion {
            text: "How can we encourage self-feeding?".into(),
            category: "habits".into(),
        },
        PromptSuggestion {
            text: "What does the latest growth measurement suggest?".into(),
            category: "growth".into(),
        },
    ]
}

/// Suggestions contextual to the child's latest snapshot. Generic defaults
/// are swapped out when the profile has something more specific to ask.
pub fn get_contextual_suggestions(
    conn: &Connection,
    child_name: &str,
) -> Result<Vec<PromptSuggestion>, DatabaseError> {
    let mut suggestions = default_prompt_suggestions();
    let Some(profile) = repository::latest_snapshot(conn, child_name)? else {
        return Ok(suggestions);
    };

    if profile
        .allergies
        .as_deref()
        .is_some_and(|a| !a.trim().is_empty())
    {
        suggestions[2] = PromptSuggestion {
            text: "Which snacks are safe given the known allergies?".into(),
            category: "allergies".into(),
        };
    }
    if profile
        .disliked_foods
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty())
    {
        suggestions[3] = PromptSuggestion {
            text: "How can we work around the foods the child refuses?".into(),
            category: "habits".into(),
        };
    }

    Ok(suggestions)
}

// ═══════════════════════════════════════════
// Derived queries
// ═══════════════════════════════════════════

/// Time range of the retained conversation, formatted for the header.
pub fn time_range_view(
    conn: &Connection,
    child_name: &str,
) -> Result<Option<ChatTimeRangeView>, DatabaseError> {
    let range = chat_repo::chat_time_range(conn, child_name)?;
    Ok(range.map(|(first, last)| ChatTimeRangeView {
        first: first.format("%Y-%m-%d %H:%M:%S").to_string(),
        last: last.format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
