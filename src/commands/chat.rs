//! Chat commands — the synchronous advisor exchange and transcript queries.
//!
//! Commands:
//! - `send_message`: persist the user turn, call the advisor, persist the
//!   reply (the call blocks until the API responds)
//! - `get_chat_history`: retained transcript for a child
//! - `get_chat_time_range`: first/last message timestamps
//! - `clear_chat_history`: wipe a child's conversation
//! - `get_prompt_suggestions`: contextual suggestions for an empty chat

use std::sync::Arc;

use tauri::State;

use crate::app_state::AppState;
use crate::chat::{self, ChatTimeRangeView, MessageView, PromptSuggestion};
use crate::db::repository::chat as chat_repo;

/// Send a message about a child and return the advisor's reply.
///
/// The user turn is stored first, the bounded window of prior turns goes
/// out with the templated system prompt, and an API failure is stored and
/// returned as a fallback reply rather than an error.
#[tauri::command]
pub fn send_message(
    child_name: String,
    text: String,
    state: State<'_, Arc<AppState>>,
) -> Result<MessageView, String> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err("Message is empty".to_string());
    }

    let conn = state.open_db().map_err(|e| e.to_string())?;
    let window = state.context_window();

    let backend = StateBackend {
        state: state.inner().as_ref(),
    };
    let reply = chat::run_exchange(&conn, &backend, &child_name, &text, window)
        .map_err(|e| e.to_string())?;

    Ok(reply.into())
}

/// The retained transcript for a child, oldest first.
#[tauri::command]
pub fn get_chat_history(
    child_name: String,
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<MessageView>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    let messages = chat_repo::chat_history(&conn, &child_name).map_err(|e| e.to_string())?;
    Ok(messages.into_iter().map(MessageView::from).collect())
}

/// First/last message timestamps, None with no conversation yet.
#[tauri::command]
pub fn get_chat_time_range(
    child_name: String,
    state: State<'_, Arc<AppState>>,
) -> Result<Option<ChatTimeRangeView>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    chat::time_range_view(&conn, &child_name).map_err(|e| e.to_string())
}

/// Wipe a child's conversation.
#[tauri::command]
pub fn clear_chat_history(
    child_name: String,
    state: State<'_, Arc<AppState>>,
) -> Result<bool, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    chat_repo::clear_chat_history(&conn, &child_name).map_err(|e| e.to_string())
}

/// Prompt suggestions based on the child's latest snapshot.
#[tauri::command]
pub fn get_prompt_suggestions(
    child_name: String,
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<PromptSuggestion>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    chat::get_contextual_suggestions(&conn, &child_name).map_err(|e| e.to_string())
}

/// Adapter so `run_exchange` can call through the shared advisor client.
struct StateBackend<'a> {
    state: &'a AppState,
}

impl crate::advisor::ChatBackend for StateBackend<'_> {
    fn complete(
        &self,
        messages: &[crate::advisor::ChatTurn],
    ) -> Result<String, crate::advisor::AdvisorError> {
        self.state.advisor_complete(messages)
    }
}
