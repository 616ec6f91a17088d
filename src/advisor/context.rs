use crate::models::enums::ChatRole;
use crate::models::ChatMessage;

use super::client::ChatTurn;

/// Smallest and largest accepted send-window sizes. The window counts the
/// new user message, so 1 means "no history".
pub const MIN_CONTEXT_WINDOW: usize = 1;
pub const MAX_CONTEXT_WINDOW: usize = 20;

pub fn clamp_window(limit: usize) -> usize {
    limit.clamp(MIN_CONTEXT_WINDOW, MAX_CONTEXT_WINDOW)
}

/// Assemble the message list for one advisor call: system prompt, then the
/// most recent stored turns that fit the window, then the new user message.
pub fn build_window(
    system_prompt: &str,
    history: &[ChatMessage],
    user_message: &str,
    limit: usize,
) -> Vec<ChatTurn> {
    let limit = clamp_window(limit);
    let history_slots = limit - 1;

    let mut turns = Vec::with_capacity(history_slots + 2);
    turns.push(ChatTurn::system(system_prompt));

    let skip = history.len().saturating_sub(history_slots);
    for msg in &history[skip..] {
        turns.push(match msg.role {
            ChatRole::User => ChatTurn::user(&*msg.content),
            ChatRole::Assistant => ChatTurn::assistant(&*msg.content),
        });
    }

    turns.push(ChatTurn::user(user_message));
    turns
}
