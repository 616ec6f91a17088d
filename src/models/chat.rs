use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::ChatRole;

/// One stored chat turn, attached to a child by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub child_name: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: NaiveDateTime,
}
