use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::ChatRole;
use crate::models::ChatMessage;

/// Maximum chat turns retained per child. Inserting past the cap evicts the
/// oldest rows first.
pub const CHAT_RETENTION_CAP: usize = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append a message for a child, evicting the oldest rows when the
/// retention cap would be exceeded. Returns the new row id.
pub fn append_message(
    conn: &Connection,
    child_name: &str,
    role: ChatRole,
    content: &str,
) -> Result<i64, DatabaseError> {
    append_message_at(conn, child_name, role, content, Local::now().naive_local())
}

/// Append with a caller-supplied timestamp.
pub fn append_message_at(
    conn: &Connection,
    child_name: &str,
    role: ChatRole,
    content: &str,
    timestamp: NaiveDateTime,
) -> Result<i64, DatabaseError> {
    let count = message_count(conn, child_name)?;

    // Bounded queue: same-second inserts are disambiguated by id.
    if count >= CHAT_RETENTION_CAP {
        let excess = count - CHAT_RETENTION_CAP + 1;
        conn.execute(
            "DELETE FROM chat_messages
             WHERE child_name = ?1 AND id IN (
                SELECT id FROM chat_messages
                WHERE child_name = ?1
                ORDER BY timestamp ASC, id ASC
                LIMIT ?2
             )",
            params![child_name, excess as i64],
        )?;
    }

    conn.execute(
        "INSERT INTO chat_messages (child_name, role, content, timestamp)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            child_name,
            role.as_str(),
            content,
            timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All retained messages for a child in chronological order.
pub fn chat_history(conn: &Connection, child_name: &str) -> Result<Vec<ChatMessage>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, child_name, role, content, timestamp
         FROM chat_messages
         WHERE child_name = ?1
         ORDER BY timestamp ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![child_name], |row| {
        Ok(MessageRow {
            id: row.get(0)?,
            child_name: row.get(1)?,
            role: row.get(2)?,
            content: row.get(3)?,
            timestamp: row.get(4)?,
        })
    })?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(message_from_row(row?)?);
    }
    Ok(messages)
}

/// The most recent `limit` messages for a child, still in chronological
/// order. This is the window handed to the advisor.
pub fn recent_history(
    conn: &Connection,
    child_name: &str,
    limit: usize,
) -> Result<Vec<ChatMessage>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, child_name, role, content, timestamp FROM (
            SELECT id, child_name, role, content, timestamp
            FROM chat_messages
            WHERE child_name = ?1
            ORDER BY timestamp DESC, id DESC
            LIMIT ?2
         )
         ORDER BY timestamp ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![child_name, limit as i64], |row| {
        Ok(MessageRow {
            id: row.get(0)?,
            child_name: row.get(1)?,
            role: row.get(2)?,
            content: row.get(3)?,
            timestamp: row.get(4)?,
        })
    })?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(message_from_row(row?)?);
    }
    Ok(messages)
}

/// First and last message timestamps for a child, or None with no messages.
pub fn chat_time_range(
    conn: &Connection,
    child_name: &str,
) -> Result<Option<(NaiveDateTime, NaiveDateTime)>, DatabaseError> {
    let (min, max): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(timestamp), MAX(timestamp)
         FROM chat_messages
         WHERE child_name = ?1",
        params![child_name],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    match (min, max) {
        (Some(min), Some(max)) => Ok(Some((parse_timestamp(&min), parse_timestamp(&max)))),
        _ => Ok(None),
    }
}

/// Delete every message for a child. Returns false when there was nothing.
pub fn clear_chat_history(conn: &Connection, child_name: &str) -> Result<bool, DatabaseError> {
    let rows_affected = conn.execute(
        "DELETE FROM chat_messages WHERE child_name = ?1",
        params![child_name],
    )?;
    Ok(rows_affected > 0)
}

/// Number of retained messages for a child.
pub fn message_count(conn: &Connection, child_name: &str) -> Result<usize, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM chat_messages WHERE child_name = ?1",
        params![child_name],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

struct MessageRow {
    id: i64,
    child_name: String,
    role: String,
    content: String,
    timestamp: String,
}

fn message_from_row(row: MessageRow) -> Result<ChatMessage, DatabaseError> {
    Ok(ChatMessage {
        id: row.id,
        child_name: row.child_name,
        role: ChatRole::from_str(&row.role)?,
        content: row.content,
        timestamp: parse_timestamp(&row.timestamp),
    })
}

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap_or_default()
}
