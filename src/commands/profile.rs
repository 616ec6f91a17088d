//! Profile commands — snapshot CRUD and history for the form screens.

use std::sync::Arc;

use tauri::State;

use crate::app_state::AppState;
use crate::db::repository;
use crate::models::{InfantProfile, ProfileDraft};

/// Distinct child names for the selector dropdown.
#[tauri::command]
pub fn list_children(state: State<'_, Arc<AppState>>) -> Result<Vec<String>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    repository::list_child_names(&conn).map_err(|e| e.to_string())
}

/// One snapshot by id.
#[tauri::command]
pub fn get_profile(
    id: i64,
    state: State<'_, Arc<AppState>>,
) -> Result<Option<InfantProfile>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    repository::get_snapshot(&conn, id).map_err(|e| e.to_string())
}

/// The most recent snapshot for a child (profile card + advisor prompt).
#[tauri::command]
pub fn get_latest_profile(
    child_name: String,
    state: State<'_, Arc<AppState>>,
) -> Result<Option<InfantProfile>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    repository::latest_snapshot(&conn, &child_name).map_err(|e| e.to_string())
}

/// Every snapshot for a child, newest first.
#[tauri::command]
pub fn get_profile_history(
    child_name: String,
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<InfantProfile>, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    repository::snapshot_history(&conn, &child_name).map_err(|e| e.to_string())
}

/// Save the form as a new dated snapshot. Returns the new snapshot id.
#[tauri::command]
pub fn save_profile(draft: ProfileDraft, state: State<'_, Arc<AppState>>) -> Result<i64, String> {
    draft.validate().map_err(|e| e.to_string())?;

    let conn = state.open_db().map_err(|e| e.to_string())?;
    let id = repository::insert_snapshot(&conn, &draft).map_err(|e| e.to_string())?;
    tracing::info!("Saved snapshot {id} for {}", draft.normalized_name());
    Ok(id)
}

/// Overwrite an existing snapshot with the resubmitted form.
#[tauri::command]
pub fn update_profile(
    id: i64,
    draft: ProfileDraft,
    state: State<'_, Arc<AppState>>,
) -> Result<bool, String> {
    draft.validate().map_err(|e| e.to_string())?;

    let conn = state.open_db().map_err(|e| e.to_string())?;
    let updated = repository::update_snapshot(&conn, id, &draft).map_err(|e| e.to_string())?;
    if !updated {
        return Err(format!("Snapshot {id} no longer exists"));
    }
    Ok(true)
}

/// Delete one snapshot (chat history goes with the child).
#[tauri::command]
pub fn delete_profile(id: i64, state: State<'_, Arc<AppState>>) -> Result<bool, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    repository::delete_snapshot(&conn, id).map_err(|e| e.to_string())
}

/// Delete a child entirely — all snapshots and all chat messages.
#[tauri::command]
pub fn delete_child(child_name: String, state: State<'_, Arc<AppState>>) -> Result<bool, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    let deleted = repository::delete_child(&conn, &child_name).map_err(|e| e.to_string())?;
    if deleted {
        tracing::info!("Deleted all records for {child_name}");
    }
    Ok(deleted)
}
