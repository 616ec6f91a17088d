//! Export commands — profile dump, chat transcript, and the PDF growth
//! chart, written to a path the user picked in the save dialog.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tauri::State;

use crate::app_state::AppState;
use crate::db::repository::{self, chat as chat_repo};
use crate::export;
use crate::growth::reference::Measure;
use crate::growth::{build_series, pdf};

/// Write the child's latest profile card as plain text.
#[tauri::command]
pub fn export_profile_text(
    child_name: String,
    path: String,
    state: State<'_, Arc<AppState>>,
) -> Result<String, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    let profile = repository::latest_snapshot(&conn, &child_name)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No profile found for {child_name}"))?;

    let text = export::render_profile_text(&profile, Local::now().date_naive());
    let path = PathBuf::from(path);
    export::save_text(&path, &text).map_err(|e| e.to_string())?;

    tracing::info!("Exported profile for {child_name} to {}", path.display());
    Ok(path.display().to_string())
}

/// Write the child's retained conversation as plain text.
#[tauri::command]
pub fn export_chat_transcript(
    child_name: String,
    path: String,
    state: State<'_, Arc<AppState>>,
) -> Result<String, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    let messages = chat_repo::chat_history(&conn, &child_name).map_err(|e| e.to_string())?;
    if messages.is_empty() {
        return Err(format!("No conversation recorded for {child_name}"));
    }

    let text = export::render_transcript(&child_name, &messages);
    let path = PathBuf::from(path);
    export::save_text(&path, &text).map_err(|e| e.to_string())?;

    tracing::info!("Exported transcript for {child_name} to {}", path.display());
    Ok(path.display().to_string())
}

/// Render the growth chart for one measure and write it as a PDF.
#[tauri::command]
pub fn export_growth_pdf(
    child_name: String,
    measure: Measure,
    path: String,
    state: State<'_, Arc<AppState>>,
) -> Result<String, String> {
    let conn = state.open_db().map_err(|e| e.to_string())?;
    let history = repository::snapshot_history(&conn, &child_name).map_err(|e| e.to_string())?;

    let series = build_series(&history, measure).map_err(|e| e.to_string())?;
    let bytes = pdf::render_growth_pdf(&series).map_err(|e| e.to_string())?;

    let path = PathBuf::from(path);
    std::fs::write(&path, bytes).map_err(|e| e.to_string())?;

    tracing::info!("Exported growth chart for {child_name} to {}", path.display());
    Ok(path.display().to_string())
}
