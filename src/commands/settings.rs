//! Settings commands — database file selection, advisor credentials, and
//! the chat send-window size.

use std::path::PathBuf;
use std::sync::Arc;

use tauri::State;

use crate::app_state::AppState;

/// Advisor configuration for the settings screen and status indicator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AdvisorStatus {
    pub base_url: String,
    pub model: String,
    pub has_api_key: bool,
    /// Human-readable status summary.
    pub summary: String,
}

/// Point the app at another SQLite database file. The file is created and
/// migrated on the spot, so a failure surfaces here rather than later.
#[tauri::command]
pub fn connect_database(path: String, state: State<'_, Arc<AppState>>) -> Result<String, String> {
    let path = PathBuf::from(path);
    state.set_db_path(&path).map_err(|e| e.to_string())?;
    tracing::info!("Database switched to {}", path.display());
    Ok(path.display().to_string())
}

/// Current database file path.
#[tauri::command]
pub fn get_database_path(state: State<'_, Arc<AppState>>) -> Result<String, String> {
    state
        .db_path()
        .map(|p| p.display().to_string())
        .map_err(|e| e.to_string())
}

/// Store the advisor API key for this session.
#[tauri::command]
pub fn set_api_key(api_key: String, state: State<'_, Arc<AppState>>) -> Result<(), String> {
    state.set_api_key(&api_key).map_err(|e| e.to_string())
}

/// Switch the served model name.
#[tauri::command]
pub fn set_advisor_model(model: String, state: State<'_, Arc<AppState>>) -> Result<(), String> {
    state.set_model(&model).map_err(|e| e.to_string())
}

/// Advisor configuration summary for the status indicator.
#[tauri::command]
pub fn get_advisor_status(state: State<'_, Arc<AppState>>) -> Result<AdvisorStatus, String> {
    let (base_url, model, has_api_key) = state.advisor_info().map_err(|e| e.to_string())?;

    let summary = if has_api_key {
        format!("Advisor ready — {model}")
    } else {
        "No API key set — add one in Settings to enable the advisor".to_string()
    };

    Ok(AdvisorStatus {
        base_url,
        model,
        has_api_key,
        summary,
    })
}

/// Number of chat turns sent per advisor call.
#[tauri::command]
pub fn get_context_window(state: State<'_, Arc<AppState>>) -> usize {
    state.context_window()
}

/// Set the send-window size. Returns the clamped value actually applied.
#[tauri::command]
pub fn set_context_window(limit: usize, state: State<'_, Arc<AppState>>) -> usize {
    state.set_context_window(limit)
}
