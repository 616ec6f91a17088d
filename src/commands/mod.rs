pub mod chat;
pub mod export;
pub mod growth;
pub mod profile;
pub mod settings;

/// Health check IPC command — verifies backend is running
#[tauri::command]
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}
