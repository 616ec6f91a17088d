pub mod advisor;
pub mod app_state;
pub mod chat;
pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod growth;
pub mod models;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Seedling starting v{}", config::APP_VERSION);

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(Arc::new(app_state::AppState::new()))
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            commands::settings::connect_database,
            commands::settings::get_database_path,
            commands::settings::set_api_key,
            commands::settings::set_advisor_model,
            commands::settings::get_advisor_status,
            commands::settings::get_context_window,
            commands::settings::set_context_window,
            commands::profile::list_children,
            commands::profile::get_profile,
            commands::profile::get_latest_profile,
            commands::profile::get_profile_history,
            commands::profile::save_profile,
            commands::profile::update_profile,
            commands::profile::delete_profile,
            commands::profile::delete_child,
            commands::chat::send_message,
            commands::chat::get_chat_history,
            commands::chat::get_chat_time_range,
            commands::chat::clear_chat_history,
            commands::chat::get_prompt_suggestions,
            commands::growth::get_growth_chart,
            commands::export::export_profile_text,
            commands::export::export_chat_transcript,
            commands::export::export_growth_pdf,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Seedling");
}
