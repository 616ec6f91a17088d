use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Seedling";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Seedling/ on all platforms (user-visible, sits next to their documents)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Seedling")
}

/// Default SQLite database file
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("seedling.db")
}

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "info,seedling_lib=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Seedling"));
    }

    #[test]
    fn db_path_under_app_data() {
        let db = default_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("seedling.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
