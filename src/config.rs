use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Agendario";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Passphrase stored on first run, used until the user sets their own.
pub const DEFAULT_PASSPHRASE: &str = "agd007";

/// Country code prefixed to appointment phone numbers in messaging links.
pub const MESSAGING_COUNTRY_CODE: &str = "55";

/// Get the application data directory
/// ~/Agendario/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Agendario")
}

/// Get the database path
pub fn db_path() -> PathBuf {
    app_data_dir().join("agendario.db")
}

/// Get the directory generated PDFs and backups are written to
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "agendario=info"
}
