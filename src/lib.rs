//! Agendario — offline-first scheduling and document generation for a
//! single clinic.
//!
//! The crate is the data and document core: a local key-value store over
//! SQLite, typed domain accessors (clinic profile, professionals,
//! appointments), pure agenda queries (day/week views, search) and a
//! paginated PDF pipeline for the five printable document kinds. A UI
//! shell binds to the async repository operations and the pure functions;
//! nothing here depends on a UI framework.

pub mod agenda;
pub mod backup;
pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod messaging;
pub mod models;
pub mod repository;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding application.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
