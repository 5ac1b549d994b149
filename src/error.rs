use thiserror::Error;

use crate::db::StoreError;

/// Domain-level error taxonomy.
///
/// Every variant is recoverable by retrying the user action; nothing here is
/// fatal to the process. Absence of a stored key is not an error and never
/// reaches this type.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Missing or invalid required field(s): {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Import rejected: {0}")]
    ImportFormat(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("PDF output error: {0}")]
    Pdf(String),
}

impl AgendaError {
    /// Validation failure naming the missing fields.
    pub fn missing(fields: &[&str]) -> Self {
        Self::Validation {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}
