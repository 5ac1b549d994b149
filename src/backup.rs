//! JSON backup and restore over the repository's dump/restore operations.
//!
//! The export is a pretty-printed JSON object whose top-level keys are the
//! six logical storage keys; restore is allow-listed, so a tampered file
//! cannot inject arbitrary keys.

use serde_json::Value;

use crate::error::AgendaError;
use crate::repository::Repository;

/// Serialize the full store as pretty-printed JSON.
pub async fn export_backup(repo: &Repository) -> Result<String, AgendaError> {
    let dump = repo.dump_all().await?;
    serde_json::to_string_pretty(&dump)
        .map_err(|e| AgendaError::Store(crate::db::StoreError::from(e)))
}

/// Suggested filename for an export taken on the given ISO date.
pub fn backup_filename(date: &str) -> String {
    format!("agendario_backup_{date}.json")
}

/// Parse and restore a backup file's contents. A file that is not valid
/// JSON aborts the whole import before anything is written.
pub async fn import_backup(repo: &Repository, raw: &str) -> Result<usize, AgendaError> {
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| AgendaError::ImportFormat(format!("not valid JSON: {e}")))?;
    repo.restore_subset(&data).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, AppointmentDraft};

    async fn seeded_repo() -> Repository {
        let repo = Repository::open_in_memory().unwrap();
        repo.ensure_defaults().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn export_then_import_restores_identical_data() {
        let repo = seeded_repo().await;
        let (prof, _) = repo.active_professional().await.unwrap();
        repo.upsert_appointment(Appointment::create(
            AppointmentDraft {
                date: "2025-01-15".into(),
                time: "09:00".into(),
                patient: "Ana Souza".into(),
                phone: "11987654321".into(),
                ..Default::default()
            },
            &prof,
        ))
        .await
        .unwrap();

        let exported = export_backup(&repo).await.unwrap();
        let before = repo.dump_all().await.unwrap();

        repo.reset_all().await.unwrap();
        import_backup(&repo, &exported).await.unwrap();

        assert_eq!(repo.dump_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn unparseable_input_aborts_import() {
        let repo = seeded_repo().await;
        let before = repo.dump_all().await.unwrap();

        let err = import_backup(&repo, "{not json").await.unwrap_err();
        assert!(matches!(err, AgendaError::ImportFormat(_)));
        assert_eq!(repo.dump_all().await.unwrap(), before);
    }

    #[test]
    fn backup_filename_carries_date() {
        assert_eq!(backup_filename("2025-01-15"), "agendario_backup_2025-01-15.json");
    }
}
