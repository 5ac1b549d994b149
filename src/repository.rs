//! Typed domain accessors over the key-value store.
//!
//! The repository is the sole writer-back path: every mutation reads the
//! full stored collection, modifies it in memory, and writes the full
//! collection back. The store offers no optimistic-concurrency check, so a
//! write guard serializes read-modify-write sequences — two overlapping
//! collection writes are never issued.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::DEFAULT_PASSPHRASE;
use crate::db::{KvStore, StoreError};
use crate::error::AgendaError;
use crate::models::{digits_only, Appointment, ClinicProfile, Professional};

/// Logical storage keys. The backup format's top-level keys are exactly
/// these six; restore silently ignores anything else.
pub mod keys {
    pub const PASSPHRASE: &str = "cfg.pass";
    pub const LICENSE: &str = "cfg.license";
    pub const CLINIC: &str = "data.clinic";
    pub const PROFESSIONALS: &str = "data.profs";
    pub const ACTIVE_PROFESSIONAL: &str = "data.active_prof";
    pub const APPOINTMENTS: &str = "data.appts";

    pub const ALL: [&str; 6] = [
        PASSPHRASE,
        LICENSE,
        CLINIC,
        PROFESSIONALS,
        ACTIVE_PROFESSIONAL,
        APPOINTMENTS,
    ];
}

pub struct Repository {
    store: KvStore,
    /// Held across every read-modify-write on a stored collection.
    write_guard: Mutex<()>,
}

impl Repository {
    /// Open (or create) the repository at the given database path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            store: KvStore::open(path)?,
            write_guard: Mutex::new(()),
        })
    }

    /// In-memory repository for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            store: KvStore::open_in_memory()?,
            write_guard: Mutex::new(()),
        })
    }

    async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AgendaError> {
        match self.store.get(key).await? {
            Some(value) => {
                let typed = serde_json::from_value(value)
                    .map_err(|e| AgendaError::Store(StoreError::from(e)))?;
                Ok(Some(typed))
            }
            None => Ok(None),
        }
    }

    async fn set_typed<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AgendaError> {
        let raw = serde_json::to_value(value).map_err(|e| AgendaError::Store(StoreError::from(e)))?;
        self.store.set(key, &raw).await?;
        Ok(())
    }

    // ─── First-run defaulting ─────────────────────────────────────────────

    /// Seed missing keys with built-in defaults. Idempotent: existing
    /// non-default data is never overwritten.
    pub async fn ensure_defaults(&self) -> Result<(), AgendaError> {
        let _guard = self.write_guard.lock().await;

        if self.store.get(keys::PASSPHRASE).await?.is_none() {
            self.store
                .set(keys::PASSPHRASE, &Value::String(DEFAULT_PASSPHRASE.into()))
                .await?;
        }

        if self.store.get(keys::CLINIC).await?.is_none() {
            self.set_typed(keys::CLINIC, &ClinicProfile::default()).await?;
        }

        let profs = self.store.get(keys::PROFESSIONALS).await?;
        let needs_seed = !matches!(&profs, Some(Value::Array(list)) if !list.is_empty());
        if needs_seed {
            let seeded = vec![Professional::seed()];
            self.set_typed(keys::PROFESSIONALS, &seeded).await?;
            self.store
                .set(
                    keys::ACTIVE_PROFESSIONAL,
                    &Value::String(seeded[0].id.clone()),
                )
                .await?;
        }

        let appts = self.store.get(keys::APPOINTMENTS).await?;
        if !matches!(appts, Some(Value::Array(_))) {
            self.set_typed::<Vec<Appointment>>(keys::APPOINTMENTS, &Vec::new())
                .await?;
        }

        tracing::debug!("first-run defaults ensured");
        Ok(())
    }

    // ─── Passphrase & license ─────────────────────────────────────────────

    /// Stored passphrase, or the built-in default when none was stored.
    pub async fn passphrase(&self) -> Result<String, AgendaError> {
        Ok(self
            .get_typed::<String>(keys::PASSPHRASE)
            .await?
            .unwrap_or_else(|| DEFAULT_PASSPHRASE.to_string()))
    }

    /// Store a new passphrase. An empty input falls back to the built-in
    /// default rather than locking the user out with an empty string.
    pub async fn set_passphrase(&self, passphrase: &str) -> Result<(), AgendaError> {
        let value = match passphrase.trim() {
            "" => DEFAULT_PASSPHRASE,
            trimmed => trimmed,
        };
        self.store
            .set(keys::PASSPHRASE, &Value::String(value.into()))
            .await?;
        Ok(())
    }

    pub async fn verify_passphrase(&self, input: &str) -> Result<bool, AgendaError> {
        Ok(input.trim() == self.passphrase().await?)
    }

    pub async fn license(&self) -> Result<String, AgendaError> {
        Ok(self
            .get_typed::<String>(keys::LICENSE)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_license(&self, license: &str) -> Result<(), AgendaError> {
        self.store
            .set(keys::LICENSE, &Value::String(license.trim().into()))
            .await?;
        Ok(())
    }

    // ─── Clinic profile ───────────────────────────────────────────────────

    pub async fn clinic(&self) -> Result<ClinicProfile, AgendaError> {
        Ok(self
            .get_typed::<ClinicProfile>(keys::CLINIC)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_clinic(&self, profile: &ClinicProfile) -> Result<(), AgendaError> {
        self.set_typed(keys::CLINIC, profile).await
    }

    // ─── Professionals ────────────────────────────────────────────────────

    pub async fn professionals(&self) -> Result<Vec<Professional>, AgendaError> {
        Ok(self
            .get_typed::<Vec<Professional>>(keys::PROFESSIONALS)
            .await?
            .unwrap_or_default())
    }

    /// Resolve the active professional against the stored list.
    ///
    /// A stale or absent pointer falls back to the first entry. The
    /// fallback is read-only: the stored pointer is never rewritten here.
    pub async fn active_professional(
        &self,
    ) -> Result<(Professional, Vec<Professional>), AgendaError> {
        let list = self.professionals().await?;
        let active_id: Option<String> = self.get_typed(keys::ACTIVE_PROFESSIONAL).await?;
        let active = list
            .iter()
            .find(|p| Some(p.id.as_str()) == active_id.as_deref())
            .or_else(|| list.first())
            .cloned()
            .ok_or_else(|| {
                AgendaError::not_found("Professional", active_id.as_deref().unwrap_or(""))
            })?;
        Ok((active, list))
    }

    /// Point new appointments and documents at the given professional.
    pub async fn set_active_professional(&self, id: &str) -> Result<(), AgendaError> {
        let list = self.professionals().await?;
        if !list.iter().any(|p| p.id == id) {
            return Err(AgendaError::not_found("Professional", id));
        }
        self.store
            .set(keys::ACTIVE_PROFESSIONAL, &Value::String(id.into()))
            .await?;
        Ok(())
    }

    /// Replace in place when the id matches an existing entry (preserving
    /// its position), append otherwise. The upserted entry becomes active.
    pub async fn upsert_professional(&self, professional: Professional) -> Result<(), AgendaError> {
        if professional.name.trim().is_empty() {
            return Err(AgendaError::missing(&["name"]));
        }

        let _guard = self.write_guard.lock().await;
        let mut list = self.professionals().await?;
        match list.iter().position(|p| p.id == professional.id) {
            Some(idx) => list[idx] = professional.clone(),
            None => list.push(professional.clone()),
        }
        self.set_typed(keys::PROFESSIONALS, &list).await?;
        self.store
            .set(keys::ACTIVE_PROFESSIONAL, &Value::String(professional.id))
            .await?;
        Ok(())
    }

    /// Remove the entry. The collection is never left empty: deleting the
    /// last professional re-seeds one default. The active pointer is reset
    /// to the first remaining entry.
    pub async fn delete_professional(&self, id: &str) -> Result<(), AgendaError> {
        let _guard = self.write_guard.lock().await;
        let mut list = self.professionals().await?;
        let before = list.len();
        list.retain(|p| p.id != id);
        if list.len() == before {
            return Err(AgendaError::not_found("Professional", id));
        }
        if list.is_empty() {
            list.push(Professional::seed());
        }
        self.set_typed(keys::PROFESSIONALS, &list).await?;
        self.store
            .set(
                keys::ACTIVE_PROFESSIONAL,
                &Value::String(list[0].id.clone()),
            )
            .await?;
        Ok(())
    }

    // ─── Appointments ─────────────────────────────────────────────────────

    /// Full stored collection, sorted by (date, time) ascending.
    pub async fn appointments(&self) -> Result<Vec<Appointment>, AgendaError> {
        Ok(self
            .get_typed::<Vec<Appointment>>(keys::APPOINTMENTS)
            .await?
            .unwrap_or_default())
    }

    /// Insert-or-replace by id, then re-sort the full collection.
    pub async fn upsert_appointment(
        &self,
        mut appointment: Appointment,
    ) -> Result<Appointment, AgendaError> {
        if appointment.patient.trim().is_empty() {
            return Err(AgendaError::missing(&["patient"]));
        }
        appointment.phone = digits_only(&appointment.phone);

        let _guard = self.write_guard.lock().await;
        let mut list = self.appointments().await?;
        match list.iter().position(|a| a.id == appointment.id) {
            Some(idx) => {
                appointment.touch();
                list[idx] = appointment.clone();
            }
            None => list.push(appointment.clone()),
        }
        list.sort_by_key(Appointment::sort_key);
        self.set_typed(keys::APPOINTMENTS, &list).await?;
        Ok(appointment)
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<(), AgendaError> {
        let _guard = self.write_guard.lock().await;
        let mut list = self.appointments().await?;
        let before = list.len();
        list.retain(|a| a.id != id);
        if list.len() == before {
            return Err(AgendaError::not_found("Appointment", id));
        }
        self.set_typed(keys::APPOINTMENTS, &list).await?;
        Ok(())
    }

    // ─── Backup / restore / reset ─────────────────────────────────────────

    /// Every stored key and its value, for export.
    pub async fn dump_all(&self) -> Result<serde_json::Map<String, Value>, AgendaError> {
        Ok(self.store.dump_all().await?)
    }

    /// Restore allow-listed keys from an import object.
    ///
    /// Unknown top-level keys are silently ignored. Every allow-listed
    /// value is validated against its expected shape before anything is
    /// written: a malformed value fails the whole import with no write.
    /// Returns the number of keys applied.
    pub async fn restore_subset(&self, data: &Value) -> Result<usize, AgendaError> {
        let obj = data
            .as_object()
            .ok_or_else(|| AgendaError::ImportFormat("top level must be an object".into()))?;

        for key in keys::ALL {
            if let Some(value) = obj.get(key) {
                validate_restore_value(key, value)?;
            }
        }

        let _guard = self.write_guard.lock().await;
        let mut applied = 0;
        for key in keys::ALL {
            if let Some(value) = obj.get(key) {
                self.store.set(key, value).await?;
                applied += 1;
            }
        }
        tracing::info!(applied, "restore applied");
        Ok(applied)
    }

    /// Clear every stored key unconditionally. Irreversible.
    pub async fn reset_all(&self) -> Result<(), AgendaError> {
        let _guard = self.write_guard.lock().await;
        self.store.clear_all().await?;
        tracing::warn!("all stored data cleared");
        Ok(())
    }
}

fn validate_restore_value(key: &str, value: &Value) -> Result<(), AgendaError> {
    let ok = match key {
        keys::PASSPHRASE | keys::LICENSE | keys::ACTIVE_PROFESSIONAL => value.is_string(),
        keys::CLINIC => serde_json::from_value::<ClinicProfile>(value.clone()).is_ok(),
        keys::PROFESSIONALS => serde_json::from_value::<Vec<Professional>>(value.clone()).is_ok(),
        keys::APPOINTMENTS => serde_json::from_value::<Vec<Appointment>>(value.clone()).is_ok(),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(AgendaError::ImportFormat(format!(
            "value for '{key}' does not match the expected shape"
        )))
    }
}
