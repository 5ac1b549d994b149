use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;
use super::professional::Professional;

/// Strip everything but ASCII digits — the canonical phone form.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A single agenda entry.
///
/// `professional_id` and `professional_name` are snapshots taken when the
/// entry is created; renaming a professional later never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    /// Calendar day, ISO `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, or empty when no time of day was set.
    #[serde(default)]
    pub time: String,
    pub patient: String,
    /// Digits-only, used for messaging links.
    #[serde(default)]
    pub phone: String,
    /// Free-text service / professional label.
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub notes: String,
    pub status: AppointmentStatus,
    pub professional_id: String,
    pub professional_name: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
}

/// User-entered fields for a new agenda entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub patient: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Create an entry from a draft, snapshotting the active professional.
    pub fn create(draft: AppointmentDraft, professional: &Professional) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            date: draft.date,
            time: draft.time,
            patient: draft.patient.trim().to_string(),
            phone: digits_only(&draft.phone),
            service: draft.service.trim().to_string(),
            notes: draft.notes.trim().to_string(),
            status: draft.status,
            professional_id: professional.id.clone(),
            professional_name: professional.name.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ordering key for the stored collection: date then time,
    /// lexicographic. An unset time (empty string) sorts before any set
    /// time on the same day.
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.date, self.time)
    }

    /// Refresh the updated stamp after an edit.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("(11) 98765-4321"), "11987654321");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn create_snapshots_professional() {
        let prof = Professional::seed();
        let appt = Appointment::create(
            AppointmentDraft {
                date: "2025-01-10".into(),
                patient: "  Ana Souza  ".into(),
                phone: "(11) 98765-4321".into(),
                ..Default::default()
            },
            &prof,
        );
        assert_eq!(appt.professional_id, prof.id);
        assert_eq!(appt.professional_name, prof.name);
        assert_eq!(appt.patient, "Ana Souza");
        assert_eq!(appt.phone, "11987654321");
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.created_at, appt.updated_at);
    }

    #[test]
    fn unset_time_sorts_before_any_time() {
        let prof = Professional::seed();
        let untimed = Appointment::create(
            AppointmentDraft {
                date: "2025-01-10".into(),
                patient: "A".into(),
                ..Default::default()
            },
            &prof,
        );
        let timed = Appointment::create(
            AppointmentDraft {
                date: "2025-01-10".into(),
                time: "08:00".into(),
                patient: "B".into(),
                ..Default::default()
            },
            &prof,
        );
        assert!(untimed.sort_key() < timed.sort_key());
    }
}
