//! Document assembly for the five printable kinds: validation, a
//! renderer-independent page-content value, and the filename policy.
//! Rendering itself lives in [`pdf`]; preset prescription texts in
//! [`presets`].

pub mod pdf;
pub mod presets;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agenda::{self, format_display_date};
use crate::error::AgendaError;
use crate::models::{Appointment, ClinicProfile, DocumentKind, Professional};

/// Body template preloaded into a new certificate. The placeholder token is
/// replaced by the entered day count at assembly time.
pub const CERTIFICATE_TEMPLATE: &str = "I certify for all due purposes that the patient \
identified above was under my care on this date, requiring leave from their activities \
for ____ day(s).";

/// Placeholder token substituted by the certificate day count.
pub const LEAVE_DAYS_PLACEHOLDER: &str = "____";

/// User-entered input for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub kind: DocumentKind,
    pub patient: String,
    /// ISO date the document is issued for.
    pub date: String,
    /// Free-text body. Unused for receipts; optional for certificates
    /// (the built-in template applies when empty).
    #[serde(default)]
    pub body: String,
    /// Estimate: validity note, e.g. "30 days".
    #[serde(default)]
    pub validity: String,
    /// Estimate and receipt: trailing observations.
    #[serde(default)]
    pub observations: String,
    /// Certificate: number of leave days entered.
    #[serde(default)]
    pub leave_days: String,
    /// Certificate: ICD diagnosis code.
    #[serde(default)]
    pub diagnosis_code: String,
    /// Receipt: amount received.
    #[serde(default)]
    pub amount: String,
    /// Receipt: what the payment refers to.
    #[serde(default)]
    pub reference: String,
}

impl DocumentRequest {
    pub fn new(kind: DocumentKind, patient: &str, date: &str) -> Self {
        Self {
            kind,
            patient: patient.into(),
            date: date.into(),
            body: String::new(),
            validity: String::new(),
            observations: String::new(),
            leave_days: String::new(),
            diagnosis_code: String::new(),
            amount: String::new(),
            reference: String::new(),
        }
    }
}

/// Clinic identification block, rendered once per document on the first
/// page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicHeader {
    pub name: String,
    pub address_line: String,
    pub contact_line: String,
}

impl ClinicHeader {
    pub fn from_profile(clinic: &ClinicProfile) -> Self {
        let contact_line = if clinic.tax_id.is_empty() {
            clinic.phone.clone()
        } else {
            format!("{} • Tax ID: {}", clinic.phone, clinic.tax_id)
        };
        Self {
            name: clinic.name.clone(),
            address_line: format!("{} • {}", clinic.address, clinic.city_state),
            contact_line,
        }
    }
}

/// Professional block printed at the bottom of the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFooter {
    /// "Name • REGISTRY NUMBER".
    pub credentials: String,
    /// Professional contact, clinic phone as fallback.
    pub contact: String,
    /// Present on signed kinds only.
    pub signature_line: Option<String>,
}

impl DocumentFooter {
    fn build(kind: DocumentKind, professional: &Professional, clinic: &ClinicProfile) -> Self {
        let contact = if professional.contact.is_empty() {
            clinic.phone.clone()
        } else {
            professional.contact.clone()
        };
        let signature_line = kind.signed().then(|| {
            if professional.signature_line.is_empty() {
                "_".repeat(30)
            } else {
                professional.signature_line.clone()
            }
        });
        Self {
            credentials: format!("{} • {}", professional.name, professional.credentials()),
            contact,
            signature_line,
        }
    }
}

/// Renderer-independent page content for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContent {
    pub title: &'static str,
    pub clinic: ClinicHeader,
    /// "Patient: ..." line; absent on receipts, where the payer is named in
    /// the body.
    pub patient_line: Option<String>,
    pub date_line: String,
    /// Kind-specific field lines, e.g. "ICD: J06.9".
    pub extra_fields: Vec<String>,
    /// Blank-line-separated paragraphs, wrapped by the renderer.
    pub body: String,
    pub footer: DocumentFooter,
    pub filename: String,
}

/// Check the kind's required fields without assembling anything.
pub fn validate(request: &DocumentRequest) -> Result<(), AgendaError> {
    let mut missing = Vec::new();
    if request.patient.trim().is_empty() {
        missing.push("patient");
    }
    match request.kind {
        DocumentKind::Prescription | DocumentKind::Estimate | DocumentKind::Report => {
            if request.body.trim().is_empty() {
                missing.push("body");
            }
        }
        DocumentKind::Certificate => {}
        DocumentKind::Receipt => {
            if request.amount.trim().is_empty() {
                missing.push("amount");
            }
            if request.reference.trim().is_empty() {
                missing.push("reference");
            }
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgendaError::missing(&missing))
    }
}

/// Validate and build the page content. No file is written here.
pub fn assemble(
    request: &DocumentRequest,
    clinic: &ClinicProfile,
    professional: &Professional,
) -> Result<DocumentContent, AgendaError> {
    validate(request)?;
    let patient = request.patient.trim();

    let mut body = match request.kind {
        DocumentKind::Certificate => {
            let template = if request.body.trim().is_empty() {
                CERTIFICATE_TEMPLATE
            } else {
                request.body.trim()
            };
            match request.leave_days.trim() {
                // no count given: the placeholder stays visible for pen-and-ink
                "" => template.to_string(),
                days => template.replacen(LEAVE_DAYS_PLACEHOLDER, days, 1),
            }
        }
        DocumentKind::Receipt => format!(
            "Received from {} the amount of {}, in reference to {}.",
            patient,
            request.amount.trim(),
            request.reference.trim()
        ),
        _ => request.body.trim().to_string(),
    };

    match request.kind {
        DocumentKind::Estimate => {
            if !request.validity.trim().is_empty() {
                body.push_str(&format!("\n\nValidity: {}", request.validity.trim()));
            }
            if !request.observations.trim().is_empty() {
                body.push_str(&format!("\n\nNote: {}", request.observations.trim()));
            }
        }
        DocumentKind::Receipt => {
            if !request.observations.trim().is_empty() {
                body.push_str(&format!("\n\nNote: {}", request.observations.trim()));
            }
        }
        _ => {}
    }

    let mut extra_fields = Vec::new();
    if request.kind == DocumentKind::Certificate && !request.diagnosis_code.trim().is_empty() {
        extra_fields.push(format!("ICD: {}", request.diagnosis_code.trim()));
    }

    Ok(DocumentContent {
        title: request.kind.title(),
        clinic: ClinicHeader::from_profile(clinic),
        patient_line: (request.kind != DocumentKind::Receipt)
            .then(|| format!("Patient: {patient}")),
        date_line: format!("Date: {}", format_display_date(&request.date)),
        extra_fields,
        body,
        footer: DocumentFooter::build(request.kind, professional, clinic),
        filename: document_filename(request.kind, patient, &request.date),
    })
}

/// Lowercase, whitespace runs to a single underscore, anything outside
/// `[a-z0-9_-]` stripped.
pub fn sanitize_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_whitespace = false;
    for c in s.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                out.push(c);
            }
        }
    }
    out
}

pub fn document_filename(kind: DocumentKind, patient: &str, date: &str) -> String {
    format!("{}_{}_{}.pdf", kind.as_str(), sanitize_name(patient), date)
}

/// Assemble, render and write a document in one step. Returns the written
/// path. Validation failures leave the filesystem untouched.
pub fn generate_document(
    request: &DocumentRequest,
    clinic: &ClinicProfile,
    professional: &Professional,
    export_dir: &Path,
) -> Result<PathBuf, AgendaError> {
    let content = assemble(request, clinic, professional)?;
    let bytes = pdf::render_document(&content)?;
    pdf::export_to_file(&bytes, &content.filename, export_dir)
}

// ─── Agenda export ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaViewMode {
    Day,
    Week,
}

/// Page content for the printable agenda listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaContent {
    pub title: String,
    pub clinic: ClinicHeader,
    pub lines: Vec<String>,
    pub filename: String,
}

/// One listing line per appointment, day or week scope.
pub fn assemble_agenda(
    appointments: &[Appointment],
    clinic: &ClinicProfile,
    mode: AgendaViewMode,
    date: &str,
) -> Result<AgendaContent, AgendaError> {
    let (title, entries, slug) = match mode {
        AgendaViewMode::Day => (
            format!("Day agenda — {}", format_display_date(date)),
            agenda::day_view(appointments, date),
            "day",
        ),
        AgendaViewMode::Week => {
            let range = agenda::week_range(date)?;
            (
                format!(
                    "Week agenda — {} to {}",
                    format_display_date(&range.start),
                    format_display_date(&range.end)
                ),
                agenda::week_view(appointments, date)?,
                "week",
            )
        }
    };

    let lines = if entries.is_empty() {
        vec!["No appointments.".to_string()]
    } else {
        entries.iter().map(|a| agenda_line(a)).collect()
    };

    Ok(AgendaContent {
        title,
        clinic: ClinicHeader::from_profile(clinic),
        lines,
        filename: format!("agenda_{slug}_{date}.pdf"),
    })
}

fn agenda_line(a: &Appointment) -> String {
    let time = if a.time.is_empty() { "--:--" } else { &a.time };
    let mut line = format!("{} {} • {} • {}", a.date, time, a.patient, a.status);
    if !a.professional_name.is_empty() {
        line.push_str(&format!(" • {}", a.professional_name));
    }
    if !a.service.is_empty() {
        line.push_str(&format!(" • {}", a.service));
    }
    line
}

/// Assemble, render and write the agenda listing in one step.
pub fn generate_agenda_pdf(
    appointments: &[Appointment],
    clinic: &ClinicProfile,
    mode: AgendaViewMode,
    date: &str,
    export_dir: &Path,
) -> Result<PathBuf, AgendaError> {
    let content = assemble_agenda(appointments, clinic, mode, date)?;
    let bytes = pdf::render_agenda(&content)?;
    pdf::export_to_file(&bytes, &content.filename, export_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentDraft;

    fn clinic() -> ClinicProfile {
        ClinicProfile {
            name: "Sunrise Dental".into(),
            address: "12 Main St".into(),
            city_state: "Springfield - SP".into(),
            phone: "(11) 5555-0100".into(),
            tax_id: "12.345.678/0001-00".into(),
        }
    }

    fn professional() -> Professional {
        let mut p = Professional::seed();
        p.name = "Dr. Costa".into();
        p.registry = "CRO".into();
        p.registry_number = "12345".into();
        p.contact = "(11) 99999-0000".into();
        p
    }

    // ── Validation ────────────────────────────────────────

    #[test]
    fn prescription_requires_patient_and_body() {
        let request = DocumentRequest::new(DocumentKind::Prescription, "", "2025-01-15");
        let err = validate(&request).unwrap_err();
        match err {
            AgendaError::Validation { fields } => {
                assert_eq!(fields, vec!["patient", "body"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn certificate_requires_only_patient() {
        let request = DocumentRequest::new(DocumentKind::Certificate, "Ana", "2025-01-15");
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn receipt_requires_patient_amount_and_reference() {
        let request = DocumentRequest::new(DocumentKind::Receipt, "Ana", "2025-01-15");
        let err = validate(&request).unwrap_err();
        match err {
            AgendaError::Validation { fields } => {
                assert_eq!(fields, vec!["amount", "reference"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_only_body_is_missing() {
        let mut request = DocumentRequest::new(DocumentKind::Report, "Ana", "2025-01-15");
        request.body = "   \n  ".into();
        assert!(validate(&request).is_err());
    }

    // ── Assembly ──────────────────────────────────────────

    #[test]
    fn certificate_substitutes_day_count_once() {
        let mut request = DocumentRequest::new(DocumentKind::Certificate, "Ana", "2025-01-15");
        request.leave_days = "3".into();
        let content = assemble(&request, &clinic(), &professional()).unwrap();
        assert!(content.body.contains("for 3 day(s)"));
        assert!(!content.body.contains(LEAVE_DAYS_PLACEHOLDER));
    }

    #[test]
    fn certificate_keeps_placeholder_without_day_count() {
        let request = DocumentRequest::new(DocumentKind::Certificate, "Ana", "2025-01-15");
        let content = assemble(&request, &clinic(), &professional()).unwrap();
        assert!(content.body.contains(LEAVE_DAYS_PLACEHOLDER));
    }

    #[test]
    fn certificate_diagnosis_code_becomes_field_line() {
        let mut request = DocumentRequest::new(DocumentKind::Certificate, "Ana", "2025-01-15");
        request.diagnosis_code = "J06.9".into();
        let content = assemble(&request, &clinic(), &professional()).unwrap();
        assert_eq!(content.extra_fields, vec!["ICD: J06.9"]);
    }

    #[test]
    fn receipt_body_is_synthesized_from_template() {
        let mut request = DocumentRequest::new(DocumentKind::Receipt, "Ana Souza", "2025-01-15");
        request.amount = "R$ 350.00".into();
        request.reference = "dental cleaning".into();
        let content = assemble(&request, &clinic(), &professional()).unwrap();
        assert_eq!(
            content.body,
            "Received from Ana Souza the amount of R$ 350.00, in reference to dental cleaning."
        );
        // the payer is named in the body, not a field line
        assert!(content.patient_line.is_none());
    }

    #[test]
    fn estimate_appends_validity_and_note() {
        let mut request = DocumentRequest::new(DocumentKind::Estimate, "Ana", "2025-01-15");
        request.body = "Two fillings".into();
        request.validity = "30 days".into();
        request.observations = "Payment in two installments".into();
        let content = assemble(&request, &clinic(), &professional()).unwrap();
        assert!(content.body.starts_with("Two fillings"));
        assert!(content.body.contains("\n\nValidity: 30 days"));
        assert!(content.body.contains("\n\nNote: Payment in two installments"));
    }

    #[test]
    fn header_carries_tax_id_only_when_present() {
        let with = ClinicHeader::from_profile(&clinic());
        assert!(with.contact_line.contains("Tax ID: 12.345.678/0001-00"));

        let mut bare = clinic();
        bare.tax_id = String::new();
        let without = ClinicHeader::from_profile(&bare);
        assert_eq!(without.contact_line, "(11) 5555-0100");
    }

    #[test]
    fn footer_signature_only_on_signed_kinds() {
        let mut request = DocumentRequest::new(DocumentKind::Prescription, "Ana", "2025-01-15");
        request.body = "Dipyrone 500mg".into();
        let rx = assemble(&request, &clinic(), &professional()).unwrap();
        assert!(rx.footer.signature_line.is_none());

        let cert = assemble(
            &DocumentRequest::new(DocumentKind::Certificate, "Ana", "2025-01-15"),
            &clinic(),
            &professional(),
        )
        .unwrap();
        assert!(cert.footer.signature_line.is_some());
        assert_eq!(cert.footer.credentials, "Dr. Costa • CRO 12345");
    }

    #[test]
    fn date_line_is_display_formatted() {
        let cert = assemble(
            &DocumentRequest::new(DocumentKind::Certificate, "Ana", "2025-01-15"),
            &clinic(),
            &professional(),
        )
        .unwrap();
        assert_eq!(cert.date_line, "Date: 15/01/2025");
    }

    // ── Filenames ─────────────────────────────────────────

    #[test]
    fn sanitize_lowercases_and_strips() {
        assert_eq!(sanitize_name("Ana Souza"), "ana_souza");
        assert_eq!(sanitize_name("João  Silva"), "joo_silva");
        assert_eq!(sanitize_name("O'Brien-Smith Jr."), "obrien-smith_jr");
    }

    #[test]
    fn filename_joins_kind_patient_and_date() {
        assert_eq!(
            document_filename(DocumentKind::Prescription, "Ana Souza", "2025-01-15"),
            "prescription_ana_souza_2025-01-15.pdf"
        );
    }

    // ── File-write boundary ───────────────────────────────

    #[test]
    fn invalid_prescription_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let request = DocumentRequest::new(DocumentKind::Prescription, "Ana", "2025-01-15");

        let err = generate_document(&request, &clinic(), &professional(), dir.path()).unwrap_err();
        assert!(matches!(err, AgendaError::Validation { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn valid_prescription_writes_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = DocumentRequest::new(DocumentKind::Prescription, "Ana Souza", "2025-01-15");
        request.body = "Dipyrone 500mg\nTake 1 tablet every 6 hours for 3 days.".into();

        let path = generate_document(&request, &clinic(), &professional(), dir.path()).unwrap();
        assert!(path.ends_with("prescription_ana_souza_2025-01-15.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    // ── Agenda export ─────────────────────────────────────

    fn agenda_appt(date: &str, time: &str, patient: &str) -> Appointment {
        Appointment::create(
            AppointmentDraft {
                date: date.into(),
                time: time.into(),
                patient: patient.into(),
                service: "cleaning".into(),
                ..Default::default()
            },
            &professional(),
        )
    }

    #[test]
    fn empty_day_agenda_says_so() {
        let content =
            assemble_agenda(&[], &clinic(), AgendaViewMode::Day, "2025-01-15").unwrap();
        assert_eq!(content.lines, vec!["No appointments."]);
        assert_eq!(content.filename, "agenda_day_2025-01-15.pdf");
        assert!(content.title.contains("15/01/2025"));
    }

    #[test]
    fn week_agenda_lists_week_entries_only() {
        let appts = vec![
            agenda_appt("2025-01-12", "09:00", "Outside"),
            agenda_appt("2025-01-13", "", "Monday"),
            agenda_appt("2025-01-16", "14:00", "Thursday"),
        ];
        let content =
            assemble_agenda(&appts, &clinic(), AgendaViewMode::Week, "2025-01-15").unwrap();
        assert_eq!(content.lines.len(), 2);
        assert!(content.lines[0].contains("--:--"));
        assert!(content.lines[0].contains("Monday"));
        assert!(content.lines[1].contains("14:00"));
        assert!(content.title.contains("13/01/2025"));
        assert!(content.title.contains("19/01/2025"));
    }

    #[test]
    fn agenda_line_carries_status_and_snapshot() {
        let line = agenda_line(&agenda_appt("2025-01-13", "09:00", "Ana"));
        assert!(line.contains("pending"));
        assert!(line.contains("Dr. Costa"));
        assert!(line.contains("cleaning"));
    }
}
