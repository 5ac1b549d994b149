use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_signature_line() -> String {
    "_".repeat(32)
}

/// A practitioner of the clinic: signs documents and owns agenda entries.
///
/// The `id` is generated once and stays stable across edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    pub name: String,
    /// License registry kind, e.g. "CRO" or "CRM".
    pub registry: String,
    pub registry_number: String,
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    /// Text printed on the document signature line.
    #[serde(default = "default_signature_line")]
    pub signature_line: String,
}

impl Professional {
    /// Default entry seeded whenever the list would otherwise be empty.
    pub fn seed() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Practitioner 1".into(),
            registry: "CRO/CRM/OTHER".into(),
            registry_number: "00000".into(),
            contact: "(00) 00000-0000".into(),
            email: String::new(),
            address: String::new(),
            signature_line: default_signature_line(),
        }
    }

    /// "REGISTRY NUMBER" as shown in selectors and document footers.
    pub fn credentials(&self) -> String {
        format!("{} {}", self.registry, self.registry_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_generates_fresh_ids() {
        let a = Professional::seed();
        let b = Professional::seed();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Practitioner 1");
    }

    #[test]
    fn credentials_joins_registry_and_number() {
        let mut p = Professional::seed();
        p.registry = "CRM".into();
        p.registry_number = "12345".into();
        assert_eq!(p.credentials(), "CRM 12345");
    }
}
