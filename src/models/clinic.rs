use serde::{Deserialize, Serialize};

/// Singleton clinic profile printed on document headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicProfile {
    pub name: String,
    pub address: String,
    pub city_state: String,
    pub phone: String,
    #[serde(default)]
    pub tax_id: String,
}

impl Default for ClinicProfile {
    /// Placeholder profile stored on first run, edited by the user later.
    fn default() -> Self {
        Self {
            name: "Your Clinic".into(),
            address: "Full address".into(),
            city_state: "City - ST".into(),
            phone: "(00) 00000-0000".into(),
            tax_id: String::new(),
        }
    }
}
