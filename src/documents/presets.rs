//! Prescription preset library: ready-made dosage texts grouped by
//! category, appended to the prescription body as the user picks them.

/// One ready-made prescription text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub text: &'static str,
}

/// A named group of presets.
#[derive(Debug, Clone, Copy)]
pub struct PresetCategory {
    pub name: &'static str,
    pub entries: &'static [Preset],
}

pub const PRESCRIPTION_PRESETS: &[PresetCategory] = &[
    PresetCategory {
        name: "Analgesic",
        entries: &[
            Preset {
                name: "Dipyrone 500mg",
                text: "Dipyrone 500mg\nTake 1 tablet every 6 hours for 3 days.\n",
            },
            Preset {
                name: "Paracetamol 750mg",
                text: "Paracetamol 750mg\nTake 1 tablet every 8 hours for 3 days.\n",
            },
            Preset {
                name: "Ibuprofen 600mg (pain)",
                text: "Ibuprofen 600mg\nTake 1 tablet every 8 hours after meals for 3 days.\n",
            },
        ],
    },
    PresetCategory {
        name: "Anti-inflammatory",
        entries: &[
            Preset {
                name: "Nimesulide 100mg",
                text: "Nimesulide 100mg\nTake 1 tablet every 12 hours after meals for 3 days.\n",
            },
            Preset {
                name: "Diclofenac 50mg",
                text: "Diclofenac 50mg\nTake 1 tablet every 8 hours after meals for 3 days.\n",
            },
            Preset {
                name: "Prednisone 20mg (short course)",
                text: "Prednisone 20mg\nTake 1 tablet in the morning for 3 days.\n",
            },
        ],
    },
    PresetCategory {
        name: "Antibiotic",
        entries: &[
            Preset {
                name: "Amoxicillin 500mg",
                text: "Amoxicillin 500mg\nTake 1 capsule every 8 hours for 7 days.\n",
            },
            Preset {
                name: "Amoxicillin + Clavulanate 875/125mg",
                text: "Amoxicillin + Clavulanate 875/125mg\nTake 1 tablet every 12 hours for 7 days.\n",
            },
            Preset {
                name: "Azithromycin 500mg",
                text: "Azithromycin 500mg\nTake 1 tablet daily for 3 days.\n",
            },
        ],
    },
    PresetCategory {
        name: "Antifungal",
        entries: &[
            Preset {
                name: "Nystatin suspension",
                text: "Nystatin oral suspension\nRinse/apply 4 times a day for 7-14 days.\n",
            },
            Preset {
                name: "Fluconazole 150mg",
                text: "Fluconazole 150mg\nTake 1 capsule as a single dose (per clinical assessment).\n",
            },
        ],
    },
    PresetCategory {
        name: "Hypertension",
        entries: &[
            Preset {
                name: "Losartan 50mg",
                text: "Losartan 50mg\nTake 1 tablet daily (as medically prescribed).\n",
            },
            Preset {
                name: "Amlodipine 5mg",
                text: "Amlodipine 5mg\nTake 1 tablet daily (as medically prescribed).\n",
            },
        ],
    },
    PresetCategory {
        name: "Diabetes",
        entries: &[
            Preset {
                name: "Metformin 500mg",
                text: "Metformin 500mg\nTake 1 tablet with meals (as medically prescribed).\n",
            },
            Preset {
                name: "Glibenclamide 5mg",
                text: "Glibenclamide 5mg\nTake 1 tablet daily (as medically prescribed).\n",
            },
        ],
    },
];

/// Category names, in display order.
pub fn categories() -> Vec<&'static str> {
    PRESCRIPTION_PRESETS.iter().map(|c| c.name).collect()
}

/// Look up a preset by category and name.
pub fn find(category: &str, name: &str) -> Option<&'static Preset> {
    PRESCRIPTION_PRESETS
        .iter()
        .find(|c| c.name == category)?
        .entries
        .iter()
        .find(|p| p.name == name)
}

/// Append a preset to the body, separated by a blank line when the body
/// already has content.
pub fn append_preset(body: &str, preset: &Preset) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        preset.text.to_string()
    } else {
        format!("{trimmed}\n\n{}", preset.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_entries() {
        assert!(!PRESCRIPTION_PRESETS.is_empty());
        for category in PRESCRIPTION_PRESETS {
            assert!(!category.entries.is_empty(), "{} is empty", category.name);
        }
    }

    #[test]
    fn find_locates_presets() {
        let preset = find("Antibiotic", "Amoxicillin 500mg").unwrap();
        assert!(preset.text.starts_with("Amoxicillin 500mg"));
        assert!(find("Antibiotic", "Unknown").is_none());
        assert!(find("Unknown", "Amoxicillin 500mg").is_none());
    }

    #[test]
    fn append_to_empty_body_is_just_the_preset() {
        let preset = find("Analgesic", "Dipyrone 500mg").unwrap();
        assert_eq!(append_preset("   ", preset), preset.text);
    }

    #[test]
    fn append_separates_with_blank_line() {
        let preset = find("Analgesic", "Dipyrone 500mg").unwrap();
        let body = append_preset("Paracetamol 750mg\nTake 1 tablet.\n", preset);
        assert!(body.contains("Take 1 tablet.\n\nDipyrone 500mg"));
    }
}
