use crate::error::AgendaError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AgendaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(AgendaError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Done => "done",
    NoShow => "no-show",
    Rescheduled => "rescheduled",
});

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

str_enum!(DocumentKind {
    Prescription => "prescription",
    Estimate => "estimate",
    Certificate => "certificate",
    Report => "report",
    Receipt => "receipt",
});

impl DocumentKind {
    /// Heading printed at the top of the document body.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Prescription => "PRESCRIPTION",
            Self::Estimate => "ESTIMATE",
            Self::Certificate => "CERTIFICATE",
            Self::Report => "REPORT",
            Self::Receipt => "RECEIPT",
        }
    }

    /// Whether the printed footer carries a signature line.
    pub fn signed(&self) -> bool {
        matches!(self, Self::Certificate | Self::Report | Self::Receipt)
    }
}
