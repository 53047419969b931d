//! Logical target fields understood by the importer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A semantic target column, independent of how an uploaded file labels it.
///
/// Variants are declared in data-model order; the auto-mapper uses
/// [`LogicalField::REQUIRED`] and [`LogicalField::OPTIONAL`] for its own
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalField {
    ClientName,
    ClientEmail,
    ClientPhone,
    ServiceDate,
    AmountCharged,
    AppointmentStatus,
}

impl LogicalField {
    /// Every field in data-model order.
    pub const ALL: [Self; 6] = [
        Self::ClientName,
        Self::ClientEmail,
        Self::ClientPhone,
        Self::ServiceDate,
        Self::AmountCharged,
        Self::AppointmentStatus,
    ];

    /// Required fields in auto-mapping priority order.
    pub const REQUIRED: [Self; 4] = [
        Self::ClientName,
        Self::ClientEmail,
        Self::ServiceDate,
        Self::AppointmentStatus,
    ];

    /// Optional fields in auto-mapping priority order.
    pub const OPTIONAL: [Self; 2] = [Self::ClientPhone, Self::AmountCharged];

    /// Wire name, as used for mapping JSON keys.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ClientName => "clientName",
            Self::ClientEmail => "clientEmail",
            Self::ClientPhone => "clientPhone",
            Self::ServiceDate => "serviceDate",
            Self::AmountCharged => "amountCharged",
            Self::AppointmentStatus => "appointmentStatus",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ClientName => "Client Name",
            Self::ClientEmail => "Client Email",
            Self::ClientPhone => "Client Phone",
            Self::ServiceDate => "Service Date",
            Self::AmountCharged => "Amount Charged",
            Self::AppointmentStatus => "Appointment Status",
        }
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        !matches!(self, Self::ClientPhone | Self::AmountCharged)
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalField {
    type Err = ModelError;

    /// Accepts the wire name in any case, and `snake_case` / `kebab-case`
    /// spellings (`client_email`, `client-email`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name().to_lowercase() == folded)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
