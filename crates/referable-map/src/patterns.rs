//! Synonym tables and exact header matching.

use referable_model::LogicalField;

use crate::utils::normalize_text;

/// Recognized header phrasings per field, lower-case and space-separated.
///
/// Order within a list carries no priority; the auto-mapper walks headers in
/// file order, not synonyms.
static SYNONYM_TABLE: [(LogicalField, &[&str]); 6] = [
    (
        LogicalField::ClientName,
        &[
            "client name",
            "name",
            "customer name",
            "customer",
            "client",
            "full name",
            "contact name",
        ],
    ),
    (
        LogicalField::ClientEmail,
        &[
            "client email",
            "email",
            "email address",
            "customer email",
            "e mail",
            "e mail address",
            "contact email",
        ],
    ),
    (
        LogicalField::ClientPhone,
        &[
            "client phone",
            "phone",
            "phone number",
            "customer phone",
            "mobile",
            "mobile phone",
            "cell",
            "cell phone",
            "telephone",
        ],
    ),
    (
        LogicalField::ServiceDate,
        &[
            "service date",
            "date",
            "appointment date",
            "job date",
            "visit date",
            "date of service",
        ],
    ),
    (
        LogicalField::AmountCharged,
        &[
            "amount charged",
            "amount",
            "price",
            "total",
            "charge",
            "invoice amount",
            "revenue",
        ],
    ),
    (
        LogicalField::AppointmentStatus,
        &[
            "appointment status",
            "status",
            "job status",
            "booking status",
        ],
    ),
];

/// Synonym list for `field`.
pub fn synonyms(field: LogicalField) -> &'static [&'static str] {
    SYNONYM_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map_or(&[][..], |(_, list)| *list)
}

/// True iff `header` equals one of `synonyms` after normalization.
///
/// A header that normalizes to nothing never matches.
pub fn matches<S: AsRef<str>>(header: &str, synonyms: &[S]) -> bool {
    let normalized = normalize_text(header);
    if normalized.is_empty() {
        return false;
    }
    synonyms
        .iter()
        .any(|synonym| normalize_text(synonym.as_ref()) == normalized)
}

/// Fields whose synonym list contains `header`, in data-model order.
pub fn match_synonyms(header: &str) -> Vec<LogicalField> {
    LogicalField::ALL
        .into_iter()
        .filter(|field| matches(header, synonyms(*field)))
        .collect()
}
