//! Header text normalization.

/// Normalizes a header for comparison.
///
/// Trims, lower-cases, collapses every run of non-alphanumeric characters
/// into a single space and trims again, so `"Client  Email!"` and
/// `"client_email"` both become `"client email"`. Blank input yields an empty
/// string.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the header carries no usable text.
pub fn is_blank_header(raw: &str) -> bool {
    raw.trim().is_empty()
}
