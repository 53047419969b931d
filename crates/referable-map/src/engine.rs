//! Greedy, priority-ordered header auto-mapping.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use referable_model::{HeaderMapping, LogicalField};

use crate::patterns::{matches, synonyms};
use crate::utils::is_blank_header;

/// Outcome of [`auto_map`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoMapResult {
    /// Proposed field-to-header assignments.
    pub mapping: HeaderMapping,
    /// Non-blank headers left unassigned, in file order.
    pub extra_fields: Vec<String>,
    /// True when every required field received a header.
    pub all_required_mapped: bool,
}

impl AutoMapResult {
    /// Required fields the auto-mapper could not place.
    #[must_use]
    pub fn unmapped_required(&self) -> Vec<LogicalField> {
        self.mapping.missing_required()
    }
}

/// Proposes a mapping for `headers` without user input.
///
/// Required fields are placed first, then optional ones, each in declared
/// order. A field takes the first unused header (file order) matching its
/// synonym list. Blank headers are never candidates. The function is pure.
pub fn auto_map<S: AsRef<str>>(headers: &[S]) -> AutoMapResult {
    let candidates: Vec<&str> = headers
        .iter()
        .map(AsRef::as_ref)
        .filter(|header| !is_blank_header(header))
        .collect();

    let mut used: BTreeSet<usize> = BTreeSet::new();
    let mut mapping = HeaderMapping::new();
    let mut all_required_mapped = true;

    for pass in [&LogicalField::REQUIRED[..], &LogicalField::OPTIONAL[..]] {
        for &field in pass {
            let found = candidates.iter().enumerate().find(|(idx, header)| {
                !used.contains(idx)
                    && !mapping.contains_header(header)
                    && matches(header, synonyms(field))
            });
            match found {
                Some((idx, header)) => {
                    // Cannot conflict: the header is not held by any field yet.
                    if mapping.assign(field, header).is_ok() {
                        used.insert(idx);
                        debug!(field = %field, header = %header, "auto-mapped field");
                    }
                }
                None => {
                    if field.is_required() {
                        all_required_mapped = false;
                    }
                    debug!(field = %field, required = field.is_required(), "no matching header");
                }
            }
        }
    }

    let extra_fields = derive_extra_fields(headers, &mapping);
    info!(
        headers = headers.len(),
        mapped = mapping.len(),
        extra = extra_fields.len(),
        all_required_mapped,
        "auto-mapping complete"
    );

    AutoMapResult {
        mapping,
        extra_fields,
        all_required_mapped,
    }
}

/// Headers not held by any field: blanks dropped, file order kept, repeated
/// names listed once.
pub fn derive_extra_fields<S: AsRef<str>>(headers: &[S], mapping: &HeaderMapping) -> Vec<String> {
    let mut extras: Vec<String> = Vec::new();
    for header in headers {
        let header: &str = header.as_ref();
        if is_blank_header(header) || mapping.contains_header(header) {
            continue;
        }
        if extras.iter().any(|existing| existing == header) {
            continue;
        }
        extras.push(header.to_string());
    }
    extras
}
