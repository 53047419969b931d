//! Mapping state for one upload, editable after auto-mapping.
//!
//! [`MappingState`] owns the file's headers, the current [`HeaderMapping`] and
//! the extra (unmapped) headers. Edits go through [`MappingState::set_mapping`],
//! which keeps the mapping one-to-one and the extra list equal to what
//! [`derive_extra_fields`] would compute from scratch.

use serde::Serialize;
use tracing::{debug, warn};

use referable_model::{HeaderMapping, LogicalField};

use crate::engine::{AutoMapResult, auto_map, derive_extra_fields};
use crate::error::{MappingError, Result};
use crate::utils::is_blank_header;

/// State of the mapping step for a single uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingState {
    /// Headers exactly as read from the file, blanks included.
    headers: Vec<String>,
    mapping: HeaderMapping,
    extra_fields: Vec<String>,
}

impl MappingState {
    /// Runs the auto-mapper over `headers`.
    pub fn new(headers: Vec<String>) -> Self {
        let result = auto_map(&headers);
        Self::from_auto_map(headers, result)
    }

    /// Builds state from a previously computed auto-mapping of `headers`.
    pub fn from_auto_map(headers: Vec<String>, result: AutoMapResult) -> Self {
        Self {
            headers,
            mapping: result.mapping,
            extra_fields: result.extra_fields,
        }
    }

    /// State with nothing mapped; every non-blank header is extra.
    pub fn unmapped(headers: Vec<String>) -> Self {
        let mapping = HeaderMapping::new();
        let extra_fields = derive_extra_fields(&headers, &mapping);
        Self {
            headers,
            mapping,
            extra_fields,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn mapping(&self) -> &HeaderMapping {
        &self.mapping
    }

    /// Headers not mapped to any field, in file order.
    pub fn extra_fields(&self) -> &[String] {
        &self.extra_fields
    }

    pub fn mapped_header(&self, field: LogicalField) -> Option<&str> {
        self.mapping.get(field)
    }

    pub fn field_for_header(&self, header: &str) -> Option<LogicalField> {
        self.mapping.field_for(header)
    }

    /// Headers a field could still take without a conflict: the extras plus
    /// the header the field already holds.
    pub fn available_headers(&self, field: LogicalField) -> Vec<&str> {
        let own = self.mapping.get(field);
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|header| {
                Some(*header) == own || self.extra_fields.iter().any(|extra| extra == header)
            })
            .fold(Vec::new(), |mut acc, header| {
                if !acc.contains(&header) {
                    acc.push(header);
                }
                acc
            })
    }

    /// Sets or clears the header for `field`.
    ///
    /// `None` clears and always succeeds. A header held by a different field
    /// is rejected with [`MappingError::HeaderInUse`]; a header absent from
    /// the file with [`MappingError::UnknownHeader`]. Rejections leave the
    /// state unchanged.
    pub fn set_mapping(
        &mut self,
        field: LogicalField,
        header: Option<&str>,
    ) -> Result<&HeaderMapping> {
        match header {
            None => {
                self.clear_inner(field);
            }
            Some(header) => {
                if is_blank_header(header) {
                    warn!(field = %field, "rejected blank header");
                    return Err(MappingError::BlankHeader(field));
                }
                if !self.headers.iter().any(|known| known == header) {
                    warn!(field = %field, header = %header, "rejected unknown header");
                    return Err(MappingError::UnknownHeader(header.to_string()));
                }
                let previous = self.mapping.assign(field, header).inspect_err(|err| {
                    warn!(field = %field, header = %header, error = %err, "rejected mapping edit");
                })?;
                self.extra_fields.retain(|extra| extra != header);
                if let Some(previous) = previous.filter(|previous| previous != header) {
                    self.restore_extra(&previous);
                }
                debug!(field = %field, header = %header, "set mapping");
            }
        }
        Ok(&self.mapping)
    }

    /// Clears `field`, returning the header it held.
    pub fn clear_mapping(&mut self, field: LogicalField) -> Option<String> {
        self.clear_inner(field)
    }

    /// True when every required field has a header.
    pub fn can_submit(&self) -> bool {
        can_submit(&self.mapping)
    }

    /// Required fields still unmapped, in priority order.
    pub fn missing_required(&self) -> Vec<LogicalField> {
        self.mapping.missing_required()
    }

    pub fn summary(&self) -> MappingSummary {
        let required_mapped = LogicalField::REQUIRED
            .iter()
            .filter(|field| self.mapping.is_mapped(**field))
            .count();
        let optional_mapped = LogicalField::OPTIONAL
            .iter()
            .filter(|field| self.mapping.is_mapped(**field))
            .count();
        MappingSummary {
            total_headers: self.headers.iter().filter(|h| !is_blank_header(h)).count(),
            required_total: LogicalField::REQUIRED.len(),
            required_mapped,
            optional_total: LogicalField::OPTIONAL.len(),
            optional_mapped,
            extra: self.extra_fields.len(),
        }
    }

    /// Consumes the state, keeping only the mapping to submit.
    pub fn into_mapping(self) -> HeaderMapping {
        self.mapping
    }

    fn clear_inner(&mut self, field: LogicalField) -> Option<String> {
        let previous = self.mapping.clear(field)?;
        debug!(field = %field, header = %previous, "cleared mapping");
        self.restore_extra(&previous);
        Some(previous)
    }

    /// Puts `header` back among the extras at its file-order position, unless
    /// a field still holds it or it is already listed.
    fn restore_extra(&mut self, header: &str) {
        if self.mapping.contains_header(header)
            || self.extra_fields.iter().any(|extra| extra == header)
        {
            return;
        }
        let Some(rank) = self.first_index(header) else {
            return;
        };
        let position = self
            .extra_fields
            .iter()
            .position(|extra| self.first_index(extra).is_some_and(|idx| idx > rank))
            .unwrap_or(self.extra_fields.len());
        self.extra_fields.insert(position, header.to_string());
    }

    fn first_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|known| known == header)
    }
}

/// True iff every required field has a non-blank mapped header.
pub fn can_submit(mapping: &HeaderMapping) -> bool {
    mapping.missing_required().is_empty()
}

/// Summary counts for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    /// Non-blank headers in the file.
    pub total_headers: usize,
    pub required_total: usize,
    pub required_mapped: usize,
    pub optional_total: usize,
    pub optional_mapped: usize,
    /// Headers left unmapped.
    pub extra: usize,
}
