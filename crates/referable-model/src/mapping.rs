//! One-to-one mapping from logical fields to CSV headers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::LogicalField;

/// A partial, one-to-one function from [`LogicalField`] to a CSV header.
///
/// Serializes as a JSON object keyed by field name (`{"clientName": "Name"}`);
/// unmapped fields are omitted. Deserialization rejects two fields sharing a
/// header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<LogicalField, String>", into = "BTreeMap<LogicalField, String>")]
pub struct HeaderMapping {
    entries: BTreeMap<LogicalField, String>,
}

impl HeaderMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Header mapped to `field`, if any.
    #[must_use]
    pub fn get(&self, field: LogicalField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    /// Field currently holding `header`, if any.
    #[must_use]
    pub fn field_for(&self, header: &str) -> Option<LogicalField> {
        self.entries
            .iter()
            .find(|(_, mapped)| mapped.as_str() == header)
            .map(|(field, _)| *field)
    }

    #[must_use]
    pub fn contains_header(&self, header: &str) -> bool {
        self.field_for(header).is_some()
    }

    #[must_use]
    pub fn is_mapped(&self, field: LogicalField) -> bool {
        self.entries.contains_key(&field)
    }

    /// Maps `field` to `header`, returning the header the field held before.
    ///
    /// Fails without mutating when `header` is blank or already held by a
    /// different field.
    pub fn assign(&mut self, field: LogicalField, header: &str) -> Result<Option<String>> {
        if header.trim().is_empty() {
            return Err(ModelError::EmptyHeader(field));
        }
        if let Some(owner) = self.field_for(header) {
            if owner != field {
                return Err(ModelError::HeaderInUse {
                    header: header.to_string(),
                    field: owner,
                });
            }
        }
        Ok(self.entries.insert(field, header.to_string()))
    }

    /// Clears `field`, returning the header it held.
    pub fn clear(&mut self, field: LogicalField) -> Option<String> {
        self.entries.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, &str)> {
        self.entries
            .iter()
            .map(|(field, header)| (*field, header.as_str()))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Required fields without a mapped header, in priority order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<LogicalField> {
        LogicalField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).is_none_or(|h| h.trim().is_empty()))
            .collect()
    }

    /// JSON body sent alongside the uploaded file.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl TryFrom<BTreeMap<LogicalField, String>> for HeaderMapping {
    type Error = ModelError;

    fn try_from(entries: BTreeMap<LogicalField, String>) -> Result<Self> {
        let mut mapping = Self::new();
        for (field, header) in entries {
            mapping.assign(field, &header)?;
        }
        Ok(mapping)
    }
}

impl From<HeaderMapping> for BTreeMap<LogicalField, String> {
    fn from(mapping: HeaderMapping) -> Self {
        mapping.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_rejects_header_held_by_other_field() {
        let mut mapping = HeaderMapping::new();
        mapping.assign(LogicalField::ClientName, "Name").unwrap();

        let err = mapping
            .assign(LogicalField::ClientPhone, "Name")
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::HeaderInUse {
                header: "Name".to_string(),
                field: LogicalField::ClientName,
            }
        );
        assert_eq!(mapping.get(LogicalField::ClientPhone), None);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn assign_returns_previous_header() {
        let mut mapping = HeaderMapping::new();
        assert_eq!(mapping.assign(LogicalField::ClientEmail, "Email"), Ok(None));
        assert_eq!(
            mapping.assign(LogicalField::ClientEmail, "E-Mail"),
            Ok(Some("Email".to_string()))
        );
        assert_eq!(mapping.field_for("E-Mail"), Some(LogicalField::ClientEmail));
        assert!(!mapping.contains_header("Email"));
    }

    #[test]
    fn assign_rejects_blank_header() {
        let mut mapping = HeaderMapping::new();
        assert_eq!(
            mapping.assign(LogicalField::ServiceDate, "   "),
            Err(ModelError::EmptyHeader(LogicalField::ServiceDate))
        );
    }

    #[test]
    fn missing_required_in_priority_order() {
        let mut mapping = HeaderMapping::new();
        mapping.assign(LogicalField::ClientEmail, "Email").unwrap();
        mapping.assign(LogicalField::ClientPhone, "Phone").unwrap();
        assert_eq!(
            mapping.missing_required(),
            vec![
                LogicalField::ClientName,
                LogicalField::ServiceDate,
                LogicalField::AppointmentStatus,
            ]
        );
    }

    #[test]
    fn serializes_as_field_keyed_object() {
        let mut mapping = HeaderMapping::new();
        mapping.assign(LogicalField::ClientName, "Client Name").unwrap();
        mapping.assign(LogicalField::AmountCharged, "Amount").unwrap();

        insta::assert_json_snapshot!(mapping, @r#"
        {
          "clientName": "Client Name",
          "amountCharged": "Amount"
        }
        "#);
    }

    #[test]
    fn deserialize_rejects_shared_header() {
        let json = r#"{"clientName":"Name","clientEmail":"Name"}"#;
        let result: serde_json::Result<HeaderMapping> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{"clientName":"Name","clientEmail":"Email"}"#;
        let mapping: HeaderMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.get(LogicalField::ClientEmail), Some("Email"));
    }
}
