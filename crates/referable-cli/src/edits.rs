//! Manual mapping edits given on the command line.

use std::fmt;
use std::str::FromStr;

use referable_model::LogicalField;

/// One `FIELD=HEADER` edit. An empty header clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEdit {
    pub field: LogicalField,
    pub header: Option<String>,
}

impl MappingEdit {
    pub fn clear(field: LogicalField) -> Self {
        Self {
            field,
            header: None,
        }
    }
}

impl FromStr for MappingEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((field, header)) = s.split_once('=') else {
            return Err(format!("expected FIELD=HEADER, got `{s}`"));
        };
        let field = parse_field(field)?;
        // Headers are matched exactly as read, and the reader trims cells.
        let header = header.trim();
        Ok(Self {
            field,
            header: (!header.is_empty()).then(|| header.to_string()),
        })
    }
}

impl fmt::Display for MappingEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.header {
            Some(header) => write!(f, "{}={header}", self.field),
            None => write!(f, "{}=", self.field),
        }
    }
}

/// Parses a field name, listing valid names on failure.
pub fn parse_field(value: &str) -> Result<LogicalField, String> {
    value.parse().map_err(|_| {
        let names: Vec<&str> = LogicalField::ALL.iter().map(LogicalField::name).collect();
        format!(
            "unknown field `{}` (expected one of: {})",
            value.trim(),
            names.join(", ")
        )
    })
}

/// Clears first, then assignments in the order given.
pub fn ordered_edits(clears: &[LogicalField], maps: &[MappingEdit]) -> Vec<MappingEdit> {
    clears
        .iter()
        .copied()
        .map(MappingEdit::clear)
        .chain(maps.iter().cloned())
        .collect()
}
