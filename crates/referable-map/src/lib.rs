//! CSV header auto-mapping for client-history imports.
//!
//! Headers from an uploaded file are matched against fixed synonym lists for
//! each [`LogicalField`](referable_model::LogicalField). Matching is exact
//! after normalization, so the outcome is deterministic; anything the
//! auto-mapper misses is fixed up by hand through [`MappingState`].
//!
//! # Example
//!
//! ```
//! use referable_map::{MappingState, auto_map};
//! use referable_model::LogicalField;
//!
//! let headers = vec!["Customer".to_string(), "E-Mail".to_string(), "Notes".to_string()];
//! let result = auto_map(&headers);
//! assert_eq!(result.mapping.get(LogicalField::ClientName), Some("Customer"));
//! assert!(!result.all_required_mapped);
//!
//! let mut state = MappingState::from_auto_map(headers, result);
//! state.set_mapping(LogicalField::ServiceDate, Some("Notes")).unwrap();
//! assert!(state.extra_fields().is_empty());
//! ```

mod engine;
mod error;
mod patterns;
mod state;
mod utils;

pub use engine::{AutoMapResult, auto_map, derive_extra_fields};
pub use error::{MappingError, Result};
pub use patterns::{match_synonyms, matches, synonyms};
pub use state::{MappingState, MappingSummary, can_submit};
pub use utils::{is_blank_header, normalize_text as normalize};
