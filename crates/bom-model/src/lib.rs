//! Row model for bill-of-materials uploads.
//!
//! Rows arrive as flat records. Each row is classified once, by the first
//! non-empty identifying field, into a [`RowKind`]; the hierarchy between
//! systems, assemblies, parts and steps is implied by row order only.

pub mod enums;
pub mod error;
pub mod row;
pub mod validate;

pub use enums::{FsukSystem, MAXIMUM_QUANTITY, MakeOrBuy, StepType};
pub use error::RowError;
pub use row::{Row, RowData, RowKind, UNDEFINED_IDENTIFIER};
pub use validate::{RowIssue, report_issues, validate_all, validation_issues};
