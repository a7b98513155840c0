//! Friendly-link records and the parsers that pull them out of issue bodies.
//!
//! Two body formats are accepted:
//! - a fenced ` ```json ` block whose top-level keys become the record fields verbatim;
//! - an issue-form body of `###` headed sections, mapped through a fixed heading table onto
//!   the six record fields.
//!
//! [`parse_issue`] tries them in that order and never fails: an issue nothing can read still
//! yields a record carrying only its originating issue.

mod error;
pub use error::ParseError;

mod sectioned;
pub use sectioned::{FIELD_HEADINGS, HEADING_MARKER, NO_RESPONSE};

mod strategy;
pub use strategy::{Strategy, parse_issue};

mod structured;

mod types;
pub use types::{LinkRecord, fields};
