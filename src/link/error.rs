//! Error types for reading a record out of an issue body.
//!
//! These never abort a run: the dispatcher logs them against the issue number and moves on.

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("no ```json block found")]
	NoBlock,

	#[error("empty JSON block")]
	EmptyBlock,

	#[error("invalid JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("JSON block holds {found}, expected an object")]
	NotAnObject { found: &'static str },
}
