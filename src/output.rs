//! Writing one JSON file per group.

use std::{
	fs, io,
	path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{config::Settings, group::GroupedLinks, link::LinkRecord};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
	#[error("failed to create output directory {}", path.display())]
	CreateDir {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to serialize group `{group}`")]
	Serialize {
		group: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to write {}", path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

/// Contents of `<group>.json`.
#[derive(Debug, Serialize)]
pub struct GroupFile<'a> {
	pub version: &'a str,
	pub config: &'a Settings,
	pub label: &'a str,
	pub content: Vec<&'a LinkRecord>,
}

/// Four-space indented JSON; non-ASCII text is written as is.
pub fn render(file: &GroupFile<'_>) -> Result<Vec<u8>, serde_json::Error> {
	let mut buf = Vec::new();
	let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
	file.serialize(&mut ser)?;
	Ok(buf)
}

/// Write every group (always including `all`) into `dir`, creating it if needed.
pub fn write_groups(dir: &Path, grouped: &GroupedLinks, settings: &Settings) -> Result<Vec<PathBuf>, OutputError> {
	fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir { path: dir.to_path_buf(), source })?;

	let mut written = Vec::new();
	for (label, content) in grouped.iter() {
		let file = GroupFile {
			version: VERSION,
			config: settings,
			label,
			content,
		};
		let bytes = render(&file).map_err(|source| OutputError::Serialize { group: label.to_string(), source })?;

		let path = dir.join(format!("{label}.json"));
		fs::write(&path, bytes).map_err(|source| OutputError::Write { path: path.clone(), source })?;
		tracing::info!("Generated file: {}", path.display());
		written.push(path);
	}

	Ok(written)
}
