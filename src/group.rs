//! Splitting the record list into the configured groups.
//!
//! Records live once, in [`GroupedLinks`]; each group is a list of indices into that store,
//! so anything done to a record afterwards (stripping `raw`) shows up in every group alike.

use crate::{
	config::{ALL_GROUP, GroupConfig},
	link::LinkRecord,
};

/// Indices of the records `group` admits, in input order.
///
/// The state filter narrows first, then the label filter; a record must carry at least the
/// required labels, extra ones are fine.
pub fn select(records: &[LinkRecord], group: &GroupConfig) -> Vec<usize> {
	records
		.iter()
		.enumerate()
		.filter(|(_, record)| group.state.admits(record.issue_state()))
		.filter(|(_, record)| group.labels.is_empty() || record.has_labels(&group.labels))
		.map(|(i, _)| i)
		.collect()
}

#[derive(Clone, Debug, Default)]
pub struct GroupedLinks {
	records: Vec<LinkRecord>,
	/// `all` first, then configured groups in configuration order.
	groups: Vec<(String, Vec<usize>)>,
}

impl GroupedLinks {
	pub fn build(records: Vec<LinkRecord>, groups: &[GroupConfig]) -> Self {
		let mut out = Vec::with_capacity(groups.len() + 1);
		out.push((ALL_GROUP.to_string(), (0..records.len()).collect()));

		for group in groups {
			let selected = select(&records, group);
			tracing::info!("Group '{}': {} issues", group.name, selected.len());
			out.push((group.name.clone(), selected));
		}

		Self { records, groups: out }
	}

	/// Every record, in input order.
	pub fn records(&self) -> &[LinkRecord] {
		&self.records
	}

	pub fn group_names(&self) -> impl Iterator<Item = &str> {
		self.groups.iter().map(|(name, _)| name.as_str())
	}

	pub fn group(&self, name: &str) -> Option<Vec<&LinkRecord>> {
		self.groups.iter().find(|(n, _)| n == name).map(|(_, indices)| self.resolve(indices))
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<&LinkRecord>)> {
		self.groups.iter().map(|(name, indices)| (name.as_str(), self.resolve(indices)))
	}

	/// Remove `raw` from every record, hence from every group.
	pub fn strip_raw(&mut self) {
		for record in &mut self.records {
			record.strip_raw();
		}
	}

	fn resolve(&self, indices: &[usize]) -> Vec<&LinkRecord> {
		indices.iter().map(|&i| &self.records[i]).collect()
	}
}
