//! Controller-owned form state
//!
//! [`FieldValues`] holds what the user typed, [`FieldErrors`] what the last
//! validations reported. `FieldErrors` never stores an empty message list:
//! every write path goes through [`sanitize`].

use crate::engine::ErrorReport;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field name → current value.
pub type FieldValues = IndexMap<String, String>;

/// Drops every entry whose message list is empty.
///
/// # Examples
///
/// ```
/// use formeasy_forms::state::sanitize;
/// use indexmap::IndexMap;
///
/// let mut report = IndexMap::new();
/// report.insert("email".to_string(), vec!["required".to_string()]);
/// report.insert("name".to_string(), vec![]);
///
/// let clean = sanitize(report);
/// assert_eq!(clean.len(), 1);
/// assert!(clean.contains_key("email"));
/// ```
pub fn sanitize(mut report: ErrorReport) -> ErrorReport {
	report.retain(|_, messages| !messages.is_empty());
	report
}

/// Field name → non-empty list of validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(ErrorReport);

impl FieldErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a sanitized error map from an engine report.
	pub fn from_report(report: ErrorReport) -> Self {
		Self(sanitize(report))
	}

	/// Messages recorded for `name`, if any.
	pub fn get(&self, name: &str) -> Option<&[String]> {
		self.0.get(name).map(Vec::as_slice)
	}

	/// Whether `name` currently carries at least one message.
	pub fn has_errors(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
		self.0.iter()
	}

	pub fn field_names(&self) -> impl Iterator<Item = &String> {
		self.0.keys()
	}

	/// Overlays `report` on the current entries, then sanitizes.
	///
	/// Only keys present in `report` change; an empty list in the report
	/// clears that field.
	///
	/// # Examples
	///
	/// ```
	/// use formeasy_forms::FieldErrors;
	/// use indexmap::IndexMap;
	///
	/// let mut errors = FieldErrors::new();
	/// errors.merge(IndexMap::from([
	/// 	("email".to_string(), vec!["required".to_string()]),
	/// 	("name".to_string(), vec!["too short".to_string()]),
	/// ]));
	/// errors.merge(IndexMap::from([("email".to_string(), vec![])]));
	///
	/// assert!(!errors.has_errors("email"));
	/// assert_eq!(errors.get("name").unwrap(), ["too short"]);
	/// ```
	pub fn merge(&mut self, report: ErrorReport) {
		self.0.extend(report);
		self.0.retain(|_, messages| !messages.is_empty());
	}

	/// Sets or clears the entry for a single field.
	pub(crate) fn set(&mut self, name: &str, messages: Option<Vec<String>>) {
		match messages {
			Some(messages) if !messages.is_empty() => {
				self.0.insert(name.to_string(), messages);
			}
			_ => {
				self.0.shift_remove(name);
			}
		}
	}

	pub(crate) fn remove(&mut self, name: &str) -> Option<Vec<String>> {
		self.0.shift_remove(name)
	}

	pub fn as_map(&self) -> &ErrorReport {
		&self.0
	}

	pub fn into_inner(self) -> ErrorReport {
		self.0
	}
}

/// Stamp of an in-flight whole-form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FormTicket {
	pub(crate) stamp: u64,
	/// Form stamp to restore if this validation is abandoned
	previous: u64,
}

/// Mutable state shared by every handle of one controller.
#[derive(Debug, Default)]
pub(crate) struct FormState {
	pub(crate) values: FieldValues,
	pub(crate) errors: FieldErrors,
	/// Monotonic counter shared by field and form validations
	last_stamp: u64,
	/// Latest stamp issued per field
	field_stamps: HashMap<String, u64>,
	/// Latest stamp issued to a whole-form validation
	form_stamp: u64,
}

impl FormState {
	fn next_stamp(&mut self) -> u64 {
		self.last_stamp += 1;
		self.last_stamp
	}

	/// Issues a new stamp for a single-field validation.
	pub(crate) fn begin_field_validation(&mut self, name: &str) -> u64 {
		let stamp = self.next_stamp();
		self.field_stamps.insert(name.to_string(), stamp);
		stamp
	}

	pub(crate) fn is_latest_field_stamp(&self, name: &str, stamp: u64) -> bool {
		self.field_stamps.get(name) == Some(&stamp)
	}

	/// Issues a form stamp, superseding every older form validation.
	pub(crate) fn begin_form_validation(&mut self) -> FormTicket {
		let previous = self.form_stamp;
		let stamp = self.next_stamp();
		self.form_stamp = stamp;
		FormTicket { stamp, previous }
	}

	/// Withdraws a form validation that produced no result.
	pub(crate) fn abandon_form_validation(&mut self, ticket: FormTicket) {
		if self.form_stamp == ticket.stamp {
			self.form_stamp = ticket.previous;
		}
	}

	pub(crate) fn is_latest_form_stamp(&self, stamp: u64) -> bool {
		self.form_stamp == stamp
	}

	/// Fields whose validation started after the given stamp was issued.
	pub(crate) fn revalidated_after(&self, stamp: u64) -> Vec<String> {
		self.field_stamps
			.iter()
			.filter(|(_, issued)| **issued > stamp)
			.map(|(name, _)| name.clone())
			.collect()
	}

	/// Marks field validations of `fields` started before `stamp` as stale.
	pub(crate) fn supersede_fields<'a>(
		&mut self,
		stamp: u64,
		fields: impl IntoIterator<Item = &'a String>,
	) {
		for name in fields {
			let issued = self.field_stamps.entry(name.clone()).or_default();
			*issued = (*issued).max(stamp);
		}
	}

	/// Clears values and errors and orphans every in-flight validation.
	pub(crate) fn reset(&mut self) {
		self.values.clear();
		self.errors = FieldErrors::new();
		self.field_stamps.clear();
		self.form_stamp = self.next_stamp();
	}
}
