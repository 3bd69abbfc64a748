//! Controller configuration
//!
//! Configuration can be built in code or loaded from JSON:
//!
//! ```
//! use formeasy_forms::{ControllerConfig, ValidityMode};
//!
//! let config = ControllerConfig::from_json(r#"{ "validity": "last_key" }"#).unwrap();
//! assert_eq!(config.validity, ValidityMode::LastKey);
//! assert!(config.revalidate_on_change);
//! assert!(config.version_guard);
//! ```

use crate::engine::ErrorReport;
use crate::error::FormResult;
use serde::{Deserialize, Serialize};

/// How a whole-form report is reduced to a single verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityMode {
	/// Valid only if no field in the report carries a message.
	#[default]
	AllFields,
	/// Legacy reduction: the verdict is whether the last enumerated field of
	/// the report is clean, starting from `false` for an empty report.
	LastKey,
}

impl ValidityMode {
	/// Reduces an unsanitized engine report to a verdict.
	///
	/// # Examples
	///
	/// ```
	/// use formeasy_forms::ValidityMode;
	/// use indexmap::IndexMap;
	///
	/// let report = IndexMap::from([
	/// 	("email".to_string(), vec!["required".to_string()]),
	/// 	("name".to_string(), vec![]),
	/// ]);
	///
	/// assert!(!ValidityMode::AllFields.verdict(&report));
	/// assert!(ValidityMode::LastKey.verdict(&report));
	/// ```
	pub fn verdict(self, report: &ErrorReport) -> bool {
		match self {
			Self::AllFields => report.values().all(Vec::is_empty),
			Self::LastKey => report
				.values()
				.fold(false, |_, messages| messages.is_empty()),
		}
	}
}

/// Behavior switches for a [`FormController`](crate::FormController).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
	/// Verdict reduction used by whole-form validation
	pub validity: ValidityMode,

	/// Revalidate a field on change when it already carries errors
	pub revalidate_on_change: bool,

	/// Drop validation results superseded by a newer validation
	pub version_guard: bool,
}

impl Default for ControllerConfig {
	fn default() -> Self {
		Self {
			validity: ValidityMode::AllFields,
			revalidate_on_change: true,
			version_guard: true,
		}
	}
}

impl ControllerConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a configuration from JSON. Missing keys take their defaults.
	pub fn from_json(json: &str) -> FormResult<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn with_validity(mut self, validity: ValidityMode) -> Self {
		self.validity = validity;
		self
	}

	pub fn with_revalidate_on_change(mut self, enabled: bool) -> Self {
		self.revalidate_on_change = enabled;
		self
	}

	pub fn with_version_guard(mut self, enabled: bool) -> Self {
		self.version_guard = enabled;
		self
	}
}
