//! Validation engine contract
//!
//! The controller never interprets rule descriptors. It hands a schema slice
//! (field name → rule) and a value slice (field name → value) to a
//! [`ValidationEngine`] and folds whatever comes back into an [`ErrorReport`].
//!
//! ## Outcome shapes
//!
//! - `Ok(())`: every submitted field is clean. The report maps each submitted
//!   field name to an empty message list.
//! - `Err(EngineError::Validation(..))`: a structured failure. Its issues are
//!   folded by path, accumulating messages in encounter order.
//! - `Err(EngineError::Engine(..))`: the engine broke its contract. No report
//!   can be derived and callers keep their previous error state.

use crate::state::FieldValues;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Field name → rule descriptor, in registration order.
pub type Schema<R> = IndexMap<String, R>;

/// Field name → messages, as folded from one engine run. Unlike
/// [`FieldErrors`](crate::FieldErrors), entries may be empty.
pub type ErrorReport = IndexMap<String, Vec<String>>;

/// A single failed check reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
	/// Field name the message belongs to
	pub path: String,
	/// Human readable message
	pub message: String,
}

impl ValidationIssue {
	pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			message: message.into(),
		}
	}
}

/// Structured failure detail returned by an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
	/// Issues in the order the engine encountered them
	pub inner: Vec<ValidationIssue>,
}

impl ValidationFailure {
	pub fn new(inner: Vec<ValidationIssue>) -> Self {
		Self { inner }
	}

	/// Appends an issue, returning `self` for chaining.
	pub fn with_issue(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
		self.inner.push(ValidationIssue::new(path, message));
		self
	}

	/// Folds the issues into a report keyed by path.
	///
	/// # Examples
	///
	/// ```
	/// use formeasy_forms::ValidationFailure;
	///
	/// let report = ValidationFailure::default()
	/// 	.with_issue("password", "too short")
	/// 	.with_issue("email", "required")
	/// 	.with_issue("password", "needs a digit")
	/// 	.into_report();
	///
	/// let keys: Vec<_> = report.keys().map(String::as_str).collect();
	/// assert_eq!(keys, ["password", "email"]);
	/// assert_eq!(report["password"], ["too short", "needs a digit"]);
	/// ```
	pub fn into_report(self) -> ErrorReport {
		self.inner
			.into_iter()
			.fold(ErrorReport::new(), |mut report, issue| {
				report.entry(issue.path).or_default().push(issue.message);
				report
			})
	}
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("Validation failed with {} issue(s)", .0.inner.len())]
	Validation(ValidationFailure),
	#[error("Validation engine error: {0}")]
	Engine(String),
}

/// Asynchronous schema validator the controller delegates to.
///
/// Implementations are polled on a single thread, so futures need
/// not be `Send`.
#[async_trait(?Send)]
pub trait ValidationEngine {
	/// Rule descriptor stored per field and passed through verbatim.
	type Rule: Clone;

	/// Validates `values` against `schema`.
	async fn validate(
		&self,
		schema: &Schema<Self::Rule>,
		values: &FieldValues,
	) -> Result<(), EngineError>;
}

#[async_trait(?Send)]
impl<T: ValidationEngine> ValidationEngine for Rc<T> {
	type Rule = T::Rule;

	async fn validate(
		&self,
		schema: &Schema<Self::Rule>,
		values: &FieldValues,
	) -> Result<(), EngineError> {
		(**self).validate(schema, values).await
	}
}

/// Converts an engine outcome into a report for the submitted values.
///
/// Returns the engine error untouched when it is a contract violation.
pub fn build_report(
	outcome: Result<(), EngineError>,
	submitted: &FieldValues,
) -> Result<ErrorReport, EngineError> {
	match outcome {
		Ok(()) => Ok(submitted
			.keys()
			.map(|name| (name.clone(), Vec::new()))
			.collect()),
		Err(EngineError::Validation(failure)) => Ok(failure.into_report()),
		Err(err) => Err(err),
	}
}
