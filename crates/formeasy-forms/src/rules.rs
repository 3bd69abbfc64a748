//! Built-in field rules and a rule-based validation engine
//!
//! Rules are capability objects: anything implementing [`FieldRule`] can sit
//! in a field's [`Rules`], and [`RuleEngine`] runs them for every field of a
//! schema slice.
//!
//! ## Security Note
//!
//! These checks are for UX only. Server-side validation is always required.

use crate::engine::{
	EngineError, Schema, ValidationEngine, ValidationFailure, ValidationIssue,
};
use crate::state::FieldValues;
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("URL_REGEX: invalid regex pattern")
});

/// A single check applied to a field value.
pub trait FieldRule: Send + Sync {
	/// Returns the messages for `value`; empty when it passes.
	fn validate(&self, value: &str) -> Vec<String>;
}

fn check(passed: bool, message: &str) -> Vec<String> {
	if passed {
		Vec::new()
	} else {
		vec![message.to_string()]
	}
}

/// Rejects blank values.
#[derive(Debug, Clone)]
pub struct Required {
	message: String,
}

impl Required {
	pub fn new() -> Self {
		Self {
			message: "This field is required.".to_string(),
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

impl Default for Required {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldRule for Required {
	fn validate(&self, value: &str) -> Vec<String> {
		check(!value.trim().is_empty(), &self.message)
	}
}

/// Requires an email address. Empty values pass; combine with [`Required`].
///
/// # Examples
///
/// ```
/// use formeasy_forms::rules::{Email, FieldRule};
///
/// let rule = Email::new();
/// assert!(rule.validate("user@example.com").is_empty());
/// assert!(rule.validate("").is_empty());
/// assert_eq!(rule.validate("user@"), ["Enter a valid email address"]);
/// ```
#[derive(Debug, Clone)]
pub struct Email {
	message: String,
}

impl Email {
	pub fn new() -> Self {
		Self {
			message: "Enter a valid email address".to_string(),
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

impl Default for Email {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldRule for Email {
	fn validate(&self, value: &str) -> Vec<String> {
		check(value.is_empty() || EMAIL_REGEX.is_match(value), &self.message)
	}
}

/// Requires an http(s) URL. Empty values pass.
#[derive(Debug, Clone)]
pub struct Url {
	message: String,
}

impl Url {
	pub fn new() -> Self {
		Self {
			message: "Enter a valid URL".to_string(),
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

impl Default for Url {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldRule for Url {
	fn validate(&self, value: &str) -> Vec<String> {
		check(value.is_empty() || URL_REGEX.is_match(value), &self.message)
	}
}

/// Requires at least `min` characters.
#[derive(Debug, Clone)]
pub struct MinLength {
	min: usize,
	message: String,
}

impl MinLength {
	pub fn new(min: usize) -> Self {
		Self {
			min,
			message: format!("This field must be at least {} characters long", min),
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

impl FieldRule for MinLength {
	fn validate(&self, value: &str) -> Vec<String> {
		check(value.chars().count() >= self.min, &self.message)
	}
}

/// Allows at most `max` characters.
#[derive(Debug, Clone)]
pub struct MaxLength {
	max: usize,
	message: String,
}

impl MaxLength {
	pub fn new(max: usize) -> Self {
		Self {
			max,
			message: format!("This field must be at most {} characters long", max),
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

impl FieldRule for MaxLength {
	fn validate(&self, value: &str) -> Vec<String> {
		check(value.chars().count() <= self.max, &self.message)
	}
}

/// Requires the value to match a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
	regex: Regex,
	message: String,
}

impl Pattern {
	/// Compiles `pattern`.
	///
	/// # Examples
	///
	/// ```
	/// use formeasy_forms::rules::{FieldRule, Pattern};
	///
	/// let rule = Pattern::new(r"^\d{5}$").unwrap().with_message("Enter a 5 digit zip code");
	/// assert!(rule.validate("12345").is_empty());
	/// assert_eq!(rule.validate("1234"), ["Enter a 5 digit zip code"]);
	/// ```
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			regex: Regex::new(pattern)?,
			message: "Enter a valid value".to_string(),
		})
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

impl FieldRule for Pattern {
	fn validate(&self, value: &str) -> Vec<String> {
		check(self.regex.is_match(value), &self.message)
	}
}

/// Adapts a closure returning `Err(message)` on failure.
pub struct FnRule<F> {
	check: F,
}

impl<F> FnRule<F>
where
	F: Fn(&str) -> Result<(), String> + Send + Sync,
{
	pub fn new(check: F) -> Self {
		Self { check }
	}
}

impl<F> FieldRule for FnRule<F>
where
	F: Fn(&str) -> Result<(), String> + Send + Sync,
{
	fn validate(&self, value: &str) -> Vec<String> {
		match (self.check)(value) {
			Ok(()) => Vec::new(),
			Err(message) => vec![message],
		}
	}
}

impl<F> fmt::Debug for FnRule<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnRule").finish_non_exhaustive()
	}
}

/// Ordered rules for one field. Messages accumulate in rule order.
#[derive(Clone, Default)]
pub struct Rules {
	rules: Vec<Arc<dyn FieldRule>>,
}

impl Rules {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a rule.
	pub fn with(mut self, rule: impl FieldRule + 'static) -> Self {
		self.rules.push(Arc::new(rule));
		self
	}

	pub fn validate(&self, value: &str) -> Vec<String> {
		self.rules
			.iter()
			.flat_map(|rule| rule.validate(value))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

impl fmt::Debug for Rules {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rules")
			.field("len", &self.rules.len())
			.finish()
	}
}

/// Validation engine running [`Rules`] per field.
///
/// Fields missing from the value slice are checked as empty strings.
/// Issues are reported in schema order, then rule order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait(?Send)]
impl ValidationEngine for RuleEngine {
	type Rule = Rules;

	async fn validate(
		&self,
		schema: &Schema<Rules>,
		values: &FieldValues,
	) -> Result<(), EngineError> {
		let issues: Vec<ValidationIssue> = schema
			.iter()
			.flat_map(|(path, rules)| {
				let value = values.get(path).map(String::as_str).unwrap_or("");
				rules
					.validate(value)
					.into_iter()
					.map(move |message| ValidationIssue::new(path.as_str(), message))
			})
			.collect();

		if issues.is_empty() {
			Ok(())
		} else {
			Err(EngineError::Validation(ValidationFailure::new(issues)))
		}
	}
}
