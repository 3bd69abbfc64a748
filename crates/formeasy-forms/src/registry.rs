//! Field registration table
//!
//! Every render pass re-subscribes the mounted fields. Each subscription
//! upserts the field's initial value and rule into a [`FieldRegistry`], so the
//! table always reflects the last descriptor seen for a name.

use crate::engine::Schema;
use crate::state::FieldValues;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Input type used when a field does not set one.
pub const DEFAULT_INPUT_TYPE: &str = "text";

/// Presentation attributes of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAttribute {
	/// Unique field name within the form
	pub name: String,
	/// Human readable label
	pub label: String,
	/// Input type (e.g. `text`, `email`, `password`)
	pub input_type: String,
	/// Extra input attributes passed through to the binding untouched
	#[serde(default)]
	pub extra: IndexMap<String, String>,
}

impl FieldAttribute {
	/// Creates a text field whose label is its name.
	///
	/// # Examples
	///
	/// ```
	/// use formeasy_forms::FieldAttribute;
	///
	/// let attribute = FieldAttribute::new("email")
	/// 	.with_label("Email address")
	/// 	.with_type("email")
	/// 	.with_attribute("placeholder", "you@example.com");
	///
	/// assert_eq!(attribute.name, "email");
	/// assert_eq!(attribute.input_type, "email");
	/// assert_eq!(attribute.extra["placeholder"], "you@example.com");
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			label: name.clone(),
			name,
			input_type: DEFAULT_INPUT_TYPE.to_string(),
			extra: IndexMap::new(),
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
		self.input_type = input_type.into();
		self
	}

	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}
}

/// Everything a field hands to `subscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor<R> {
	pub attribute: FieldAttribute,
	/// Default value; `None` registers an empty string
	pub initial_value: Option<String>,
	/// Rule descriptor handed to the validation engine
	pub validation: Option<R>,
}

impl<R> FieldDescriptor<R> {
	pub fn new(attribute: FieldAttribute) -> Self {
		Self {
			attribute,
			initial_value: None,
			validation: None,
		}
	}

	pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
		self.initial_value = Some(value.into());
		self
	}

	pub fn with_validation(mut self, rule: R) -> Self {
		self.validation = Some(rule);
		self
	}
}

/// Initial values and rules of the currently registered fields.
#[derive(Debug, Clone)]
pub struct FieldRegistry<R> {
	initial_values: FieldValues,
	schema: Schema<R>,
}

impl<R> Default for FieldRegistry<R> {
	fn default() -> Self {
		Self {
			initial_values: FieldValues::new(),
			schema: Schema::new(),
		}
	}
}

impl<R> FieldRegistry<R> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Upserts a field. A later registration under the same name wins,
	/// including dropping a rule the earlier one had.
	pub fn register(&mut self, name: &str, initial_value: String, rule: Option<R>) {
		self.initial_values.insert(name.to_string(), initial_value);
		match rule {
			Some(rule) => {
				self.schema.insert(name.to_string(), rule);
			}
			None => {
				self.schema.shift_remove(name);
			}
		}
	}

	/// Forgets every registration.
	pub fn clear(&mut self) {
		self.initial_values.clear();
		self.schema.clear();
	}

	pub fn contains(&self, name: &str) -> bool {
		self.initial_values.contains_key(name)
	}

	pub fn initial_value(&self, name: &str) -> Option<&str> {
		self.initial_values.get(name).map(String::as_str)
	}

	pub fn rule(&self, name: &str) -> Option<&R> {
		self.schema.get(name)
	}

	pub fn initial_values(&self) -> &FieldValues {
		&self.initial_values
	}

	pub fn schema(&self) -> &Schema<R> {
		&self.schema
	}

	pub fn field_names(&self) -> impl Iterator<Item = &String> {
		self.initial_values.keys()
	}

	pub fn len(&self) -> usize {
		self.initial_values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.initial_values.is_empty()
	}
}
