//! # formeasy
//!
//! Per-form state tracking and asynchronous validation for Rust UIs.
//!
//! A [`FormController`] hands out field bindings, tracks what the user typed,
//! and keeps a map of validation errors up to date:
//!
//! - **blur** revalidates the blurred field
//! - **change** revalidates a field only once it carries errors
//! - **submit** revalidates every field and runs the callback only for a valid form
//!
//! Validation is delegated to a [`ValidationEngine`]. The `rules` feature
//! (enabled by default) ships a rule-based engine and built-in field rules.
//!
//! ## Feature Flags
//!
//! - `rules` (default) - Built-in field rules and [`forms::rules::RuleEngine`]
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use formeasy::prelude::*;
//!
//! let form = FormController::new(RuleEngine::new());
//! let email = form.subscribe(
//!     FieldDescriptor::new(FieldAttribute::new("email").with_type("email"))
//!         .with_validation(Rules::new().with(Required::new()).with(Email::new())),
//! );
//!
//! // Handlers queue validations; `settled` runs them
//! email.on_blur.call(&InputEvent::new("email", "not-an-email"));
//! form.settled().await;
//! assert!(form.is_dirty("email"));
//! ```

pub mod forms;

pub use formeasy_forms::{
	ControllerConfig, FieldAttribute, FieldBinding, FieldDescriptor, FieldErrors, FieldOutcome,
	FieldValues, FormController, FormError, FormResult, FormSubmitEvent, InputEvent,
	SubmitBinding, SubmitEvent, SubmitOutcome, ValidationEngine, ValidityMode,
};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::{
		ControllerConfig, FieldAttribute, FieldBinding, FieldDescriptor, FieldErrors,
		FormController, FormError, FormResult, FormSubmitEvent, InputEvent, SubmitEvent,
		SubmitOutcome, ValidationEngine, ValidityMode,
	};
	pub use formeasy_forms::{EngineError, Schema, ValidationFailure, ValidationIssue};

	// External
	pub use async_trait::async_trait;

	// Rules feature - built-in rule engine
	#[cfg(feature = "rules")]
	pub use formeasy_forms::rules::{
		Email, FieldRule, FnRule, MaxLength, MinLength, Pattern, Required, RuleEngine, Rules, Url,
	};
}
