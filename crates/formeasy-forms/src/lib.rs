//! Form state tracking and validation orchestration for formeasy
//!
//! This crate provides a per-form controller that:
//! - Tracks field values and validation errors
//! - Hands out field bindings that UI inputs mount against
//! - Revalidates a single field on blur, or on change once the field is dirty
//! - Revalidates the whole form on submit and gates the submit callback
//!
//! The validation engine is a collaborator behind the [`ValidationEngine`]
//! trait. The `rules` feature ships a rule-based engine ([`rules::RuleEngine`])
//! with a handful of built-in field rules.
//!
//! ## Example
//!
//! ```ignore
//! use formeasy_forms::{FieldAttribute, FieldDescriptor, FormController, InputEvent};
//! use formeasy_forms::rules::{Email, Required, RuleEngine, Rules};
//!
//! let form = FormController::new(RuleEngine::new());
//! let email = form.subscribe(
//! 	FieldDescriptor::new(FieldAttribute::new("email").with_label("Email"))
//! 		.with_validation(Rules::new().with(Required::new()).with(Email::new())),
//! );
//!
//! // Handlers queue the validation; `settled` runs it
//! email.on_blur.call(&InputEvent::new("email", "bad"));
//! form.settled().await;
//! assert!(form.is_dirty("email"));
//! ```

pub mod binding;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod registry;
#[cfg(feature = "rules")]
pub mod rules;
pub mod state;
mod tasks;

pub use binding::{
	FieldBinding, FormSubmitEvent, InputEvent, InputHandler, SubmitBinding, SubmitEvent,
	SubmitOutcome,
};
pub use config::{ControllerConfig, ValidityMode};
pub use controller::{FieldOutcome, FormController};
pub use engine::{
	EngineError, ErrorReport, Schema, ValidationEngine, ValidationFailure, ValidationIssue,
};
pub use error::{FormError, FormResult};
pub use registry::{FieldAttribute, FieldDescriptor, FieldRegistry};
pub use state::{FieldErrors, FieldValues};
