//! Form controller, bindings and validation engine contract
//!
//! This module provides access to formeasy-forms, which tracks the values and
//! errors of a form and orchestrates asynchronous validation on blur, on
//! change (once a field is dirty) and on submit.
//!
//! ## Example
//!
//! ```rust,ignore
//! use formeasy::forms::{FieldAttribute, FieldDescriptor, FormController, FormSubmitEvent};
//! use formeasy::forms::rules::{Required, RuleEngine, Rules};
//!
//! let form = FormController::new(RuleEngine::new());
//! let name = form.subscribe(
//!     FieldDescriptor::new(FieldAttribute::new("name"))
//!         .with_validation(Rules::new().with(Required::new())),
//! );
//!
//! let submit = form.on_submit(|_event: &FormSubmitEvent| println!("submitted"));
//! submit.on_submit(FormSubmitEvent::new()).await;
//! ```

// Re-export all formeasy-forms functionality
pub use formeasy_forms::*;
