//! Field and submit bindings
//!
//! A [`FieldBinding`] is what a UI input mounts against: its current value,
//! its errors and the change/blur handlers that feed events back into the
//! controller. A [`SubmitBinding`] wraps the caller's submit callback behind
//! whole-form validation.
//!
//! ## Event flow
//!
//! ```text
//! ┌─────────┐  on_change / on_blur   ┌────────────────┐   validate   ┌────────┐
//! │  Input  │───────────────────────▶│ FormController │─────────────▶│ Engine │
//! │         │◀───────────────────────│                │◀─────────────│        │
//! └─────────┘  value / errors        └────────────────┘   report     └────────┘
//! ```

use crate::controller::FormController;
use crate::engine::ValidationEngine;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Change or blur event raised by an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
	/// Name of the input that raised the event
	pub name: String,
	/// Value of the input at the time of the event
	pub value: String,
}

impl InputEvent {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
	Change,
	Blur,
}

/// Type-erased receiver of input events.
pub(crate) trait InputSink {
	fn dispatch(&self, trigger: Trigger, event: &InputEvent);

	/// Address identifying the controller behind this sink.
	fn identity(&self) -> *const ();
}

/// Change or blur handler handed out with a field binding.
///
/// Handlers from the same controller and of the same kind compare equal.
#[derive(Clone)]
pub struct InputHandler {
	sink: Rc<dyn InputSink>,
	trigger: Trigger,
}

impl InputHandler {
	pub(crate) fn new(sink: Rc<dyn InputSink>, trigger: Trigger) -> Self {
		Self { sink, trigger }
	}

	/// Feeds `event` into the controller.
	///
	/// Validation triggered by the event is queued; see
	/// [`FormController::settled`] to run it.
	pub fn call(&self, event: &InputEvent) {
		self.sink.dispatch(self.trigger, event);
	}
}

impl PartialEq for InputHandler {
	fn eq(&self, other: &Self) -> bool {
		self.trigger == other.trigger && self.sink.identity() == other.sink.identity()
	}
}

impl fmt::Debug for InputHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InputHandler")
			.field("trigger", &self.trigger)
			.finish_non_exhaustive()
	}
}

/// Contract object a UI field mounts against.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
	pub name: String,
	pub label: String,
	pub input_type: String,
	/// Effective value: typed value, else initial value, else empty
	pub value: String,
	pub on_change: InputHandler,
	/// Current messages, `None` when the field has no recorded errors
	pub errors: Option<Vec<String>>,
	pub on_blur: InputHandler,
	/// Extra input attributes from the field descriptor
	pub attributes: IndexMap<String, String>,
}

impl FieldBinding {
	pub fn has_errors(&self) -> bool {
		self.errors.is_some()
	}
}

/// Event that can suppress its default action (e.g. a native form post).
pub trait SubmitEvent {
	fn prevent_default(&mut self);
}

/// Plain submit event for hosts without a native event object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmitEvent {
	default_prevented: bool,
}

impl FormSubmitEvent {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_default_prevented(&self) -> bool {
		self.default_prevented
	}
}

impl SubmitEvent for FormSubmitEvent {
	fn prevent_default(&mut self) {
		self.default_prevented = true;
	}
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Validation passed and the callback ran
	Submitted,
	/// Validation failed; errors are populated and the callback did not run
	Rejected,
}

impl SubmitOutcome {
	pub fn is_submitted(self) -> bool {
		matches!(self, Self::Submitted)
	}
}

/// Submit handler returned by [`FormController::on_submit`].
pub struct SubmitBinding<E: ValidationEngine, F> {
	controller: FormController<E>,
	callback: F,
}

impl<E: ValidationEngine, F> SubmitBinding<E, F> {
	pub(crate) fn new(controller: FormController<E>, callback: F) -> Self {
		Self {
			controller,
			callback,
		}
	}
}

impl<E, F> SubmitBinding<E, F>
where
	E: ValidationEngine + 'static,
{
	/// Suppresses the default action, validates the whole form and runs the
	/// callback with the original event only if the form is valid.
	pub async fn on_submit<Ev>(&self, mut event: Ev) -> SubmitOutcome
	where
		Ev: SubmitEvent,
		F: Fn(&Ev),
	{
		event.prevent_default();

		if !self.controller.validate_form().await {
			tracing::debug!("Submit rejected: form is invalid");
			return SubmitOutcome::Rejected;
		}

		(self.callback)(&event);
		SubmitOutcome::Submitted
	}
}

impl<E: ValidationEngine, F> fmt::Debug for SubmitBinding<E, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubmitBinding").finish_non_exhaustive()
	}
}
