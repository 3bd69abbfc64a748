//! Form Controller
//!
//! [`FormController`] owns the values and errors of one form and orchestrates
//! validation:
//!
//! - **blur**: always revalidates the blurred field
//! - **change**: revalidates only if the field already carries errors, then
//!   stores the new value
//! - **submit**: revalidates every registered field and gates the callback on
//!   the verdict
//!
//! Change and blur validations are queued on the controller rather than
//! spawned on an ambient executor, so handlers work from any context.
//! [`FormController::settled`] drives the queue; on wasm32 a background
//! driver is started as well.
//!
//! Every validation takes a stamp from a monotonic counter when it starts. A
//! completion only lands if its stamp is still the latest issued for its
//! field (or, for whole-form validation, the latest form stamp). A form
//! result that lands marks older field validations of the submitted fields
//! stale. Disabling [`ControllerConfig::version_guard`] falls back to
//! last-write-wins.
//!
//! ## Example
//!
//! ```ignore
//! let form = FormController::new(RuleEngine::new());
//! let submit = form.on_submit(|_event: &FormSubmitEvent| println!("sent"));
//!
//! let email = form.subscribe(
//! 	FieldDescriptor::new(FieldAttribute::new("email").with_type("email"))
//! 		.with_validation(Rules::new().with(Required::new()).with(Email::new())),
//! );
//!
//! email.on_blur.call(&InputEvent::new("email", "a@b.com"));
//! form.settled().await;
//! let outcome = submit.on_submit(FormSubmitEvent::new()).await;
//! assert!(outcome.is_submitted());
//! ```

use crate::binding::{FieldBinding, InputEvent, InputHandler, InputSink, SubmitBinding, Trigger};
use crate::config::ControllerConfig;
use crate::engine::{Schema, ValidationEngine, build_report};
use crate::error::FormResult;
use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::state::{FieldErrors, FieldValues, FormState};
use crate::tasks::LocalTasks;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::{Future, poll_fn};
use std::pin::pin;
use std::rc::{Rc, Weak};
use std::task::Poll;
use tokio::sync::Notify;
use tracing::{debug, error, warn};

/// What became of a single-field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
	/// The result was stored; carries the field's messages after the merge
	Applied(Vec<String>),
	/// The field has no rule; its errors were cleared without an engine call
	NoRule,
	/// A newer validation of the field superseded this one
	Stale,
}

struct Inner<E: ValidationEngine> {
	engine: E,
	config: ControllerConfig,
	registry: RefCell<FieldRegistry<E::Rule>>,
	state: RefCell<FormState>,
	tasks: LocalTasks,
	pending: Cell<usize>,
	settle: Notify,
}

/// Per-form state and validation controller.
///
/// Cloning yields another handle to the same form.
pub struct FormController<E: ValidationEngine> {
	inner: Rc<Inner<E>>,
}

impl<E: ValidationEngine> Clone for FormController<E> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<E: ValidationEngine> fmt::Debug for FormController<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.borrow();
		f.debug_struct("FormController")
			.field("config", &self.inner.config)
			.field("values", &state.values)
			.field("errors", &state.errors)
			.field("pending", &self.inner.pending.get())
			.finish_non_exhaustive()
	}
}

/// Decrements the pending counter when a queued validation ends.
///
/// Holds a weak handle so queued work never keeps its controller alive.
struct PendingGuard<E: ValidationEngine> {
	inner: Weak<Inner<E>>,
}

impl<E: ValidationEngine> PendingGuard<E> {
	fn new(inner: &Rc<Inner<E>>) -> Self {
		inner.pending.set(inner.pending.get() + 1);
		Self {
			inner: Rc::downgrade(inner),
		}
	}
}

impl<E: ValidationEngine> Drop for PendingGuard<E> {
	fn drop(&mut self) {
		let Some(inner) = self.inner.upgrade() else {
			return;
		};
		let remaining = inner.pending.get().saturating_sub(1);
		inner.pending.set(remaining);
		if remaining == 0 {
			inner.settle.notify_waiters();
		}
	}
}

impl<E: ValidationEngine> FormController<E> {
	/// Creates a controller with the default configuration.
	pub fn new(engine: E) -> Self {
		Self::with_config(engine, ControllerConfig::default())
	}

	pub fn with_config(engine: E, config: ControllerConfig) -> Self {
		Self {
			inner: Rc::new(Inner {
				engine,
				config,
				registry: RefCell::new(FieldRegistry::new()),
				state: RefCell::new(FormState::default()),
				tasks: LocalTasks::default(),
				pending: Cell::new(0),
				settle: Notify::new(),
			}),
		}
	}

	pub fn config(&self) -> &ControllerConfig {
		&self.inner.config
	}

	pub fn engine(&self) -> &E {
		&self.inner.engine
	}

	/// Starts a render pass: forgets every registration so the fields
	/// subscribed during this pass define the schema. Values and errors
	/// are kept.
	pub fn begin_render_pass(&self) {
		self.inner.registry.borrow_mut().clear();
	}

	/// Clears values and errors and orphans in-flight validations.
	/// Registrations are kept.
	pub fn reset(&self) {
		self.inner.state.borrow_mut().reset();
		debug!("Form state reset");
	}

	/// Snapshot of the values typed so far.
	pub fn values(&self) -> FieldValues {
		self.inner.state.borrow().values.clone()
	}

	/// Snapshot of the current errors.
	pub fn errors(&self) -> FieldErrors {
		self.inner.state.borrow().errors.clone()
	}

	pub fn field_errors(&self, name: &str) -> Option<Vec<String>> {
		self.inner.state.borrow().errors.get(name).map(<[String]>::to_vec)
	}

	/// Snapshot of the registered initial values.
	pub fn initial_values(&self) -> FieldValues {
		self.inner.registry.borrow().initial_values().clone()
	}

	/// Initial values overlaid with typed values; this is what whole-form
	/// validation submits.
	pub fn effective_values(&self) -> FieldValues {
		let mut merged = self.initial_values();
		merged.extend(self.values());
		merged
	}

	/// Value shown for `name`: typed value, else initial value, else empty.
	pub fn effective_value(&self, name: &str) -> String {
		if let Some(value) = self.inner.state.borrow().values.get(name) {
			return value.clone();
		}
		self.inner
			.registry
			.borrow()
			.initial_value(name)
			.unwrap_or_default()
			.to_string()
	}

	/// Whether `name` currently carries at least one error.
	pub fn is_dirty(&self, name: &str) -> bool {
		self.inner.state.borrow().errors.has_errors(name)
	}

	/// Number of queued validations that have not completed yet.
	pub fn pending_validations(&self) -> usize {
		self.inner.pending.get()
	}

	/// Runs queued validations and resolves once every one has completed.
	///
	/// Natively this is what drives change and blur validations; a host that
	/// wants them to progress in the background can spawn this future on its
	/// own local executor.
	pub async fn settled(&self) {
		let inner = &self.inner;
		loop {
			if inner.pending.get() == 0 {
				return;
			}
			let mut notified = pin!(inner.settle.notified());
			poll_fn(|cx| {
				if inner.tasks.poll_drive(cx).is_ready() || notified.as_mut().poll(cx).is_ready() {
					Poll::Ready(())
				} else {
					Poll::Pending
				}
			})
			.await;
		}
	}
}

impl<E> FormController<E>
where
	E: ValidationEngine + 'static,
{
	/// Registers a field and returns its binding.
	///
	/// Call this for every mounted field on every render pass. A later
	/// subscription under the same name replaces the earlier initial value
	/// and rule.
	pub fn subscribe(&self, descriptor: FieldDescriptor<E::Rule>) -> FieldBinding {
		let FieldDescriptor {
			attribute,
			initial_value,
			validation,
		} = descriptor;

		self.inner.registry.borrow_mut().register(
			&attribute.name,
			initial_value.unwrap_or_default(),
			validation,
		);

		let sink: Rc<dyn InputSink> = Rc::new(self.clone());
		FieldBinding {
			value: self.effective_value(&attribute.name),
			errors: self.field_errors(&attribute.name),
			on_change: InputHandler::new(Rc::clone(&sink), Trigger::Change),
			on_blur: InputHandler::new(sink, Trigger::Blur),
			name: attribute.name,
			label: attribute.label,
			input_type: attribute.input_type,
			attributes: attribute.extra,
		}
	}

	/// Stores the new value, revalidating first if the field is dirty.
	pub fn handle_input_change(&self, event: &InputEvent) {
		if self.inner.config.revalidate_on_change && self.is_dirty(&event.name) {
			self.spawn_field_validation(&event.name, &event.value);
		}

		self.inner
			.state
			.borrow_mut()
			.values
			.insert(event.name.clone(), event.value.clone());
	}

	/// Revalidates the blurred field.
	pub fn handle_input_blur(&self, event: &InputEvent) {
		self.spawn_field_validation(&event.name, &event.value);
	}

	/// Wraps `callback` so it only runs for a valid form.
	pub fn on_submit<F>(&self, callback: F) -> SubmitBinding<E, F> {
		SubmitBinding::new(self.clone(), callback)
	}

	fn spawn_field_validation(&self, name: &str, value: &str) {
		let stamp = self.inner.state.borrow_mut().begin_field_validation(name);
		let guard = PendingGuard::new(&self.inner);
		let weak = Rc::downgrade(&self.inner);
		let (name, value) = (name.to_string(), value.to_string());

		self.inner.tasks.push(async move {
			let _guard = guard;
			let Some(inner) = weak.upgrade() else {
				return;
			};
			let controller = Self { inner };
			if let Err(err) = controller.run_field_validation(&name, &value, stamp).await {
				error!(
					field = %name,
					error = %err,
					"Field validation aborted; keeping previous errors"
				);
			}
		});

		#[cfg(all(target_family = "wasm", target_os = "unknown"))]
		if self.inner.pending.get() == 1 {
			let controller = self.clone();
			crate::tasks::spawn_driver(async move { controller.settled().await });
		}
	}

	/// Validates a single field and merges its result into the errors.
	///
	/// On an engine contract violation the previous errors are kept and the
	/// failure is logged; [`FieldOutcome::Applied`] is never reported then.
	pub async fn validate_field(&self, name: &str, value: &str) -> Option<FieldOutcome> {
		match self.try_validate_field(name, value).await {
			Ok(outcome) => Some(outcome),
			Err(err) => {
				error!(
					field = %name,
					error = %err,
					"Field validation aborted; keeping previous errors"
				);
				None
			}
		}
	}

	/// Like [`validate_field`](Self::validate_field), but returns engine
	/// contract violations to the caller.
	pub async fn try_validate_field(&self, name: &str, value: &str) -> FormResult<FieldOutcome> {
		let stamp = self.inner.state.borrow_mut().begin_field_validation(name);
		self.run_field_validation(name, value, stamp).await
	}

	async fn run_field_validation(
		&self,
		name: &str,
		value: &str,
		stamp: u64,
	) -> FormResult<FieldOutcome> {
		let rule = self.inner.registry.borrow().rule(name).cloned();
		let Some(rule) = rule else {
			debug!(field = %name, "No validation rule registered; treating field as clean");
			self.inner.state.borrow_mut().errors.remove(name);
			return Ok(FieldOutcome::NoRule);
		};

		let mut schema = Schema::new();
		schema.insert(name.to_string(), rule);
		let mut values = FieldValues::new();
		values.insert(name.to_string(), value.to_string());

		debug!(field = %name, stamp, "Validating field");
		let outcome = self.inner.engine.validate(&schema, &values).await;
		let report = build_report(outcome, &values)?;

		let mut state = self.inner.state.borrow_mut();
		if self.inner.config.version_guard && !state.is_latest_field_stamp(name, stamp) {
			debug!(field = %name, stamp, "Dropping superseded field validation result");
			return Ok(FieldOutcome::Stale);
		}

		state.errors.merge(report);
		Ok(FieldOutcome::Applied(
			state.errors.get(name).map(<[String]>::to_vec).unwrap_or_default(),
		))
	}

	/// Validates every registered field and replaces the errors with the
	/// result. Returns the verdict under the configured
	/// [`ValidityMode`](crate::ValidityMode).
	///
	/// An engine contract violation yields `false` and keeps the previous
	/// errors, as does a validation superseded by a newer one or by
	/// [`reset`](Self::reset).
	pub async fn validate_form(&self) -> bool {
		match self.try_validate_form().await {
			Ok(verdict) => verdict,
			Err(err) => {
				error!(error = %err, "Form validation aborted; keeping previous errors");
				false
			}
		}
	}

	/// Like [`validate_form`](Self::validate_form), but returns engine
	/// contract violations to the caller.
	pub async fn try_validate_form(&self) -> FormResult<bool> {
		let schema = self.inner.registry.borrow().schema().clone();
		let values = self.effective_values();
		let ticket = self.inner.state.borrow_mut().begin_form_validation();
		let stamp = ticket.stamp;

		debug!(fields = values.len(), stamp, "Validating form");
		let outcome = self.inner.engine.validate(&schema, &values).await;
		let report = match build_report(outcome, &values) {
			Ok(report) => report,
			Err(err) => {
				self.inner.state.borrow_mut().abandon_form_validation(ticket);
				return Err(err.into());
			}
		};
		let verdict = self.inner.config.validity.verdict(&report);

		let mut state = self.inner.state.borrow_mut();
		if !self.inner.config.version_guard {
			state.errors = FieldErrors::from_report(report);
			return Ok(verdict);
		}

		if !state.is_latest_form_stamp(stamp) {
			warn!(stamp, "Dropping superseded form validation result");
			return Ok(false);
		}

		let mut errors = FieldErrors::from_report(report);
		for name in state.revalidated_after(stamp) {
			errors.set(&name, state.errors.get(&name).map(<[String]>::to_vec));
		}
		state.errors = errors;
		state.supersede_fields(stamp, values.keys().chain(schema.keys()));

		Ok(verdict)
	}
}

impl<E> InputSink for FormController<E>
where
	E: ValidationEngine + 'static,
{
	fn dispatch(&self, trigger: Trigger, event: &InputEvent) {
		match trigger {
			Trigger::Change => self.handle_input_change(event),
			Trigger::Blur => self.handle_input_blur(event),
		}
	}

	fn identity(&self) -> *const () {
		Rc::as_ptr(&self.inner).cast()
	}
}
