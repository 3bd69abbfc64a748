//! Shared test engines and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use formeasy_forms::{
	EngineError, FieldValues, FormController, Schema, ValidationEngine, ValidationFailure,
	ValidationIssue,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// One engine invocation as observed by [`ScriptedEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
	pub fields: Vec<String>,
	pub rules: Vec<&'static str>,
	pub values: FieldValues,
}

#[derive(Debug, Clone)]
pub enum Reply {
	Pass,
	Fail(Vec<(&'static str, &'static str)>),
	Broken(&'static str),
}

struct Script {
	reply: Reply,
	gate: Option<oneshot::Receiver<()>>,
}

/// Engine answering calls from a queue of scripted replies.
///
/// Calls beyond the queue pass. A gated reply waits until its sender fires.
#[derive(Default)]
pub struct ScriptedEngine {
	calls: RefCell<Vec<Call>>,
	scripts: RefCell<VecDeque<Script>>,
}

impl ScriptedEngine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn reply(&self, reply: Reply) {
		self.scripts
			.borrow_mut()
			.push_back(Script { reply, gate: None });
	}

	pub fn reply_after_release(&self, reply: Reply) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		self.scripts.borrow_mut().push_back(Script {
			reply,
			gate: Some(rx),
		});
		tx
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.borrow().clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.borrow().len()
	}
}

#[async_trait(?Send)]
impl ValidationEngine for ScriptedEngine {
	type Rule = &'static str;

	async fn validate(
		&self,
		schema: &Schema<&'static str>,
		values: &FieldValues,
	) -> Result<(), EngineError> {
		self.calls.borrow_mut().push(Call {
			fields: schema.keys().cloned().collect(),
			rules: schema.values().copied().collect(),
			values: values.clone(),
		});

		let script = self.scripts.borrow_mut().pop_front();
		let Some(script) = script else {
			return Ok(());
		};
		if let Some(gate) = script.gate {
			let _ = gate.await;
		}

		match script.reply {
			Reply::Pass => Ok(()),
			Reply::Fail(issues) => Err(EngineError::Validation(ValidationFailure::new(
				issues
					.into_iter()
					.map(|(path, message)| ValidationIssue::new(path, message))
					.collect(),
			))),
			Reply::Broken(message) => Err(EngineError::Engine(message.to_string())),
		}
	}
}

/// Yields until at most `count` queued validations are still running.
///
/// Something else must drive the queue meanwhile, typically a `settled()`
/// joined with the caller.
pub async fn wait_until_pending<E: ValidationEngine>(form: &FormController<E>, count: usize) {
	while form.pending_validations() > count {
		tokio::task::yield_now().await;
	}
}

/// Yields until the engine has seen `count` calls.
pub async fn wait_until_calls(engine: &ScriptedEngine, count: usize) {
	while engine.call_count() < count {
		tokio::task::yield_now().await;
	}
}

pub fn values(entries: &[(&str, &str)]) -> FieldValues {
	entries
		.iter()
		.map(|(name, value)| (name.to_string(), value.to_string()))
		.collect()
}
