use crate::engine::EngineError;

/// Errors surfaced by the awaitable controller APIs and configuration loading.
///
/// Event handlers never return these; they log and keep the prior error state.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Validation engine failed: {0}")]
	Engine(#[from] EngineError),
	#[error("Invalid controller configuration: {0}")]
	Config(#[from] serde_json::Error),
}

pub type FormResult<T> = Result<T, FormError>;
