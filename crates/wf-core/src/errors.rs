//! Error types for the engine core.
//!
//! `WorkflowError` is the terminal error variant raised for engine misuse
//! (empty callbacks, non-existent callback keys, illegal signed jumps) and
//! for persistence failures surfaced by an overlay; it carries optional
//! `id_workflow`/`id_object` so a caller can correlate it back to a run
//! without re-deriving that context from the message string.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A terminal error raised by the engine or by a callable.
///
/// Unlike `Transfer` (see `crate::transfer`), a `WorkflowError` always ends
/// the run unless the caller explicitly asked `process`/`restart` to swallow
/// it via `stop_on_error = false`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct WorkflowError {
    pub message: String,
    pub id_workflow: Option<String>,
    pub id_object: Option<i64>,
    pub payload: Option<serde_json::Value>,
}

impl WorkflowError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), id_workflow: None, id_object: None, payload: None }
    }

    pub fn with_workflow(mut self, id_workflow: impl Into<String>) -> Self {
        self.id_workflow = Some(id_workflow.into());
        self
    }

    pub fn with_object(mut self, id_object: i64) -> Self {
        self.id_object = Some(id_object);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Raised when a `CallbackTree` lookup names a key with no registered
/// program. Mirrors `original_source`'s `_CallbacksDict.__getitem__`, which
/// rewrites a plain `KeyError` into a message naming the missing key.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("no program is registered for the key: {key}")]
pub struct WorkflowDefinitionError {
    pub key: String,
}

/// Raised by a persistence overlay when a token reports a status the
/// overlay does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("object {id_object} has unknown or missing status: {status}")]
pub struct WorkflowObjectStatusError {
    pub status: String,
    pub id_object: i64,
}
