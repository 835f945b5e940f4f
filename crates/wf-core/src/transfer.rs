//! The control-transfer vocabulary (spec §4.1).
//!
//! `original_source/workflow/engine.py` raises these as exceptions and lets
//! them unwind the Python call stack; per the redesign note in spec §9 we
//! instead thread a `Transfer` through `Result<(), Transfer>` return values.
//! The walker and outer loop check it after every callable call instead of
//! catching it.

use serde::{Deserialize, Serialize};

use crate::errors::WorkflowError;

/// A non-local control-transfer request raised by a callable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Transfer {
    /// Skip remaining callables for this token, advance to the next token.
    ContinueNextToken,
    /// End the run gracefully at the current position.
    StopProcessing,
    /// End the run and mark it resumable.
    Halt { message: String, action: Option<String>, payload: Option<serde_json::Value> },
    /// Like `StopProcessing` but tagged "aborted".
    AbortProcessing,
    /// Like `ContinueNextToken` but tagged "skipped".
    SkipToken,
    /// Return from the current nesting level of the walker only.
    BreakFromThisLoop,
    /// Move `token_pos` by the given signed delta.
    JumpToken(i64),
    /// Move `callback_pos` at the current depth by the given signed delta.
    JumpCall(i64),
    /// A domain error inside a callable; terminal unless `stop_on_error =
    /// false`.
    Error(WorkflowError),
}

impl Transfer {
    pub fn halt(message: impl Into<String>) -> Self {
        Transfer::Halt { message: message.into(), action: None, payload: None }
    }

    pub fn halt_with(message: impl Into<String>, action: Option<String>, payload: Option<serde_json::Value>) -> Self {
        Transfer::Halt { message: message.into(), action, payload }
    }

    /// Name of the transfer, used by the dispatch-by-name scheme (spec
    /// §4.4/§4.6 — `TransitionActions.<SignalName>`).
    pub fn name(&self) -> &'static str {
        match self {
            Transfer::ContinueNextToken => "ContinueNextToken",
            Transfer::StopProcessing => "StopProcessing",
            Transfer::Halt { .. } => "HaltProcessing",
            Transfer::AbortProcessing => "AbortProcessing",
            Transfer::SkipToken => "SkipToken",
            Transfer::BreakFromThisLoop => "BreakFromThisLoop",
            Transfer::JumpToken(_) => "JumpToken",
            Transfer::JumpCall(_) => "JumpCall",
            Transfer::Error(_) => "WorkflowError",
        }
    }
}

/// Legacy forward/backward jump aliases (spec §4.1). They remain
/// recognisable call sites but simply validate the sign and build the
/// corresponding `Transfer::JumpToken`/`Transfer::JumpCall`.
pub fn jump_token_forward(offset: i64) -> Result<Transfer, WorkflowError> {
    if offset < 0 {
        return Err(WorkflowError::new("JumpTokenForward cannot be a negative number"));
    }
    Ok(Transfer::JumpToken(offset))
}

pub fn jump_token_back(offset: i64) -> Result<Transfer, WorkflowError> {
    if offset > 0 {
        return Err(WorkflowError::new("JumpTokenBack cannot be a positive number"));
    }
    Ok(Transfer::JumpToken(offset))
}

pub fn jump_call_forward(offset: i64) -> Result<Transfer, WorkflowError> {
    if offset < 0 {
        return Err(WorkflowError::new("JumpCallForward cannot be a negative number"));
    }
    Ok(Transfer::JumpCall(offset))
}

pub fn jump_call_back(offset: i64) -> Result<Transfer, WorkflowError> {
    if offset > 0 {
        return Err(WorkflowError::new("JumpCallBack cannot be a positive number"));
    }
    Ok(Transfer::JumpCall(offset))
}
