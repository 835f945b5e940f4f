//! TRY, grounded in `patterns/utils.py`'s `TRY`.
//!
//! `original_source` distinguishes a `WorkflowTransition` (let it propagate
//! immediately) from any other exception (count against `retry`). The
//! equivalent split here is `Transfer::Error` (a domain failure, retried)
//! versus every other `Transfer` variant (a control transfer, propagated
//! immediately without being retried).

use log::error;

use wf_core::{Callback, Engine, NodeSpec, Transfer, WorkflowError};

/// What to do once `retry` attempts are exhausted.
pub enum OnFailure<T> {
    /// Raise this error.
    Error(WorkflowError),
    /// Run this callable instead.
    Call(Callback<T>),
}

/// Wraps `onecall`, re-running it up to `retry` additional times on a
/// domain error before giving up via `onfailure`.
pub fn try_call<T: 'static>(onecall: Callback<T>, retry: u32, onfailure: OnFailure<T>, verbose: bool) -> NodeSpec<T> {
    let tries = 1 + retry;
    NodeSpec::call(move |eng: &mut Engine<T>| {
        let mut attempt = 0;
        loop {
            match onecall(eng) {
                Ok(()) => return Ok(()),
                Err(Transfer::Error(err)) => {
                    if verbose {
                        error!("error reported from the call: {}", err.message);
                    }
                    attempt += 1;
                    if attempt >= tries {
                        return match &onfailure {
                            OnFailure::Error(err) => Err(Transfer::Error(err.clone())),
                            OnFailure::Call(f) => {
                                let f = f.clone();
                                f(eng)
                            }
                        };
                    }
                }
                Err(other) => return Err(other),
            }
        }
    })
}
