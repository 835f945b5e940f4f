//! Best-effort lifecycle signal bus (spec §6 "Signal names").
//!
//! `original_source/workflow/signals.py` wires four `blinker` signals and
//! `engine.py`'s `_Signal` helper degrades to a single logged warning the
//! first time the `signals` module can't be imported, then stays silent.
//! Rust has no equivalent "module might not be installed" situation, but the
//! same shape is useful when an embedder wants signal delivery to be
//! observability, never a failure mode: observers are plain closures, and a
//! panicking observer is caught and only warned about once.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

/// One of the four lifecycle events a run can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    WorkflowStarted,
    WorkflowHalted,
    WorkflowError,
    WorkflowFinished,
}

type Observer = Box<dyn Fn(SignalKind) + Send + Sync>;

/// Collects observers and dispatches best-effort.
///
/// A run always has one of these; with zero registered observers, emission
/// is a no-op rather than an error, matching the "ignore all future signal
/// calls" behaviour of the Python original when `blinker` is unavailable.
#[derive(Default)]
pub struct SignalBus {
    observers: Vec<Observer>,
    errored: AtomicBool,
}

impl SignalBus {
    pub fn new() -> Self {
        Self { observers: Vec::new(), errored: AtomicBool::new(false) }
    }

    pub fn subscribe<F>(&mut self, observer: F)
        where F: Fn(SignalKind) + Send + Sync + 'static
    {
        self.observers.push(Box::new(observer));
    }

    /// Sends `kind` to every observer, best-effort. A panicking observer is
    /// caught; the bus logs one warning the first time this happens and then
    /// degrades silently, exactly like `_Signal.signals()`'s one-shot
    /// `import_error_msg` warning.
    pub fn emit(&self, kind: SignalKind) {
        for observer in &self.observers {
            let result = catch_unwind(AssertUnwindSafe(|| observer(kind)));
            if result.is_err() && !self.errored.swap(true, Ordering::Relaxed) {
                warn!("a workflow signal observer panicked; ignoring all future signal delivery errors");
            }
        }
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus").field("observers", &self.observers.len()).finish()
    }
}
