//! Extension points for an `Engine` run (spec §4.6).
//!
//! `original_source/workflow/engine.py` splits these across three
//! classes (`ProcessingFactory`, `ActionMapper`, `TransitionActions`)
//! that a subclass overrides piecemeal by reassigning `classproperty`s.
//! Rust has no equivalent of monkey-patching a class attribute, so
//! `EngineHooks<T>` bundles the same extension points as one trait with
//! default method bodies; a host overrides only the methods it needs and
//! leaves the rest at their default, matching `original_source`'s
//! dispatch table one for one.

use log::debug;

use crate::errors::WorkflowError;

/// Per-run extension points, looked up by the engine at the same points
/// `original_source` calls into `processing_factory`/`action_mapper`/
/// `transition_exception_mapper`.
pub trait EngineHooks<T> {
    /// Runs once before the first token, after `objects` is attached to the
    /// engine. `original_source`: `ProcessingFactory.before_processing`.
    fn before_processing(&mut self, _tokens: &[T]) {}

    /// Runs once after the last token is processed (or the run is stopped).
    /// `original_source`: `ProcessingFactory.after_processing`.
    fn after_processing(&mut self, _tokens: &[T]) {}

    /// Runs before a token's program is looked up. `original_source`:
    /// `ProcessingFactory.before_object`.
    fn before_object(&mut self, _tokens: &[T], _token_pos: usize) {}

    /// Runs after a token's program finishes without a terminal transfer.
    /// `original_source`: `ProcessingFactory.after_object`.
    fn after_object(&mut self, _tokens: &[T], _token_pos: usize) {}

    /// Runs immediately before the token's program starts walking.
    /// `original_source`: `ActionMapper.before_callbacks`.
    fn before_callbacks(&mut self, _token: &T) {}

    /// Runs immediately after the token's program stops walking, whether it
    /// finished, broke, or transferred out. `original_source`:
    /// `ActionMapper.after_callbacks`.
    fn after_callbacks(&mut self, _token: &T) {}

    /// Runs before every individual callable in the program.
    /// `original_source`: `ActionMapper.before_each_callback`.
    fn before_each_callback(&mut self, _token: &T, _callback_name: &str) {}

    /// Runs after every individual callable, regardless of outcome.
    /// `original_source`: `ActionMapper.after_each_callback`.
    fn after_each_callback(&mut self, _token: &T, _callback_name: &str) {}

    /// `Transfer::StopProcessing` reached the token level.
    /// `original_source`: `TransitionActions.StopProcessing`.
    fn on_stop_processing(&mut self, _token: &T) {
        debug!("processing stopped");
    }

    /// `Transfer::Halt` reached the token level; the run is about to end
    /// and become resumable. `original_source`: `TransitionActions.HaltProcessing`.
    fn on_halt_processing(&mut self, _token: &T, message: &str) {
        debug!("processing halted: {message}");
    }

    /// `Transfer::ContinueNextToken` reached the token level.
    /// `original_source`: `TransitionActions.ContinueNextToken`.
    fn on_continue_next_token(&mut self, _token: &T) {
        debug!("stopping processing for this token, continuing with next");
    }

    /// `Transfer::SkipToken` reached the token level.
    /// `original_source`: `TransitionActions.SkipToken`.
    fn on_skip_token(&mut self, _token: &T) {
        debug!("skipped running this token");
    }

    /// `Transfer::AbortProcessing` reached the token level.
    /// `original_source`: `TransitionActions.AbortProcessing`.
    fn on_abort_processing(&mut self, _token: &T) {
        debug!("processing was aborted for this token");
    }

    /// `Transfer::Error` reached the token level, with `stop_on_error` set.
    /// `original_source`: `TransitionActions.Exception`.
    fn on_error(&mut self, _token: &T, err: &WorkflowError) {
        debug!("unhandled workflow error: {}", err.message);
    }
}

/// The extension points every run gets unless a host overrides them.
#[derive(Debug, Default)]
pub struct DefaultHooks;

impl<T> EngineHooks<T> for DefaultHooks {}
