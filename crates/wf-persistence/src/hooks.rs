//! `DbHooks`: the `EngineHooks` implementation that drives the status
//! transitions of spec §6, grounded in `engine_db.py`'s
//! `DbProcessingFactory`/`DbTransitionAction`.

use log::{error, warn};

use wf_core::{EngineHooks, WorkflowError};

use crate::durable::{DurableEngineRecord, DurableToken};
use crate::status::{ObjectStatus, WorkflowStatus};

/// Wraps a `DurableEngineRecord` and reports every transition spec §6 names
/// onto it and onto whichever token the transition concerns.
pub struct DbHooks<Rec: DurableEngineRecord> {
    pub record: Rec,
}

impl<Rec: DurableEngineRecord> DbHooks<Rec> {
    pub fn new(record: Rec) -> Self {
        Self { record }
    }
}

impl<Tok, Rec> EngineHooks<Tok> for DbHooks<Rec>
    where
        Tok: DurableToken,
        Rec: DurableEngineRecord,
{
    fn before_processing(&mut self, _tokens: &[Tok]) {
        self.record.save(Some(WorkflowStatus::Running));
    }

    fn before_object(&mut self, tokens: &[Tok], token_pos: usize) {
        tokens[token_pos].save(Some(ObjectStatus::Running), None, Some(self.record.uuid()));
    }

    fn after_object(&mut self, tokens: &[Tok], token_pos: usize) {
        tokens[token_pos].save(Some(ObjectStatus::Completed), None, Some(self.record.uuid()));
    }

    fn on_halt_processing(&mut self, token: &Tok, message: &str) {
        token.save(Some(ObjectStatus::Halted), None, Some(self.record.uuid()));
        self.record.save(Some(WorkflowStatus::Halted));
        warn!("workflow '{}' halted with message: {message}", self.record.name());
    }

    fn on_error(&mut self, token: &Tok, err: &WorkflowError) {
        token.set_error_message(&err.message);
        token.save(Some(ObjectStatus::Error), None, Some(self.record.uuid()));
        self.record.save(Some(WorkflowStatus::Error));
        error!("workflow '{}' failed: {}", self.record.name(), err.message);
    }

    /// `engine_db.py`'s `after_processing -> engine COMPLETED iff
    /// has_completed, else HALTED`. `EngineHooks` does not thread
    /// `has_completed` through to this hook, so the decision is read back
    /// from the tokens' own just-persisted status instead.
    fn after_processing(&mut self, tokens: &[Tok]) {
        let all_completed = tokens.iter().all(|t| t.status() == ObjectStatus::Completed);
        let status = if all_completed { WorkflowStatus::Completed } else { WorkflowStatus::Halted };
        self.record.save(Some(status));
    }
}
