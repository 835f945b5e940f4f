//! The durable-object contract (spec §6), as Rust traits.
//!
//! `original_source`'s `obj.save(status, task_counter, id_workflow)` and
//! `eng.save(status)` are ordinary attribute/DB writes on mutable Python
//! objects; here `DurableToken::save` takes `&self` because `wf_core`'s
//! `EngineHooks::before_object`/`after_object` only ever hand a hook a
//! shared `&[T]` slice (tokens are still owned by the running `Engine`, so
//! a hook cannot reach into them mutably without aliasing the walker's own
//! `&mut` access) — a durable token is expected to carry its mutable
//! bookkeeping behind interior mutability, the same shape a real DB client
//! handle would have anyway (a connection, not a value, behind `&self`).

use crate::status::{ObjectStatus, WorkflowStatus};

/// A token that can report its own lifecycle to a persistence backend.
pub trait DurableToken {
    /// Persists a new status (if given) and optional positional/lineage
    /// metadata. `task_counter` mirrors spec §6's `task_counter?=callback_pos`
    /// default; `EngineHooks` does not thread `MachineState` through to
    /// hook calls, so callers that need the exact resumption position
    /// persisted should read `Engine::state` themselves after `process`/
    /// `restart` returns and pass it in explicitly.
    fn save(&self, status: Option<ObjectStatus>, task_counter: Option<&[i64]>, id_workflow: Option<&str>);

    /// Records a human-readable error, spec §6's `set_error_message`.
    fn set_error_message(&self, text: &str);

    /// The token's last-persisted status.
    fn status(&self) -> ObjectStatus;
}

/// An engine run's own durable record, spec §6's engine record contract.
pub trait DurableEngineRecord {
    fn save(&mut self, status: Option<WorkflowStatus>);
    fn uuid(&self) -> &str;
    fn name(&self) -> &str;
    fn status(&self) -> WorkflowStatus;
}
