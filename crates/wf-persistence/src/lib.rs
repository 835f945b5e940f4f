//! wf-persistence: the durable-object overlay (spec §6).
//!
//! Maps `wf_core::Engine` lifecycle hooks onto a `WorkflowStatus`/
//! `ObjectStatus` pair, grounded in
//! `original_source/workflow/engine_db.py`'s `DbWorkflowEngine`/
//! `DbProcessingFactory`/`DbTransitionAction`. Ships trait contracts only
//! (`DurableToken`, `DurableEngineRecord`) plus an in-memory reference pair
//! for tests — no concrete SQL-backed store, which is explicitly out of
//! scope.

pub mod durable;
pub mod hooks;
pub mod memory;
pub mod status;

pub use durable::{DurableEngineRecord, DurableToken};
pub use hooks::DbHooks;
pub use memory::{InMemoryEngineRecord, InMemoryToken};
pub use status::{ObjectStatus, WorkflowStatus};
