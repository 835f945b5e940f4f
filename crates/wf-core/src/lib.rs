//! wf-core: resumable, addressable task-graph execution engine.
//!
//! Purpose:
//! - Run a nested program of callables against a sequence of tokens, one
//!   token at a time, tracking position with a two-axis instruction
//!   pointer (`token_pos`, `callback_pos`) that can be serialized,
//!   inspected, and resumed.
//! - Let callables request non-local control transfers (jump, skip,
//!   break, halt, stop, abort) without relying on stack unwinding.
//!
//! Components:
//! - `transfer`: the control-transfer vocabulary threaded through
//!   `Result<(), Transfer>`.
//! - `state`: `MachineState`, the instruction pointer itself.
//! - `token`: the minimal contract a token needs for feature-based
//!   program dispatch.
//! - `callbacks`: `CallbackTree`, the keyed, nested program store, and the
//!   tuple-splice/list-nest flattening rule.
//! - `engine`: `Engine`, the outer token loop and the recursive walker,
//!   plus the `EngineHooks` extension points.
//! - `signal`: the best-effort lifecycle signal bus.
//! - `errors`: terminal error types.

pub mod callbacks;
pub mod engine;
pub mod errors;
pub mod signal;
pub mod state;
pub mod token;
pub mod transfer;

pub use callbacks::{flatten, Callback, CallbackTree, Node, NodeSpec};
pub use engine::core::{RestartPoint, RunOutcome};
pub use engine::{DefaultHooks, Engine, EngineHooks};
pub use errors::{WorkflowDefinitionError, WorkflowError, WorkflowObjectStatusError};
pub use signal::{SignalBus, SignalKind};
pub use state::MachineState;
pub use token::TokenFeatures;
pub use transfer::{jump_call_back, jump_call_forward, jump_token_back, jump_token_forward, Transfer};
