//! Control-flow combinators: pure producers of `NodeSpec` programs built
//! only from callables and the engine's public transfer primitives.
//!
//! Grounded in `original_source/workflow/patterns/controlflow.py`: each
//! combinator here reproduces the same jump arithmetic, translated from
//! Python's exception-raising `eng.jump_call(...)`/`eng.break_current_loop()`
//! calls (which always unwind immediately) into `Err(eng.jump_call(...))`
//! returns that the walker in `wf_core::Engine` checks explicitly.

mod branch;
mod choice;
mod jump;
mod loops;
mod parallel;
mod run_wf;
mod try_combinator;

pub use branch::{if_else, r#if, if_not};
pub use choice::{choice, simple_merge};
pub use jump::{break_node, cmp, halt_node, obj_jump_back, obj_jump_forward, obj_next, stop_node, task_jump_back, task_jump_forward, task_jump_if, CmpOp};
pub use loops::{r#for, r#while, ForOrder, ForSetter, ListFn};
pub use parallel::{parallel_split, synchronize, BranchBuilder};
pub use run_wf::run_wf;
pub use try_combinator::{try_call, OnFailure};

use std::rc::Rc;
use wf_core::{flatten, Engine, Node, NodeSpec};

/// A read-only predicate over the engine's current token/state.
///
/// `original_source`'s combinators accept any `callable(obj, eng) -> bool`;
/// a condition here reaches the token through `Engine::current_token`, same
/// as a leaf callback does.
pub type Cond<T> = Rc<dyn Fn(&Engine<T>) -> bool>;

pub fn cond<T, F>(f: F) -> Cond<T>
    where F: Fn(&Engine<T>) -> bool + 'static
{
    Rc::new(f)
}

/// Converts an already-installed `Node` back into a `NodeSpec`, so a
/// combinator can flatten a branch once (to learn its exact flat length for
/// jump arithmetic) and still hand the result back as a splice-able spec.
pub(crate) fn respec<T>(node: Node<T>) -> NodeSpec<T> {
    match node {
        Node::Call(f) => NodeSpec::Call(f),
        Node::List(children) => NodeSpec::List(children.into_iter().map(respec).collect()),
    }
}

/// Flattens `branch` the same way installation would, returning both its
/// exact flat length at this level and the flattened specs, ready to be
/// spliced back into a combinator's own output.
pub(crate) fn flatten_branch<T>(branch: Vec<NodeSpec<T>>) -> (i64, Vec<NodeSpec<T>>) {
    let flat = flatten(branch);
    let len = flat.len() as i64;
    (len, flat.into_iter().map(respec).collect())
}
