//! IF / IF_NOT / IF_ELSE, grounded in `controlflow.py`'s `IF`, `IF_NOT` and
//! `IF_ELSE`.
//!
//! Python's gate exploits short-circuit `and`/`or` evaluation where both
//! branches of the expression raise; here the gate just returns the
//! `Transfer` directly from an `if`/`else`.

use wf_core::{Engine, NodeSpec};

use crate::Cond;

/// `[gate, branch]`. `gate` issues `JumpCall(+1)` (proceed into `branch`) if
/// `cond` holds, else `BreakFromThisLoop` (skip `branch` by ending this
/// two-element list).
pub fn r#if<T: 'static>(condition: Cond<T>, branch: Vec<NodeSpec<T>>) -> Vec<NodeSpec<T>> {
    let gate = NodeSpec::call(move |eng: &mut Engine<T>| {
        if condition(eng) { Err(eng.jump_call(1)) } else { Err(eng.break_current_loop()) }
    });
    vec![gate, NodeSpec::List(branch)]
}

/// `[gate, branch]`. `gate` issues `BreakFromThisLoop` if `cond` holds
/// (skip `branch`), else returns normally so `branch` runs next.
pub fn if_not<T: 'static>(condition: Cond<T>, branch: Vec<NodeSpec<T>>) -> Vec<NodeSpec<T>> {
    let gate = NodeSpec::call(move |eng: &mut Engine<T>| {
        if condition(eng) { Err(eng.break_current_loop()) } else { Ok(()) }
    });
    vec![gate, NodeSpec::List(branch)]
}

/// `[gate, t, BREAK, f]`. `gate` jumps to position 1 (`t`) when `cond`
/// holds, else position 3 (`f`), skipping both `t` and the unconditional
/// `BREAK` between them. `BREAK` ends the list once `t` finishes, so `f`
/// never runs after `t` did.
pub fn if_else<T: 'static>(condition: Cond<T>, t: Vec<NodeSpec<T>>, f: Vec<NodeSpec<T>>) -> Vec<NodeSpec<T>> {
    let gate = NodeSpec::call(move |eng: &mut Engine<T>| {
        if condition(eng) { Err(eng.jump_call(1)) } else { Err(eng.jump_call(3)) }
    });
    vec![gate, NodeSpec::List(t), crate::break_node(), NodeSpec::List(f)]
}
