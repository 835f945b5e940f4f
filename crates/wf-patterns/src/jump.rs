//! Leaf combinators with no surrounding block: jumps, terminal signals, and
//! the `CMP` comparison helper. Grounded in `controlflow.py`'s
//! `TASK_JUMP_BWD`/`TASK_JUMP_FWD`/`TASK_JUMP_IF`, `BREAK`/`STOP`/`HALT`,
//! `OBJ_NEXT`/`OBJ_JUMP_FWD`/`OBJ_JUMP_BWD` and `CMP`.

use wf_core::{Engine, NodeSpec};

use crate::Cond;

/// `eng.jump_call(step)`, unconditionally. Named separately from
/// `task_jump_back` only to mirror the two names the corpus gives a single
/// underlying call, one per habitual direction.
pub fn task_jump_forward<T: 'static>(step: i64) -> NodeSpec<T> {
    NodeSpec::call(move |eng: &mut Engine<T>| Err(eng.jump_call(step)))
}

/// `eng.jump_call(step)`, unconditionally; `step` is expected to be `<= 0`.
pub fn task_jump_back<T: 'static>(step: i64) -> NodeSpec<T> {
    NodeSpec::call(move |eng: &mut Engine<T>| Err(eng.jump_call(step)))
}

/// Jumps by `step` call-positions if `condition` holds, inserted directly
/// (not wrapped in a nested block, unlike `IF`).
pub fn task_jump_if<T: 'static>(condition: Cond<T>, step: i64) -> NodeSpec<T> {
    NodeSpec::call(move |eng: &mut Engine<T>| {
        if condition(eng) { Err(eng.jump_call(step)) } else { Ok(()) }
    })
}

/// Ends the enclosing block while leaving the rest of the program running.
pub fn break_node<T: 'static>() -> NodeSpec<T> {
    NodeSpec::call(|eng: &mut Engine<T>| Err(eng.break_current_loop()))
}

/// Unconditional, non-resumable stop.
pub fn stop_node<T: 'static>() -> NodeSpec<T> {
    NodeSpec::call(|eng: &mut Engine<T>| Err(eng.stop()))
}

/// Unconditional, resumable halt.
pub fn halt_node<T: 'static>(message: impl Into<String> + Clone + 'static) -> NodeSpec<T> {
    NodeSpec::call(move |eng: &mut Engine<T>| Err(eng.halt(message.clone())))
}

/// Ends processing of the current token, moving on to the next one.
/// Grounded literally on `OBJ_NEXT`, whose body is the same
/// `break_current_loop` call as `BREAK` despite the different name.
pub fn obj_next<T: 'static>() -> NodeSpec<T> {
    NodeSpec::call(|eng: &mut Engine<T>| Err(eng.break_current_loop()))
}

pub fn obj_jump_forward<T: 'static>(step: i64) -> NodeSpec<T> {
    NodeSpec::call(move |eng: &mut Engine<T>| Err(eng.jump_token(step)))
}

pub fn obj_jump_back<T: 'static>(step: i64) -> NodeSpec<T> {
    NodeSpec::call(move |eng: &mut Engine<T>| Err(eng.jump_token(step)))
}

/// Comparison operators accepted by `cmp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp { Eq, Gt, Gte, Lt, Lte }

/// Builds a `Cond` that evaluates two engine-derived values and compares
/// them with `op`. `a`/`b` in `original_source` may themselves be callables
/// evaluated against `(obj, eng)`; here they are always closures over the
/// engine, since that is the only shape Rust's static typing can express
/// without boxing every possible literal type.
pub fn cmp<T, V, A, B>(a: A, b: B, op: CmpOp) -> Cond<T>
    where
        V: PartialOrd + PartialEq,
        A: Fn(&Engine<T>) -> V + 'static,
        B: Fn(&Engine<T>) -> V + 'static,
        T: 'static,
{
    std::rc::Rc::new(move |eng: &Engine<T>| {
        let lhs = a(eng);
        let rhs = b(eng);
        match op {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Gte => lhs >= rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Lte => lhs <= rhs,
        }
    })
}
