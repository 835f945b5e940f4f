//! WHILE / FOR, grounded in `controlflow.py`'s `WHILE` and `FOR`.
//!
//! Both end their body with a computed `TASK_JUMP_BWD` that lands back on
//! the guard callable at the head of the block; the jump distance is the
//! body's exact flattened length plus one, learned once at combinator build
//! time via `flatten_branch`.

use std::rc::Rc;

use serde_json::{Map, Value};
use wf_core::{Engine, NodeSpec};

use crate::{task_jump_back, Cond};

pub fn r#while<T: 'static>(condition: Cond<T>, body: Vec<NodeSpec<T>>) -> Vec<NodeSpec<T>> {
    let (len, flat_body) = crate::flatten_branch(body);
    let gate = NodeSpec::call(move |eng: &mut Engine<T>| {
        if condition(eng) { Ok(()) } else { Err(eng.break_current_loop()) }
    });
    vec![gate, NodeSpec::Splice(flat_body), task_jump_back(-(len + 1))]
}

/// Which end of the list `FOR` starts walking from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForOrder { Asc, Dsc }

/// Produces the sequence to iterate. Evaluated once per pass unless
/// `cache_data` asks for the first result to be reused.
pub type ListFn<T> = Rc<dyn Fn(&Engine<T>) -> Vec<Value>>;

/// Stores the current item somewhere the loop body can read it back,
/// keyed by the loop's own task-id so sibling/nested `FOR`s don't collide.
pub type ForSetter<T> = Rc<dyn Fn(&mut Engine<T>, &str, Value)>;

/// `[guard, body, TASK_JUMP_BWD(-(len(body)+1))]`. Iterator bookkeeping
/// lives in `extra_data["_Iterators"][task_id]`, matching `FOR`'s own
/// `eng.extra_data["_Iterators"]` dict keyed by `str(eng.getCurrTaskId())`.
pub fn r#for<T: 'static>(
    list_fn: ListFn<T>,
    setter: ForSetter<T>,
    body: Vec<NodeSpec<T>>,
    order: ForOrder,
    cache_data: bool,
) -> Vec<NodeSpec<T>> {
    let (len, flat_body) = crate::flatten_branch(body);
    let guard = NodeSpec::call(move |eng: &mut Engine<T>| {
        let step = eng.current_taskname().unwrap_or_default();

        if !eng.extra_data.contains_key("_Iterators") {
            eng.extra_data.insert("_Iterators".into(), Value::Object(Map::new()));
        }

        let list = if cache_data {
            let cached = eng
                .extra_data
                .get("_Iterators")
                .and_then(Value::as_object)
                .and_then(|m| m.get(&step))
                .and_then(|entry| entry.get("cache"))
                .and_then(Value::as_array)
                .cloned();
            match cached {
                Some(list) => list,
                None => list_fn(eng),
            }
        } else {
            list_fn(eng)
        };

        let iterators = eng.extra_data.get_mut("_Iterators").unwrap().as_object_mut().unwrap();

        if !iterators.contains_key(&step) {
            let initial_value = match order {
                ForOrder::Asc => 0i64,
                ForOrder::Dsc => list.len() as i64 - 1,
            };
            let mut entry = Map::new();
            entry.insert("value".into(), Value::from(initial_value));
            if cache_data {
                entry.insert("cache".into(), Value::Array(list.clone()));
            }
            iterators.insert(step.clone(), Value::Object(entry));
        }

        let entry = iterators.get_mut(&step).unwrap().as_object_mut().unwrap();
        let step_value = entry.get("value").and_then(Value::as_i64).unwrap_or(0);
        let within_bounds = match order {
            ForOrder::Asc => (step_value as usize) < list.len(),
            ForOrder::Dsc => step_value > -1,
        };

        if within_bounds {
            let current = list[step_value as usize].clone();
            entry.insert("current_data".into(), current.clone());
            let next_value = match order {
                ForOrder::Asc => step_value + 1,
                ForOrder::Dsc => step_value - 1,
            };
            entry.insert("value".into(), Value::from(next_value));
            drop(entry);
            setter(eng, &step, current);
            Ok(())
        } else {
            let previous = entry.get("previous_data").cloned();
            drop(entry);
            if let Some(previous) = previous {
                setter(eng, &step, previous);
            }
            let iterators = eng.extra_data.get_mut("_Iterators").unwrap().as_object_mut().unwrap();
            iterators.remove(&step);
            Err(eng.break_current_loop())
        }
    });
    vec![guard, NodeSpec::Splice(flat_body), task_jump_back(-(len + 1))]
}
