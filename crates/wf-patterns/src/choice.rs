//! CHOICE / SIMPLE_MERGE, grounded in `controlflow.py`'s `CHOICE` and
//! `SIMPLE_MERGE`. Both build a small flat program and a gate/jump whose
//! offsets are computed from the branch layout at combinator build time, so
//! the arithmetic never has to be re-derived at run time.

use std::collections::HashMap;
use std::rc::Rc;

use wf_core::{Engine, NodeSpec, Transfer, WorkflowError};

use crate::task_jump_forward;

/// Picks exactly one of several labelled branches by running `arbiter` and
/// jumping to the branch whose label it returns. An arbiter result with no
/// matching branch is a terminal error (`original_source` lets the raw
/// `KeyError` propagate; here it becomes an explicit `WorkflowError`).
pub fn choice<T: 'static>(
    arbiter: Rc<dyn Fn(&Engine<T>) -> String>,
    branches: Vec<(String, Vec<NodeSpec<T>>)>,
) -> Vec<NodeSpec<T>> {
    let mut workflow = Vec::with_capacity(branches.len() * 2);
    let mut mapping = HashMap::with_capacity(branches.len());
    for (label, tasks) in branches {
        workflow.push(NodeSpec::List(tasks));
        mapping.insert(label, workflow.len() as i64);
        workflow.push(crate::break_node());
    }

    let gate = NodeSpec::call(move |eng: &mut Engine<T>| {
        let label = arbiter(eng);
        match mapping.get(&label) {
            Some(&offset) => Err(eng.jump_call(offset)),
            None => Err(Transfer::Error(WorkflowError::new(format!(
                "CHOICE: arbiter returned an unregistered label: {label}"
            )))),
        }
    });

    let mut out = vec![gate];
    out.extend(workflow);
    out
}

/// Converges several independent branches on one final step: each branch is
/// followed by a forward jump computed to skip every remaining
/// branch/jump pair and land on `final_step`.
pub fn simple_merge<T: 'static>(branches: Vec<Vec<NodeSpec<T>>>, final_step: Vec<NodeSpec<T>>) -> Vec<NodeSpec<T>> {
    let n = branches.len() as i64;
    let mut workflow = Vec::with_capacity(branches.len() * 2 + 1);
    let mut remaining = n * 2 + 1;
    for branch in branches {
        remaining -= 2;
        workflow.push(NodeSpec::List(branch));
        workflow.push(task_jump_forward(remaining));
    }
    workflow.push(NodeSpec::List(final_step));
    workflow
}
