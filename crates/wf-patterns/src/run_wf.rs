//! RUN_WF, grounded in `patterns/utils.py`'s `RUN_WF`.
//!
//! `original_source` can cache the sub-engine it creates inside
//! `eng.extra_data[outkey]` across invocations unless `reinit` is set, since
//! `extra_data` there is a plain attribute dict that can hold anything,
//! including another engine instance. `wf_core::Engine::extra_data` is a
//! JSON map (spec §6's serialisation format requires it to be), which
//! cannot hold a live `Engine`, so the caching path has no equivalent here:
//! every invocation builds a fresh sub-engine. `engine_cls`/`data_connector`
//! are dropped for the same reason one level down — nothing about them
//! survives a JSON-only `extra_data`.

use wf_core::{flatten, Engine, Node, NodeSpec, TokenFeatures};

/// Runs `program` as a nested sub-workflow over the current token,
/// forwarding `pass_keys` from the parent's `extra_data` into the child's.
pub fn run_wf<T>(program: Vec<NodeSpec<T>>, pass_keys: Vec<String>) -> NodeSpec<T>
    where T: TokenFeatures + Clone + 'static
{
    let flat_program: Vec<Node<T>> = flatten(program);
    NodeSpec::call(move |eng: &mut Engine<T>| {
        let token = eng.current_token().cloned();

        let mut sub_engine: Engine<T> = Engine::new();
        for key in &pass_keys {
            if let Some(value) = eng.extra_data.get(key).cloned() {
                sub_engine.extra_data.insert(key.clone(), value);
            }
        }
        let program: Vec<NodeSpec<T>> = flat_program.clone().into_iter().map(crate::respec).collect();
        sub_engine.callbacks.set_workflow(program);

        if let Some(token) = token {
            let _ = sub_engine.process(vec![token], true, true, true);
        }
        Ok(())
    })
}
