//! PARALLEL_SPLIT / SYNCHRONIZE, grounded in `controlflow.py`'s
//! `PARALLEL_SPLIT` and `SYNCHRONIZE` and scoped to spec §5's concurrency
//! model: one OS thread per branch, a fresh duplicated engine per thread,
//! a shared mutex for branches that touch common state.
//!
//! `original_source` spawns a thread that closes over the same Python
//! function objects the parent engine already holds, because the GIL makes
//! that safe. `wf_core`'s `Callback<T>` is `Rc<dyn Fn(..)>`, which is not
//! `Send`, so a program built on the parent thread cannot be hand off to a
//! worker thread as-is. Each branch is therefore supplied as a *builder* —
//! a `Send` closure with no `Rc` captures — that constructs its own
//! `NodeSpec` program after it is already running on the worker thread.
//! This is the idiomatic Rust shape of "duplicate engine per branch": the
//! duplication happens on the far side of the `thread::spawn` boundary.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use wf_core::{Callback, Engine, NodeSpec, Transfer, TokenFeatures, WorkflowError};

/// Builds a branch's program from scratch, on whichever thread calls it.
pub type BranchBuilder<T> = Arc<dyn Fn() -> Vec<NodeSpec<T>> + Send + Sync>;

/// Fire-and-forget: spawns one duplicated engine and OS thread per branch,
/// shares a lock through `Engine::parallel_lock`, and returns immediately
/// without waiting on any of them.
pub fn parallel_split<T>(branches: Vec<BranchBuilder<T>>) -> NodeSpec<T>
    where T: TokenFeatures + Clone + Send + 'static
{
    NodeSpec::call(move |eng: &mut Engine<T>| {
        let lock = Arc::new(Mutex::new(()));
        eng.parallel_lock = Some(lock.clone());

        let Some(token) = eng.current_token().cloned() else { return Ok(()) };

        for builder in &branches {
            let builder = builder.clone();
            let lock = lock.clone();
            let token = token.clone();
            thread::spawn(move || {
                let program = builder();
                let mut branch_engine: Engine<T> = Engine::new();
                branch_engine.parallel_lock = Some(lock);
                branch_engine.callbacks.set_workflow(program);
                let _ = branch_engine.process(vec![token], true, true, true);
            });
        }

        Ok(())
    })
}

/// Fans branches out to threads, waits for all of them up to `timeout`,
/// then runs `final_step` on the caller's own engine. A timeout is a
/// terminal error, matching `original_source`'s `ThreadError('NotFinished')`.
pub fn synchronize<T>(branches: Vec<BranchBuilder<T>>, final_step: Callback<T>, timeout: Duration) -> NodeSpec<T>
    where T: TokenFeatures + Clone + Send + 'static
{
    NodeSpec::call(move |eng: &mut Engine<T>| {
        let lock = Arc::new(Mutex::new(()));
        eng.parallel_lock = Some(lock.clone());

        let Some(token) = eng.current_token().cloned() else { return final_step(eng) };

        let (tx, rx) = mpsc::channel();
        for builder in &branches {
            let builder = builder.clone();
            let lock = lock.clone();
            let token = token.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                let program = builder();
                let mut branch_engine: Engine<T> = Engine::new();
                branch_engine.parallel_lock = Some(lock);
                branch_engine.callbacks.set_workflow(program);
                let _ = branch_engine.process(vec![token], true, true, true);
                let _ = tx.send(());
            });
        }
        drop(tx);

        let deadline = Instant::now() + timeout;
        for _ in 0..branches.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if rx.recv_timeout(remaining).is_err() {
                return Err(Transfer::Error(WorkflowError::new(
                    "SYNCHRONIZE timed out waiting for parallel branches to finish",
                )));
            }
        }

        final_step(eng)
    })
}
