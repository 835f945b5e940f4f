//! `Engine`: the outer token loop and the recursive callback walker
//! (spec §3, §4.3, §4.5). Grounded throughout in
//! `original_source/workflow/engine.py`'s `GenericWorkflowEngine`.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::callbacks::{CallbackTree, Node, DEFAULT_KEY};
use crate::engine::hooks::{DefaultHooks, EngineHooks};
use crate::errors::WorkflowError;
use crate::signal::{SignalBus, SignalKind};
use crate::state::MachineState;
use crate::token::TokenFeatures;
use crate::transfer::Transfer;

/// How a `process`/`restart` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every token ran to completion.
    Completed,
    /// The run halted at a resumable position.
    Halted { message: String, action: Option<String>, payload: Option<Value> },
}

/// Relative position used by `restart` for either dimension of the
/// instruction pointer. `original_source`'s `restart` takes the strings
/// `"prev"`/`"current"`/`"next"`/`"first"` for both `obj` and `task`; this
/// enum is that same small vocabulary, shared between both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPoint {
    Prev,
    Current,
    Next,
    First,
}

enum LoopSignal {
    Break,
    Continue,
    Fallthrough,
}

/// The task-graph executor: a keyed set of nested programs, a two-axis
/// instruction pointer, and the extension points a host plugs into it.
pub struct Engine<T> {
    pub callbacks: CallbackTree<T>,
    pub state: MachineState,
    /// Free-form run-scoped storage (spec §6's `extra_data`), serializable
    /// so a persistence overlay can freeze and rehydrate it alongside
    /// `state`.
    pub extra_data: Map<String, Value>,
    /// Held by `PARALLEL_SPLIT`/`SYNCHRONIZE` (spec §4.5) across worker
    /// threads. Kept as its own field rather than inside `extra_data`
    /// because a `Mutex` handle can't be represented as a `serde_json::Value`.
    pub parallel_lock: Option<Arc<Mutex<()>>>,
    signals: SignalBus,
    hooks: Box<dyn EngineHooks<T>>,
    tokens: Vec<T>,
}

impl<T> Engine<T> {
    pub fn new() -> Self
        where T: 'static
    {
        Self::with_hooks(Box::new(DefaultHooks))
    }

    pub fn with_hooks(hooks: Box<dyn EngineHooks<T>>) -> Self {
        Self {
            callbacks: CallbackTree::new(),
            state: MachineState::new(),
            extra_data: Map::new(),
            parallel_lock: None,
            signals: SignalBus::new(),
            hooks,
            tokens: Vec::new(),
        }
    }

    pub fn signals(&mut self) -> &mut SignalBus {
        &mut self.signals
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut [T] {
        &mut self.tokens
    }

    /// The token at `state.token_pos`, or `None` before the first token and
    /// after a run that reset state. `original_source`: `current_object`.
    pub fn current_token(&self) -> Option<&T> {
        let pos = self.state.token_pos();
        if pos < 0 {
            None
        } else {
            self.tokens.get(pos as usize)
        }
    }

    pub fn current_token_mut(&mut self) -> Option<&mut T> {
        let pos = self.state.token_pos();
        if pos < 0 {
            None
        } else {
            self.tokens.get_mut(pos as usize)
        }
    }

    /// A diagnostic position descriptor for the task currently executing.
    /// `original_source`'s `current_taskname` reports the target callable's
    /// `__name__`; Rust closures carry no such reflection, so this reports
    /// the nested `callback_pos` coordinates instead.
    pub fn current_taskname(&self) -> Option<String> {
        if self.state.token_pos() < 0 {
            return None;
        }
        Some(format!("{:?}", self.state.callback_pos()))
    }

    pub fn has_completed(&self) -> bool {
        if self.state.token_pos() == -1 {
            return false;
        }
        (self.tokens.len() as i64) - 1 == self.state.token_pos() && self.state.current_object_processed
    }

    // -- transfer constructors, called from inside a callback -------------
    //
    // `original_source`'s equivalents raise; these build the `Transfer`
    // value the callback returns instead (spec §9 redesign note).

    pub fn stop(&self) -> Transfer {
        Transfer::StopProcessing
    }

    pub fn halt(&self, message: impl Into<String>) -> Transfer {
        Transfer::halt(message)
    }

    pub fn halt_with(&self, message: impl Into<String>, action: Option<String>, payload: Option<Value>) -> Transfer {
        Transfer::halt_with(message, action, payload)
    }

    pub fn abort(&self) -> Transfer {
        Transfer::AbortProcessing
    }

    pub fn skip_token(&self) -> Transfer {
        Transfer::SkipToken
    }

    pub fn continue_next_token(&self) -> Transfer {
        Transfer::ContinueNextToken
    }

    pub fn break_current_loop(&self) -> Transfer {
        Transfer::BreakFromThisLoop
    }

    pub fn jump_token(&self, offset: i64) -> Transfer {
        Transfer::JumpToken(offset)
    }

    pub fn jump_call(&self, offset: i64) -> Transfer {
        Transfer::JumpCall(offset)
    }
}

impl<T: TokenFeatures> Engine<T> {
    fn pre_flight_checks(&self, tokens: &[T]) -> Result<(), WorkflowError> {
        if tokens.is_empty() {
            log::warn!("token list is empty; running a workflow on an empty set has no effect");
        }
        if self.callbacks.empty() {
            return Err(WorkflowError::new("the callbacks are empty, did you set them?"));
        }
        Ok(())
    }

    /// Starts processing `tokens` from scratch (or from whatever `state`
    /// holds, if `reset_state` is false). `original_source`: `process`.
    pub fn process(
        &mut self,
        tokens: Vec<T>,
        stop_on_error: bool,
        stop_on_halt: bool,
        reset_state: bool,
    ) -> Result<RunOutcome, WorkflowError> {
        self.pre_flight_checks(&tokens)?;
        if tokens.is_empty() {
            return Ok(RunOutcome::Completed);
        }
        if reset_state {
            self.state.reset();
        }
        self.tokens = tokens;
        self.run_loop(stop_on_error, stop_on_halt, true)
    }

    /// Restarts at a position relative to the current state.
    /// `original_source`: `restart`.
    pub fn restart(
        &mut self,
        obj: RestartPoint,
        task: RestartPoint,
        stop_on_error: bool,
        stop_on_halt: bool,
    ) -> Result<RunOutcome, WorkflowError> {
        self.apply_restart_point(obj, task);
        self.run_loop(stop_on_error, stop_on_halt, true)
    }

    fn apply_restart_point(&mut self, obj: RestartPoint, task: RestartPoint) {
        match obj {
            RestartPoint::Prev => self.state.set_token_pos(self.state.token_pos() - 2),
            RestartPoint::Current => self.state.set_token_pos(self.state.token_pos() - 1),
            RestartPoint::Next => {}
            RestartPoint::First => self.state.set_token_pos(-1),
        }
        match task {
            RestartPoint::Prev => {
                let mut pos = self.state.callback_pos().to_vec();
                if let Some(last) = pos.last_mut() {
                    *last -= 1;
                }
                self.state.set_callback_pos(pos);
            }
            RestartPoint::Current => {}
            RestartPoint::Next => {
                let mut pos = self.state.callback_pos().to_vec();
                if let Some(last) = pos.last_mut() {
                    *last += 1;
                }
                self.state.set_callback_pos(pos);
            }
            RestartPoint::First => self.state.reset_callback_pos(),
        }
    }

    fn run_loop(&mut self, stop_on_error: bool, stop_on_halt: bool, mut initial_run: bool) -> Result<RunOutcome, WorkflowError> {
        loop {
            if !initial_run {
                self.apply_restart_point(RestartPoint::Next, RestartPoint::First);
            }
            initial_run = false;

            match self.run_tokens() {
                Ok(()) => return Ok(RunOutcome::Completed),
                Err(Transfer::Halt { message, action, payload }) => {
                    self.signals.emit(SignalKind::WorkflowHalted);
                    if stop_on_halt {
                        return Ok(RunOutcome::Halted { message, action, payload });
                    }
                }
                Err(Transfer::Error(err)) => {
                    self.signals.emit(SignalKind::WorkflowError);
                    if stop_on_error {
                        return Err(err);
                    }
                }
                Err(other) => {
                    unreachable!("run_tokens leaked a non-terminal transfer: {other:?}")
                }
            }
        }
    }

    /// Processes every remaining token. `original_source`: `_process`.
    fn run_tokens(&mut self) -> Result<(), Transfer> {
        self.hooks.before_processing(&self.tokens);
        self.signals.emit(SignalKind::WorkflowStarted);
        self.state.current_object_processed = false;

        while (self.tokens.len() as i64) - 1 > self.state.token_pos() {
            self.state.set_token_pos(self.state.token_pos() + 1);
            let idx = self.state.token_pos() as usize;
            self.hooks.before_object(&self.tokens, idx);

            let key = callback_chooser(&self.tokens[idx]);
            if self.callbacks.contains(&key) {
                let program: Vec<Node<T>> = self
                    .callbacks
                    .get(&key)
                    .map_err(|e| Transfer::Error(WorkflowError::new(e.to_string())))?
                    .to_vec();

                self.hooks.before_callbacks(&self.tokens[idx]);
                let result = self.run_callbacks(&program, 0);
                self.hooks.after_callbacks(&self.tokens[idx]);

                match result {
                    Ok(()) => self.hooks.after_object(&self.tokens, idx),
                    Err(transfer) => match self.handle_token_transfer(transfer, idx)? {
                        LoopSignal::Break => break,
                        LoopSignal::Continue => continue,
                        LoopSignal::Fallthrough => {}
                    },
                }
            }
            self.state.reset_callback_pos();
        }

        self.hooks.after_processing(&self.tokens);
        self.signals.emit(SignalKind::WorkflowFinished);
        self.state.current_object_processed = true;
        Ok(())
    }

    fn handle_token_transfer(&mut self, transfer: Transfer, token_idx: usize) -> Result<LoopSignal, Transfer> {
        match transfer {
            Transfer::StopProcessing => {
                self.hooks.on_stop_processing(&self.tokens[token_idx]);
                Ok(LoopSignal::Break)
            }
            Transfer::ContinueNextToken => {
                self.hooks.on_continue_next_token(&self.tokens[token_idx]);
                self.state.reset_callback_pos();
                Ok(LoopSignal::Continue)
            }
            Transfer::SkipToken => {
                self.hooks.on_skip_token(&self.tokens[token_idx]);
                Ok(LoopSignal::Continue)
            }
            Transfer::AbortProcessing => {
                self.hooks.on_abort_processing(&self.tokens[token_idx]);
                Ok(LoopSignal::Break)
            }
            Transfer::JumpToken(step) => {
                self.apply_jump_token(step);
                Ok(LoopSignal::Fallthrough)
            }
            Transfer::Halt { message, action, payload } => {
                self.hooks.on_halt_processing(&self.tokens[token_idx], &message);
                Err(Transfer::Halt { message, action, payload })
            }
            Transfer::Error(err) => {
                self.hooks.on_error(&self.tokens[token_idx], &err);
                Err(Transfer::Error(err))
            }
            Transfer::BreakFromThisLoop | Transfer::JumpCall(_) => {
                unreachable!("absorbed inside the callback walker before reaching the token level")
            }
        }
    }

    fn apply_jump_token(&mut self, step: i64) {
        let len = self.tokens.len() as i64;
        let cur = self.state.token_pos();
        let target = if step > 0 {
            std::cmp::min(len, cur - 1 + step)
        } else {
            std::cmp::max(-1, cur - 1 + step)
        };
        self.state.set_token_pos(target);
        self.state.reset_callback_pos();
    }

    /// Recursively walks `nodes` from the current `callback_pos[indent]`.
    /// `original_source`: `run_callbacks`.
    fn run_callbacks(&mut self, nodes: &[Node<T>], indent: usize) -> Result<(), Transfer> {
        loop {
            let len = nodes.len() as i64;
            if self.state.callback_pos()[indent] >= len {
                break;
            }
            let idx = self.state.callback_pos()[indent] as usize;
            let was_restarted = self.state.callback_pos().len() - 1 > indent;

            match &nodes[idx] {
                Node::List(children) => {
                    let children = children.clone();
                    if !was_restarted {
                        self.state.callback_pos_mut().push(0);
                    }
                    match self.run_callbacks(&children, indent + 1) {
                        Ok(()) => {
                            self.state.callback_pos_mut().pop();
                            self.bump_callback_pos(indent, 1);
                        }
                        // keep the descended depth in `callback_pos`: a halt or
                        // error must resume exactly where it left off.
                        Err(other) => return Err(other),
                    }
                }
                Node::Call(callback) => {
                    if was_restarted {
                        // a restart pointed one level deeper than this leaf goes;
                        // nothing to fast-forward into, so just step past it.
                        self.bump_callback_pos(indent, 1);
                    } else {
                        let callback = callback.clone();
                        let token_idx = self.state.token_pos() as usize;
                        let name = "callback";
                        self.hooks.before_each_callback(&self.tokens[token_idx], name);
                        let result = callback(self);
                        self.hooks.after_each_callback(&self.tokens[token_idx], name);
                        match result {
                            Ok(()) => self.bump_callback_pos(indent, 1),
                            Err(Transfer::BreakFromThisLoop) => return Ok(()),
                            Err(Transfer::JumpCall(step)) => self.apply_jump_call(indent, nodes.len(), step),
                            Err(other) => return Err(other),
                        }
                    }
                }
            }
        }
        self.bump_callback_pos(indent, -1);
        Ok(())
    }

    fn bump_callback_pos(&mut self, indent: usize, delta: i64) {
        self.state.callback_pos_mut()[indent] += delta;
    }

    fn apply_jump_call(&mut self, indent: usize, len: usize, step: i64) {
        let len = len as i64;
        let pos = self.state.callback_pos()[indent];
        let adjusted = if step >= 0 {
            std::cmp::min(len, pos + step - 1)
        } else {
            std::cmp::max(-1, pos + step - 1)
        };
        self.state.callback_pos_mut()[indent] = adjusted + 1;
    }
}

/// Picks the program key for `token`. `original_source`: `callback_chooser`
/// (minus the deprecated `getFeature` duck-typing path).
fn callback_chooser<T: TokenFeatures>(token: &T) -> String {
    token.get_feature("type").unwrap_or_else(|| DEFAULT_KEY.to_string())
}

impl<T: 'static> Default for Engine<T> {
    fn default() -> Self {
        Self::new()
    }
}
