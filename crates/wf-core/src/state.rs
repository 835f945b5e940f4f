//! `MachineState`: the two-dimensional instruction pointer (spec §3).

use serde::{Deserialize, Serialize};

/// Instruction pointer for a running (or halted) engine.
///
/// Invariants (spec §3, §8):
/// - `token_pos >= -1`.
/// - `callback_pos` is never empty.
/// - On a clean restart, `callback_pos == [0]`.
/// - On completion, `token_pos == tokens.len() - 1 && current_object_processed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    token_pos: i64,
    callback_pos: Vec<i64>,
    pub current_object_processed: bool,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    pub fn new() -> Self {
        Self { token_pos: -1, callback_pos: vec![0], current_object_processed: false }
    }

    pub fn reset(&mut self) {
        self.reset_token_pos();
        self.reset_callback_pos();
        self.current_object_processed = false;
    }

    pub fn reset_token_pos(&mut self) {
        self.token_pos = -1;
    }

    pub fn reset_callback_pos(&mut self) {
        self.callback_pos = vec![0];
    }

    pub fn token_pos(&self) -> i64 {
        self.token_pos
    }

    /// Sets `token_pos`. Panics if `value < -1`, matching the
    /// `MachineState.__setattr__` guard in `original_source`.
    pub fn set_token_pos(&mut self, value: i64) {
        assert!(value >= -1, "token_pos may not be < -1");
        self.token_pos = value;
    }

    pub fn callback_pos(&self) -> &[i64] {
        &self.callback_pos
    }

    pub fn callback_pos_mut(&mut self) -> &mut Vec<i64> {
        &mut self.callback_pos
    }

    pub fn set_callback_pos(&mut self, value: Vec<i64>) {
        assert!(!value.is_empty(), "callback_pos may not be empty");
        self.callback_pos = value;
    }
}
