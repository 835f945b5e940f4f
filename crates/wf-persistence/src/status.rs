//! `WorkflowStatus`/`ObjectStatus`: the DB overlay's lifecycle enums,
//! grounded in `original_source/workflow/engine_db.py`'s `WorkflowStatus`
//! and `ObjectStatus`.
//!
//! `original_source` keeps the numeric value and a separate display label
//! (`EnumLabel`) apart; Rust's enums don't need the indirection, so each
//! variant carries its label as a `&'static str` via `label()`.

use serde::{Deserialize, Serialize};

/// Engine-level status, spec §6's DB engine status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    New,
    Running,
    Halted,
    Error,
    Completed,
}

impl WorkflowStatus {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStatus::New => "New",
            WorkflowStatus::Running => "Running",
            WorkflowStatus::Halted => "Halted",
            WorkflowStatus::Error => "Error",
            WorkflowStatus::Completed => "Completed",
        }
    }
}

/// Token-level status, spec §6's `known_statuses` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObjectStatus {
    #[default]
    Initial,
    Completed,
    Halted,
    Running,
    Error,
}

impl ObjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ObjectStatus::Initial => "New",
            ObjectStatus::Completed => "Done",
            ObjectStatus::Halted => "Need action",
            ObjectStatus::Running => "In process",
            ObjectStatus::Error => "Error",
        }
    }
}
