//! In-memory reference implementations of the durable-object contract,
//! used by this crate's own tests the way `chem-core` ships
//! `InMemoryEventStore` beside its SQL-backed counterpart.

use std::cell::RefCell;

use crate::durable::{DurableEngineRecord, DurableToken};
use crate::status::{ObjectStatus, WorkflowStatus};

#[derive(Debug, Default)]
struct TokenState {
    status: ObjectStatus,
    error_message: Option<String>,
    task_counter: Option<Vec<i64>>,
    id_workflow: Option<String>,
}

/// A token whose persisted state lives entirely in memory, behind a
/// `RefCell` so it can implement `DurableToken::save`/`set_error_message`
/// with `&self`.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    pub name: String,
    state: RefCell<TokenState>,
}

impl InMemoryToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), state: RefCell::new(TokenState::default()) }
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error_message.clone()
    }

    pub fn task_counter(&self) -> Option<Vec<i64>> {
        self.state.borrow().task_counter.clone()
    }
}

impl DurableToken for InMemoryToken {
    fn save(&self, status: Option<ObjectStatus>, task_counter: Option<&[i64]>, id_workflow: Option<&str>) {
        let mut state = self.state.borrow_mut();
        if let Some(status) = status {
            state.status = status;
        }
        if let Some(task_counter) = task_counter {
            state.task_counter = Some(task_counter.to_vec());
        }
        if let Some(id_workflow) = id_workflow {
            state.id_workflow = Some(id_workflow.to_string());
        }
    }

    fn set_error_message(&self, text: &str) {
        self.state.borrow_mut().error_message = Some(text.to_string());
    }

    fn status(&self) -> ObjectStatus {
        self.state.borrow().status
    }
}

impl wf_core::TokenFeatures for InMemoryToken {}

/// An engine run's own durable record, held entirely in memory.
#[derive(Debug)]
pub struct InMemoryEngineRecord {
    pub uuid: String,
    pub name: String,
    status: WorkflowStatus,
}

impl InMemoryEngineRecord {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), name: name.into(), status: WorkflowStatus::New }
    }
}

impl DurableEngineRecord for InMemoryEngineRecord {
    fn save(&mut self, status: Option<WorkflowStatus>) {
        if let Some(status) = status {
            self.status = status;
        }
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> WorkflowStatus {
        self.status
    }
}
