//! End-to-end coverage of the DB overlay's status transitions (spec §6).

use wf_core::{Engine, NodeSpec, RunOutcome};
use wf_persistence::{DbHooks, DurableToken, InMemoryEngineRecord, InMemoryToken, ObjectStatus, WorkflowStatus};

#[test]
fn a_clean_run_marks_every_token_and_the_record_completed() {
    let record = InMemoryEngineRecord::new("wf-1", "demo");
    let hooks = DbHooks::new(record);
    let mut engine: Engine<InMemoryToken> = Engine::with_hooks(Box::new(hooks));
    engine.callbacks.set_workflow(vec![NodeSpec::call(|_eng| Ok(()))]);

    let tokens = vec![InMemoryToken::new("one"), InMemoryToken::new("two")];
    let outcome = engine.process(tokens, true, true, true).unwrap();
    assert_eq!(outcome, RunOutcome::Completed);

    for token in engine.tokens() {
        assert_eq!(token.status(), ObjectStatus::Completed);
    }
}

#[test]
fn a_halt_marks_the_halting_token_and_the_record_halted() {
    let record = InMemoryEngineRecord::new("wf-2", "demo");
    let hooks = DbHooks::new(record);
    let mut engine: Engine<InMemoryToken> = Engine::with_hooks(Box::new(hooks));
    engine.callbacks.set_workflow(vec![NodeSpec::call(|eng| Err(eng.halt("needs review")))]);

    let tokens = vec![InMemoryToken::new("only")];
    let outcome = engine.process(tokens, true, true, true).unwrap();
    match outcome {
        RunOutcome::Halted { message, .. } => assert_eq!(message, "needs review"),
        other => panic!("expected a halt, got {other:?}"),
    }
    assert_eq!(engine.tokens()[0].status(), ObjectStatus::Halted);
}

#[test]
fn an_unhandled_error_marks_the_token_and_record_with_the_message() {
    let record = InMemoryEngineRecord::new("wf-3", "demo");
    let hooks = DbHooks::new(record);
    let mut engine: Engine<InMemoryToken> = Engine::with_hooks(Box::new(hooks));
    engine
        .callbacks
        .set_workflow(vec![NodeSpec::call(|_eng| Err(wf_core::Transfer::Error(wf_core::WorkflowError::new("boom"))))]);

    let tokens = vec![InMemoryToken::new("only")];
    let err = engine.process(tokens, true, true, true).unwrap_err();
    assert_eq!(err.message, "boom");
    assert_eq!(engine.tokens()[0].status(), ObjectStatus::Error);
    assert_eq!(engine.tokens()[0].error_message().as_deref(), Some("boom"));
}
