//! End-to-end tests for the outer token loop and the recursive callback
//! walker, covering the invariants and scenarios a resumable, addressable
//! program counter must hold.

use wf_core::{Engine, NodeSpec, RestartPoint, RunOutcome, TokenFeatures};

#[derive(Debug, Clone, Default)]
struct Tok {
    name: String,
    sem: String,
}

impl TokenFeatures for Tok {}

fn tok(name: &str) -> Tok {
    Tok { name: name.to_string(), sem: String::new() }
}

fn append(eng: &mut Engine<Tok>, word: &str) {
    let current = eng.current_token_mut().expect("a token is being processed");
    if current.sem.is_empty() {
        current.sem = word.to_string();
    } else {
        current.sem.push(' ');
        current.sem.push_str(word);
    }
}

fn m(word: &'static str) -> NodeSpec<Tok> {
    NodeSpec::call(move |eng| {
        append(eng, word);
        Ok(())
    })
}

fn jc(step: i64) -> NodeSpec<Tok> {
    NodeSpec::call(move |eng| Err(eng.jump_call(step)))
}

#[test]
fn nested_sequence_runs_every_leaf_in_document_order() {
    let program = vec![
        m("mouse"),
        NodeSpec::List(vec![
            m("dog"),
            NodeSpec::List(vec![m("cat"), m("puppy")]),
            NodeSpec::List(vec![m("python"), NodeSpec::List(vec![m("wasp"), m("leon")])]),
            m("horse"),
        ]),
    ];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    let tokens = vec![tok("one"), tok("two"), tok("three")];

    let outcome = engine.process(tokens, true, true, true).unwrap();
    assert_eq!(outcome, RunOutcome::Completed);
    for t in engine.tokens() {
        assert_eq!(t.sem, "mouse dog cat puppy python wasp leon horse");
    }
    assert!(engine.has_completed());
}

#[test]
fn forward_jump_call_skips_the_nested_block() {
    // [JumpCall(3), m("mouse"), [four callables], m("horse")]
    let program = vec![
        jc(3),
        m("mouse"),
        NodeSpec::List(vec![m("dog"), m("cat"), m("puppy"), m("python")]),
        m("horse"),
    ];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    let tokens = vec![tok("one"), tok("two")];

    engine.process(tokens, true, true, true).unwrap();
    for t in engine.tokens() {
        assert_eq!(t.sem, "horse");
    }
}

#[test]
fn backward_jump_call_clamps_at_the_start_of_its_level() {
    // JumpCall(-10) from position 1 must clamp to index 0 (this level's
    // start), never below it. Guarded to fire once so the run terminates.
    let guarded_jump = NodeSpec::call(|eng: &mut Engine<Tok>| {
        if eng.extra_data.contains_key("jumped") {
            Ok(())
        } else {
            eng.extra_data.insert("jumped".into(), true.into());
            Err(eng.jump_call(-10))
        }
    });
    let program = vec![m("mouse"), guarded_jump, m("dog")];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    let tokens = vec![tok("one")];

    engine.process(tokens, true, true, true).unwrap();
    assert_eq!(engine.tokens()[0].sem, "mouse mouse dog");
}

#[test]
fn tuples_are_spliced_and_never_addressable() {
    // A Splice containing two leaves must behave exactly as if its
    // contents had been written inline at the parent level: the flattened
    // program has 4 flat slots, not 3 slots with a nested pair.
    let program = vec![m("mouse"), NodeSpec::Splice(vec![m("a"), m("b")]), m("horse")];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);

    let installed = engine.callbacks.get("*").unwrap();
    assert_eq!(installed.len(), 4, "the splice must flatten into the parent sequence, not nest");

    let tokens = vec![tok("one")];
    engine.process(tokens, true, true, true).unwrap();
    assert_eq!(engine.tokens()[0].sem, "mouse a b horse");
}

#[test]
fn halt_is_resumable_and_restart_continues_from_the_halted_position() {
    let halt_leaf = NodeSpec::call(|eng: &mut Engine<Tok>| {
        if eng.extra_data.contains_key("halted_once") {
            Ok(())
        } else {
            eng.extra_data.insert("halted_once".into(), true.into());
            Err(eng.halt("stopping for inspection"))
        }
    });
    let program = vec![m("mouse"), m("dog"), halt_leaf, m("horse")];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    let tokens = vec![tok("one"), tok("two")];

    let outcome = engine.process(tokens, true, true, true).unwrap();
    match outcome {
        RunOutcome::Halted { message, .. } => assert_eq!(message, "stopping for inspection"),
        other => panic!("expected a halt, got {other:?}"),
    }
    assert_eq!(engine.tokens()[0].sem, "mouse dog");
    assert_eq!(engine.tokens()[1].sem, "");
    assert_eq!(engine.state.token_pos(), 0);
    assert_eq!(engine.state.callback_pos().to_vec(), vec![2i64]);

    let outcome = engine.restart(RestartPoint::Current, RestartPoint::Next, true, true).unwrap();
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(engine.tokens()[0].sem, "mouse dog horse");
    assert_eq!(engine.tokens()[1].sem, "mouse dog horse");
    assert!(engine.has_completed());
}

#[test]
fn unknown_program_key_fails_with_a_message_naming_the_key() {
    let engine: Engine<Tok> = Engine::new();
    let err = engine.callbacks.get("middle").unwrap_err();
    assert!(err.to_string().contains("middle"));
}

#[test]
fn empty_callbacks_are_rejected_before_processing_starts() {
    let mut engine: Engine<Tok> = Engine::new();
    let err = engine.process(vec![tok("one")], true, true, true).unwrap_err();
    assert!(err.message.contains("callbacks are empty"));
}
