//! End-to-end coverage of the control-flow combinators, each run through a
//! real `wf_core::Engine`.

use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use wf_core::{Engine, NodeSpec, RunOutcome, TokenFeatures};
use wf_patterns::{choice, cmp, if_else, r#for, r#if, r#while, simple_merge, synchronize, try_call, BranchBuilder, CmpOp, ForOrder, OnFailure};

#[derive(Debug, Clone, Default)]
struct Tok {
    trail: String,
    counter: i64,
}

impl TokenFeatures for Tok {}

fn push(eng: &mut Engine<Tok>, word: &str) {
    let token = eng.current_token_mut().unwrap();
    if token.trail.is_empty() {
        token.trail = word.to_string();
    } else {
        token.trail.push(' ');
        token.trail.push_str(word);
    }
}

fn step(word: &'static str) -> NodeSpec<Tok> {
    NodeSpec::call(move |eng| {
        push(eng, word);
        Ok(())
    })
}

#[test]
fn if_runs_the_branch_only_when_the_condition_holds() {
    let condition = wf_patterns::cond(|eng: &Engine<Tok>| eng.current_token().unwrap().counter > 0);
    let program = vec![step("start"), NodeSpec::List(r#if(condition, vec![step("bonus")])), step("end")];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok { counter: 1, ..Default::default() }, Tok { counter: 0, ..Default::default() }], true, true, true).unwrap();

    assert_eq!(engine.tokens()[0].trail, "start bonus end");
    assert_eq!(engine.tokens()[1].trail, "start end");
}

#[test]
fn if_else_takes_exactly_one_side() {
    let condition = wf_patterns::cond(|eng: &Engine<Tok>| eng.current_token().unwrap().counter > 0);
    let program = vec![NodeSpec::List(if_else(condition, vec![step("positive")], vec![step("non_positive")]))];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok { counter: 5, ..Default::default() }, Tok { counter: -5, ..Default::default() }], true, true, true).unwrap();

    assert_eq!(engine.tokens()[0].trail, "positive");
    assert_eq!(engine.tokens()[1].trail, "non_positive");
}

#[test]
fn while_loops_until_the_condition_turns_false() {
    let condition = wf_patterns::cond(|eng: &Engine<Tok>| eng.current_token().unwrap().counter < 3);
    let increment = NodeSpec::call(|eng: &mut Engine<Tok>| {
        eng.current_token_mut().unwrap().counter += 1;
        push(eng, "tick");
        Ok(())
    });
    let program = vec![NodeSpec::List(r#while(condition, vec![increment]))];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok::default()], true, true, true).unwrap();

    assert_eq!(engine.tokens()[0].trail, "tick tick tick");
    assert_eq!(engine.tokens()[0].counter, 3);
}

#[test]
fn for_iterates_the_full_list_then_breaks_out() {
    let list_fn: wf_patterns::ListFn<Tok> =
        Rc::new(|_eng: &Engine<Tok>| vec![Value::from(1), Value::from(2), Value::from(3)]);
    let setter: wf_patterns::ForSetter<Tok> = Rc::new(|eng: &mut Engine<Tok>, _step, value| {
        let n = value.as_i64().unwrap_or(0);
        let token = eng.current_token_mut().unwrap();
        token.counter = n;
        token.trail.push_str(&format!(" {n}"));
    });
    let program = vec![NodeSpec::List(r#for(list_fn, setter, vec![step("visit")], ForOrder::Asc, false))];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok::default()], true, true, true).unwrap();

    assert_eq!(engine.tokens()[0].trail.trim(), "1 visit 2 visit 3 visit");
    assert_eq!(engine.tokens()[0].counter, 3);
}

#[test]
fn choice_jumps_to_the_branch_the_arbiter_names() {
    let arbiter: Rc<dyn Fn(&Engine<Tok>) -> String> =
        Rc::new(|eng: &Engine<Tok>| if eng.current_token().unwrap().counter > 0 { "pos".to_string() } else { "neg".to_string() });
    let program = choice(arbiter, vec![("pos".to_string(), vec![step("pos")]), ("neg".to_string(), vec![step("neg")])]);

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok { counter: 1, ..Default::default() }, Tok { counter: -1, ..Default::default() }], true, true, true).unwrap();

    assert_eq!(engine.tokens()[0].trail, "pos");
    assert_eq!(engine.tokens()[1].trail, "neg");
}

#[test]
fn simple_merge_converges_every_branch_on_the_final_step() {
    let program = simple_merge(vec![vec![step("a")], vec![step("b")]], vec![step("done")]);

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok::default()], true, true, true).unwrap();
    assert_eq!(engine.tokens()[0].trail, "a done");
}

#[test]
fn cmp_reads_true_when_the_comparison_holds() {
    let condition = cmp::<Tok, _, _, _>(|eng: &Engine<Tok>| eng.current_token().unwrap().counter, |_eng: &Engine<Tok>| 10, CmpOp::Gte);
    let program = vec![NodeSpec::List(r#if(condition, vec![step("reached")]))];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok { counter: 10, ..Default::default() }], true, true, true).unwrap();
    assert_eq!(engine.tokens()[0].trail, "reached");
}

#[test]
fn try_call_recovers_via_onfailure_after_exhausting_retries() {
    let failing: wf_core::Callback<Tok> =
        Rc::new(|_eng: &mut Engine<Tok>| Err(wf_core::Transfer::Error(wf_core::WorkflowError::new("flaky"))));
    let recover: wf_core::Callback<Tok> = Rc::new(|eng: &mut Engine<Tok>| {
        push(eng, "recovered");
        Ok(())
    });
    let program = vec![try_call(failing, 1, OnFailure::Call(recover), false)];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    let outcome = engine.process(vec![Tok::default()], true, true, true).unwrap();
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(engine.tokens()[0].trail, "recovered");
}

#[test]
fn synchronize_waits_for_branches_then_runs_the_final_step() {
    let branch: BranchBuilder<Tok> = std::sync::Arc::new(|| vec![step("branch")]);
    let final_step: wf_core::Callback<Tok> = Rc::new(|eng: &mut Engine<Tok>| {
        push(eng, "final");
        Ok(())
    });
    let program = vec![synchronize(vec![branch], final_step, Duration::from_secs(1))];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    engine.process(vec![Tok::default()], true, true, true).unwrap();
    assert_eq!(engine.tokens()[0].trail, "final");
}

#[test]
fn synchronize_times_out_when_a_branch_outlasts_the_deadline() {
    let slow: BranchBuilder<Tok> = std::sync::Arc::new(|| {
        vec![NodeSpec::call(|eng: &mut Engine<Tok>| {
            std::thread::sleep(Duration::from_millis(200));
            push(eng, "branch");
            Ok(())
        })]
    });
    let final_step: wf_core::Callback<Tok> = Rc::new(|eng: &mut Engine<Tok>| {
        push(eng, "final");
        Ok(())
    });
    let program = vec![synchronize(vec![slow.clone(), slow], final_step, Duration::from_millis(50))];

    let mut engine: Engine<Tok> = Engine::new();
    engine.callbacks.set_workflow(program);
    let err = engine.process(vec![Tok::default()], true, true, true).unwrap_err();
    assert!(err.message.contains("timed out"));
    assert_eq!(engine.tokens()[0].trail, "");
}
