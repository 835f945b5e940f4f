//! `CallbackTree`: the keyed store of nested callable programs (spec §3,
//! §4.2), plus the flattening rule that distinguishes spliced fragments from
//! nested (addressable) ones.
//!
//! `original_source/workflow/engine.py`'s `Callbacks.cleanup_callables`
//! recurses over a mix of lists and tuples: tuples splice their contents
//! into the parent sequence, lists stay nested, `None` leaves are dropped.
//! Rust has no runtime-distinguishable "tuple vs. list" for heterogeneous
//! sequences, so `NodeSpec` makes that distinction explicit at the type
//! level: `List` is the list case, `Splice` is the tuple case. Combinators
//! build `NodeSpec` trees; `CallbackTree::add_many`/`replace` flatten them
//! into `Node` trees, which is the only shape the walker ever sees.

use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::Engine;
use crate::errors::WorkflowDefinitionError;
use crate::transfer::Transfer;

/// A single leaf callable: `engine -> Result<(), Transfer>`.
///
/// Unlike `original_source`'s `callback(obj, eng)`, a callback here only
/// receives the engine; it reaches the token being processed through
/// `Engine::current_token`/`current_token_mut`. Threading the token as a
/// second argument would alias the copy the engine already owns and force
/// every call site into index juggling for no benefit — the accessor gives
/// the same capability with one borrow instead of two.
pub type Callback<T> = Rc<dyn Fn(&mut Engine<T>) -> Result<(), Transfer>>;

/// Pre-install program shape, as produced by combinators and user code.
pub enum NodeSpec<T> {
    Call(Callback<T>),
    /// Stays nested and addressable once installed (the "list" case).
    List(Vec<NodeSpec<T>>),
    /// Spliced into the parent sequence at install time (the "tuple" case).
    Splice(Vec<NodeSpec<T>>),
    /// Dropped at install time, like a Python `None` leaf.
    Nil,
}

impl<T> NodeSpec<T> {
    pub fn call<F>(f: F) -> Self
        where F: Fn(&mut Engine<T>) -> Result<(), Transfer> + 'static
    {
        NodeSpec::Call(Rc::new(f))
    }
}

impl<T> From<Callback<T>> for NodeSpec<T> {
    fn from(callback: Callback<T>) -> Self {
        NodeSpec::Call(callback)
    }
}

impl<T> From<Vec<NodeSpec<T>>> for NodeSpec<T> {
    fn from(items: Vec<NodeSpec<T>>) -> Self {
        NodeSpec::List(items)
    }
}

/// Installed program shape: the only form the recursive walker traverses.
pub enum Node<T> {
    Call(Callback<T>),
    List(Vec<Node<T>>),
}

// Hand-written: `#[derive(Clone)]` would add a spurious `T: Clone` bound,
// since the derive macro can't see that `T` only ever appears behind
// `Engine<T>` in `Callback`, never stored directly.
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Node::Call(f) => Node::Call(f.clone()),
            Node::List(items) => Node::List(items.clone()),
        }
    }
}

// Hand-written for the same reason as `Clone` above: a derived `Debug`
// would add a spurious `T: Debug` bound, and `Callback<T>` can't implement
// `Debug` anyway since it's a boxed `Fn`.
impl<T> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Call(_) => f.write_str("Node::Call(..)"),
            Node::List(items) => f.debug_tuple("Node::List").field(items).finish(),
        }
    }
}

/// Applies the flattening rule: `Splice` contents are spliced into the
/// surrounding sequence (recursively), `List` contents stay nested, `Nil`
/// leaves are dropped. Mirrors `Callbacks.cleanup_callables`.
pub fn flatten<T>(specs: Vec<NodeSpec<T>>) -> Vec<Node<T>> {
    let mut out = Vec::with_capacity(specs.len());
    flatten_into(specs, &mut out);
    out
}

fn flatten_into<T>(specs: Vec<NodeSpec<T>>, out: &mut Vec<Node<T>>) {
    for spec in specs {
        match spec {
            NodeSpec::Call(f) => out.push(Node::Call(f)),
            NodeSpec::List(items) => out.push(Node::List(flatten(items))),
            NodeSpec::Splice(items) => flatten_into(items, out),
            NodeSpec::Nil => {}
        }
    }
}

/// The default key used when a token carries no dispatchable feature.
pub const DEFAULT_KEY: &str = "*";

/// Keyed store of installed programs.
pub struct CallbackTree<T> {
    programs: HashMap<String, Vec<Node<T>>>,
}

impl<T> Default for CallbackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallbackTree<T> {
    pub fn new() -> Self {
        Self { programs: HashMap::new() }
    }

    /// Returns the program for `key`, or an error naming the key if none is
    /// registered. Mirrors `_CallbacksDict.__getitem__`'s informative
    /// `KeyError`.
    pub fn get(&self, key: &str) -> Result<&[Node<T>], WorkflowDefinitionError> {
        self.programs.get(key).map(Vec::as_slice).ok_or_else(|| WorkflowDefinitionError { key: key.to_string() })
    }

    pub fn add(&mut self, func: Callback<T>, key: &str) {
        self.programs.entry(key.to_string()).or_default().push(Node::Call(func));
    }

    pub fn add_many(&mut self, specs: Vec<NodeSpec<T>>, key: &str) {
        self.programs.entry(key.to_string()).or_default().extend(flatten(specs));
    }

    pub fn replace(&mut self, specs: Vec<NodeSpec<T>>, key: &str) {
        self.clear(key);
        self.add_many(specs, key);
    }

    /// `replace("*", specs)`, spec §4.2.
    pub fn set_workflow(&mut self, specs: Vec<NodeSpec<T>>) {
        self.replace(specs, DEFAULT_KEY);
    }

    pub fn clear(&mut self, key: &str) {
        self.programs.remove(key);
    }

    pub fn clear_all(&mut self) {
        self.programs.clear();
    }

    pub fn empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.programs.contains_key(key)
    }
}
