//! The token contract for the default `callback_chooser` (spec §6).
//!
//! Tokens are otherwise fully opaque to the engine (spec §3, Non-goals): the
//! only thing the core ever asks of one is an optional feature lookup used
//! to pick a program by key, mirroring `original_source`'s deprecated
//! `obj.getFeature('type')` path in `GenericWorkflowEngine.callback_chooser`.
pub trait TokenFeatures {
    /// Returns the feature value for `name`, if any. The default
    /// `callback_chooser` only ever asks for `"type"`; returning `None`
    /// (the default implementation) makes every token select the `"*"`
    /// program, which is the common case.
    fn get_feature(&self, _name: &str) -> Option<String> {
        None
    }
}

// Tokens that don't care about feature-based dispatch can opt in with an
// empty `impl TokenFeatures for MyToken {}` to pick up the `None` default.
