//! Host functions preloaded into the root scope.
//!
//! A builtin value only carries its identity; the evaluator dispatches on it
//! so `print` can reach the output buffer.

use crate::interpreter::env::ScopeRef;
use crate::interpreter::value::{ObjectData, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Print,
    Panic,
    StringsLen,
}

impl BuiltinFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Panic => "panic",
            Self::StringsLen => "strings.len",
        }
    }
}

/// Seeds the root scope: `print`, `panic`, and the `strings` object whose
/// `len` field is a host function. Only called on a freshly created frame,
/// so the declarations cannot collide.
pub(crate) fn install(scope: &ScopeRef) {
    let mut frame = scope.borrow_mut();
    frame.declare_unchecked("print", Value::Host(BuiltinFunction::Print));
    frame.declare_unchecked("panic", Value::Host(BuiltinFunction::Panic));

    let strings = ObjectData::with_entries(vec![(
        "len".to_string(),
        Value::Host(BuiltinFunction::StringsLen),
    )]);
    frame.declare_unchecked("strings", Value::object(strings));
}
