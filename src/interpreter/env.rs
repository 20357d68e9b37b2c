//! Lexical scope chains.
//!
//! Frames are shared-ownership (`Rc<RefCell<_>>`): a frame stays alive as
//! long as any closure captures it or any executing block references it.
//! Cycles between a function value and its captured frame leak; the language
//! has no finalizers, so that is accepted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;

pub type ScopeRef = Rc<RefCell<Scope>>;

pub struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn root() -> ScopeRef {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: None,
        }))
    }

    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Inserts into this frame. Redeclaring a name already bound in the same
    /// frame is an error; shadowing a parent binding is not.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if self.bindings.contains_key(name) {
            return Err(RuntimeError::AlreadyDeclared {
                name: name.to_string(),
            });
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    pub(crate) fn declare_unchecked(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }
}

/// Walks the parent chain and returns the first binding.
pub fn lookup(scope: &ScopeRef, name: &str) -> Result<Value, RuntimeError> {
    let mut current = Rc::clone(scope);
    loop {
        if let Some(value) = current.borrow().bindings.get(name) {
            return Ok(value.clone());
        }
        let parent = current.borrow().parent.clone();
        match parent {
            Some(parent) => current = parent,
            None => {
                return Err(RuntimeError::UndefinedVariable {
                    name: name.to_string(),
                });
            }
        }
    }
}

/// Overwrites the first existing binding on the parent chain. Never creates
/// a new binding.
pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> Result<(), RuntimeError> {
    let mut current = Rc::clone(scope);
    loop {
        if let Some(binding) = current.borrow_mut().bindings.get_mut(name) {
            *binding = value;
            return Ok(());
        }
        let parent = current.borrow().parent.clone();
        match parent {
            Some(parent) => current = parent,
            None => {
                return Err(RuntimeError::UndefinedVariable {
                    name: name.to_string(),
                });
            }
        }
    }
}
