//! Runtime value model.
//!
//! Null, booleans, integers, and floats are value-like and copied on pass.
//! Strings, objects, and functions are handles: cloning a `Value` clones the
//! `Rc`, so every binding aliases the same buffer/map/closure and mutation
//! through one alias is visible through all. Execution is single-threaded,
//! so non-atomic counts suffice.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::builtins::BuiltinFunction;
use crate::interpreter::env::ScopeRef;
use crate::parser::ast::Statement;

pub type StrRef = Rc<RefCell<Vec<u8>>>;
pub type ObjectRef = Rc<RefCell<ObjectData>>;

/// Insertion-ordered string-keyed entries; lookups scan positionally.
pub struct ObjectData {
    entries: Vec<(String, Value)>,
}

impl ObjectData {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_entries(entries: Vec<(String, Value)>) -> Self {
        let mut object = Self::new();
        for (key, value) in entries {
            object.set(&key, value);
        }
        object
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
    }

    /// Overwrites an existing entry in place or appends a new one.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Some(entry) = self.entries.iter_mut().find(|(candidate, _)| candidate == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    fn render(&self, visiting: &mut Vec<*const RefCell<ObjectData>>) -> String {
        if self.entries.is_empty() {
            return "{}".to_string();
        }
        let rendered = self
            .entries
            .iter()
            .map(|(key, value)| format!("{key}: {}", value.render(visiting)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{ {rendered} }}")
    }
}

impl Default for ObjectData {
    fn default() -> Self {
        Self::new()
    }
}

/// A closure: parameter names, body block, and the scope in force when the
/// `fn` literal was evaluated.
pub struct FunctionData {
    pub params: Vec<String>,
    pub body: Vec<Statement>,
    pub closure: ScopeRef,
}

#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(BigInt),
    Float(f64),
    Str(StrRef),
    Object(ObjectRef),
    Function(Rc<FunctionData>),
    Host(BuiltinFunction),
}

impl Value {
    pub fn string(bytes: Vec<u8>) -> Self {
        Value::Str(Rc::new(RefCell::new(bytes)))
    }

    pub fn object(data: ObjectData) -> Self {
        Value::Object(Rc::new(RefCell::new(data)))
    }

    pub fn function(params: Vec<String>, body: Vec<Statement>, closure: ScopeRef) -> Self {
        Value::Function(Rc::new(FunctionData {
            params,
            body,
            closure,
        }))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) | Value::Host(_) => "function",
        }
    }

    /// Stringification used by `print`, `panic`, and the REPL echo.
    pub fn to_output(&self) -> String {
        self.render(&mut Vec::new())
    }

    fn render(&self, visiting: &mut Vec<*const RefCell<ObjectData>>) -> String {
        match self {
            Value::Null => "nil".to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => format_float(*value),
            Value::Str(buffer) => String::from_utf8_lossy(&buffer.borrow()).into_owned(),
            Value::Object(object) => {
                let pointer = Rc::as_ptr(object);
                if visiting.contains(&pointer) {
                    // Already being rendered further up this stack: cycle.
                    return "...".to_string();
                }
                visiting.push(pointer);
                let rendered = object.borrow().render(visiting);
                visiting.pop();
                rendered
            }
            Value::Function(_) => "[Zoe Function]".to_string(),
            Value::Host(_) => "[JavaScript Function]".to_string(),
        }
    }
}

/// Variant equality plus value equality for primitives; handle identity for
/// strings, objects, and functions. Mixed integer/float is unequal, never an
/// error.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::Str(left), Value::Str(right)) => Rc::ptr_eq(left, right),
            (Value::Object(left), Value::Object(right)) => Rc::ptr_eq(left, right),
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            (Value::Host(left), Value::Host(right)) => left == right,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name())
    }
}

fn format_float(value: f64) -> String {
    // A whole-valued float keeps its trailing .0 so it never reads as an
    // integer.
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_equality_is_identity_not_contents() {
        let first = Value::string(b"abc".to_vec());
        let second = Value::string(b"abc".to_vec());
        let alias = first.clone();
        assert_ne!(first, second);
        assert_eq!(first, alias);
    }

    #[test]
    fn mixed_numeric_equality_is_false() {
        assert_ne!(Value::Integer(BigInt::from(1)), Value::Float(1.0));
    }

    #[test]
    fn renders_primitives() {
        assert_eq!(Value::Null.to_output(), "nil");
        assert_eq!(Value::Boolean(true).to_output(), "true");
        assert_eq!(Value::Integer(BigInt::from(-7)).to_output(), "-7");
        assert_eq!(Value::Float(3.0).to_output(), "3.0");
        assert_eq!(Value::Float(2.5).to_output(), "2.5");
        assert_eq!(Value::string(b"hi".to_vec()).to_output(), "hi");
        assert_eq!(
            Value::Host(BuiltinFunction::Print).to_output(),
            "[JavaScript Function]"
        );
    }

    #[test]
    fn renders_objects_in_insertion_order() {
        let mut data = ObjectData::new();
        data.set("b", Value::Integer(BigInt::from(2)));
        data.set("a", Value::Integer(BigInt::from(1)));
        data.set("b", Value::Integer(BigInt::from(3)));
        assert_eq!(Value::object(data).to_output(), "{ b: 3, a: 1 }");
        assert_eq!(Value::object(ObjectData::new()).to_output(), "{}");
    }

    #[test]
    fn object_rendering_survives_cycles() {
        let object = Value::object(ObjectData::new());
        if let Value::Object(data) = &object {
            data.borrow_mut().set("me", object.clone());
        }
        assert_eq!(object.to_output(), "{ me: ... }");
    }
}
