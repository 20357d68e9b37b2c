use thiserror::Error;

/// Typed diagnostics produced during evaluation. One of these terminates the
/// current program run; the driver prefixes the message with `error: `.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("variable '{name}' already declared in this scope")]
    AlreadyDeclared { name: String },
    #[error("operator '{operator}' expects {expected}, got {left} and {right}")]
    BinaryOperandTypes {
        operator: &'static str,
        expected: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("operator '{operator}' expects {expected}, got {operand}")]
    UnaryOperandType {
        operator: &'static str,
        expected: &'static str,
        operand: &'static str,
    },
    #[error("if condition must be a boolean, got {type_name}")]
    ConditionType { type_name: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot access field '{field}' on {type_name}")]
    FieldAccessOnNonObject {
        field: String,
        type_name: &'static str,
    },
    #[error("field '{field}' not present")]
    FieldNotPresent { field: String },
    #[error("subscript requires a string, got {type_name}")]
    SubscriptOnNonString { type_name: &'static str },
    #[error("subscript index must be an integer, got {type_name}")]
    SubscriptIndexType { type_name: &'static str },
    #[error("index {index} out of range for string of length {len}")]
    IndexOutOfRange { index: String, len: usize },
    #[error("subscript assignment requires an integer value, got {type_name}")]
    SubscriptValueType { type_name: &'static str },
    #[error("byte value {value} out of range for string store")]
    ByteOutOfRange { value: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("non-function types are not callable")]
    NotCallable,
    #[error("function expected {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("{name} expected {expected} arguments, got {found}")]
    BuiltinArityMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{name} expects {expected}, got {got}")]
    BuiltinArgumentType {
        name: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("return outside of function")]
    ReturnOutsideFunction,
    #[error("stack overflow")]
    StackOverflow,
    #[error("{message}")]
    Panic { message: String },
}
