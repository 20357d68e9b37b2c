use thiserror::Error;

/// Diagnostics recorded while scanning. The lexer never aborts; it records
/// one of these, resynchronises, and keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    #[error("unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("malformed number at line {line}, column {column}: expected digits after '.'")]
    MalformedNumber { line: usize, column: usize },
    #[error("invalid escape sequence '\\{escape}' at line {line}, column {column}")]
    InvalidEscape {
        escape: char,
        line: usize,
        column: usize,
    },
}
