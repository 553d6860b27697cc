//! Error taxonomy for the Jack compiler.
//!
//! Unlike the assembler and VM translator, the compiler has a full four-way
//! taxonomy: lexical errors from the tokenizer, syntax errors from the parser,
//! semantic errors from symbol resolution, and I/O.

use std::fmt;
use thiserror::Error;

/// A source position within a `.jack` file, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number in the original source.
    pub line: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)
    }
}

#[derive(Debug, Error)]
pub enum JackCompilerError {
    #[error("{pos}: invalid character {ch:?}")]
    InvalidChar { pos: Position, ch: char },

    #[error("{pos}: unterminated {what}")]
    Unterminated { pos: Position, what: &'static str },

    #[error("{pos}: integer constant {value} is out of range 0..=32767")]
    IntOutOfRange { pos: Position, value: i64 },

    #[error("{pos}: unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: Position,
        expected: String,
        found: String,
    },

    #[error("{pos}: unknown identifier `{name}`")]
    UnknownIdentifier { pos: Position, name: String },

    #[error("{pos}: `{name}` is already defined in this scope")]
    DuplicateDefinition { pos: Position, name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JackCompilerError>;
