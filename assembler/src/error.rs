//! Error taxonomy for the Hack assembler.
//!
//! The assembler only ever fails on a malformed instruction or on I/O: there is no lexical
//! or semantic tier here, those belong to the Jack compiler further up the pipeline.

use std::fmt;
use thiserror::Error;

/// A source position within an `.asm` file, used for diagnostics.
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
pub enum AssemblerError {
    #[error("{pos}: malformed instruction: {detail}")]
    MalformedInstruction { pos: Position, detail: String },

    #[error("{pos}: address {value} does not fit in 15 bits")]
    AddressOutOfRange { pos: Position, value: i64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
