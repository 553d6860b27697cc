//! Error taxonomy for the VM translator.
//!
//! The translator only ever fails on a malformed command or on I/O: there is no
//! lexical or semantic tier here, those belong to the Jack compiler further up
//! the pipeline.

use std::fmt;
use thiserror::Error;

/// A source position within a `.vm` file, used for diagnostics.
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
pub enum VmTranslatorError {
    #[error("{pos}: malformed command: {detail}")]
    MalformedCommand { pos: Position, detail: String },

    #[error("{pos}: unknown memory segment {segment:?}")]
    UnknownSegment { pos: Position, segment: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VmTranslatorError>;
