//! Emits lines of VM intermediate code, one command per line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Constant => "constant",
            Self::Argument => "argument",
            Self::Local => "local",
            Self::Static => "static",
            Self::This => "this",
            Self::That => "that",
            Self::Pointer => "pointer",
            Self::Temp => "temp",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl fmt::Display for Arithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Neg => "neg",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Default)]
pub struct VmWriter {
    out: Vec<String>,
}

impl VmWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.out
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) {
        self.out.push(format!("push {segment} {index}"));
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) {
        self.out.push(format!("pop {segment} {index}"));
    }

    pub fn write_arithmetic(&mut self, op: Arithmetic) {
        self.out.push(op.to_string());
    }

    pub fn write_label(&mut self, name: &str) {
        self.out.push(format!("label {name}"));
    }

    pub fn write_goto(&mut self, name: &str) {
        self.out.push(format!("goto {name}"));
    }

    pub fn write_if_goto(&mut self, name: &str) {
        self.out.push(format!("if-goto {name}"));
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) {
        self.out.push(format!("call {name} {n_args}"));
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) {
        self.out.push(format!("function {name} {n_locals}"));
    }

    pub fn write_return(&mut self) {
        self.out.push("return".to_string());
    }
}
