//! Translates VM commands into Hack assembly.
//!
//! Every `write_*` method appends a self-contained block of assembly lines to an
//! in-memory buffer; nothing is flushed to disk here. The caller (`lib::translate`)
//! owns I/O so that the translation itself stays pure and testable.

use crate::error::{Position, Result, VmTranslatorError};

/// One of the eight VM memory segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "constant" => Self::Constant,
            "argument" => Self::Argument,
            "local" => Self::Local,
            "static" => Self::Static,
            "this" => Self::This,
            "that" => Self::That,
            "pointer" => Self::Pointer,
            "temp" => Self::Temp,
            _ => return None,
        })
    }

    /// The base register for the segments that are indirected through one.
    fn base_register(self) -> Option<&'static str> {
        match self {
            Self::Local => Some("LCL"),
            Self::Argument => Some("ARG"),
            Self::This => Some("THIS"),
            Self::That => Some("THAT"),
            _ => None,
        }
    }
}

/// Emits Hack assembly for a stream of VM commands.
///
/// Label scoping, return-address uniqueness, and the static segment's symbolic
/// prefix all depend on state that must persist across every unit of a
/// multi-file program, so a single `CodeWriter` is shared for the whole
/// translation; only [`CodeWriter::set_unit_name`] changes between files.
pub struct CodeWriter {
    out: Vec<String>,
    unit_name: String,
    current_function: String,
    compare_label_id: u32,
    call_site_counts: std::collections::HashMap<String, u32>,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            unit_name: String::new(),
            current_function: String::new(),
            compare_label_id: 0,
            call_site_counts: std::collections::HashMap::new(),
        }
    }

    /// Switches the static-segment prefix for a new translation unit. Does not
    /// reset the comparison-label counter or per-function call-site counters,
    /// which must stay unique across the whole program.
    pub fn set_unit_name(&mut self, name: &str) {
        self.unit_name = name.to_string();
        self.current_function.clear();
    }

    /// Consumes the writer, returning the accumulated assembly lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.out
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.out.push(line.into());
    }

    fn emit_many<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        self.out.extend(lines.into_iter().map(str::to_string));
    }

    /// `SP = 256; call Sys.init 0`, emitted exactly once per program.
    pub fn write_bootstrap(&mut self) {
        self.emit("// bootstrap");
        self.emit_many(["@256", "D=A", "@SP", "M=D"]);
        self.write_call("Sys.init", 0);
    }

    pub fn write_arithmetic(&mut self, op: &str, pos: Position) -> Result<()> {
        self.emit(format!("// {op}"));
        match op {
            "neg" => self.emit_many(["@SP", "A=M-1", "M=-M"]),
            "not" => self.emit_many(["@SP", "A=M-1", "M=!M"]),
            "add" => self.write_binary("M=D+M"),
            "sub" => self.write_binary("M=M-D"),
            "and" => self.write_binary("M=D&M"),
            "or" => self.write_binary("M=D|M"),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            other => {
                return Err(VmTranslatorError::MalformedCommand {
                    pos,
                    detail: format!("unknown arithmetic command `{other}`"),
                })
            }
        }
        Ok(())
    }

    /// Pops the top of stack into D, then applies `op` (a `dest=comp` using D
    /// and M) against the new top of stack, leaving the result in place.
    fn write_binary(&mut self, op: &str) {
        self.emit_many(["@SP", "AM=M-1", "D=M", "A=A-1"]);
        self.emit(op);
    }

    fn write_comparison(&mut self, jump: &str) {
        let id = self.compare_label_id;
        self.compare_label_id += 1;
        let truthy = format!("COMPARE_TRUE{id}");
        let end = format!("COMPARE_END{id}");

        self.emit_many(["@SP", "AM=M-1", "D=M", "A=A-1", "D=M-D"]);
        self.emit(format!("@{truthy}"));
        self.emit(format!("D;{jump}"));
        self.emit_many(["@SP", "A=M-1", "M=0"]);
        self.emit(format!("@{end}"));
        self.emit("0;JMP");
        self.emit(format!("({truthy})"));
        self.emit_many(["@SP", "A=M-1", "M=-1"]);
        self.emit(format!("({end})"));
    }

    pub fn write_push(&mut self, segment: &str, index: i32, pos: Position) -> Result<()> {
        self.emit(format!("// push {segment} {index}"));
        let segment = Segment::parse(segment).ok_or_else(|| VmTranslatorError::UnknownSegment {
            pos,
            segment: segment.to_string(),
        })?;

        match segment {
            Segment::Constant => {
                self.emit(format!("@{index}"));
                self.emit("D=A");
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment.base_register().expect("indirect segment");
                self.emit(format!("@{base}"));
                self.emit("D=M");
                self.emit(format!("@{index}"));
                self.emit("A=D+A");
                self.emit("D=M");
            }
            Segment::Temp => {
                self.emit("@R5");
                self.emit("D=A");
                self.emit(format!("@{index}"));
                self.emit("A=D+A");
                self.emit("D=M");
            }
            Segment::Pointer => {
                self.emit(Self::pointer_register(index, pos)?);
                self.emit("D=M");
            }
            Segment::Static => {
                self.emit(format!("@{}.{index}", self.unit_name));
                self.emit("D=M");
            }
        }
        self.write_push_d();
        Ok(())
    }

    pub fn write_pop(&mut self, segment: &str, index: i32, pos: Position) -> Result<()> {
        self.emit(format!("// pop {segment} {index}"));
        let segment = Segment::parse(segment).ok_or_else(|| VmTranslatorError::UnknownSegment {
            pos,
            segment: segment.to_string(),
        })?;

        match segment {
            Segment::Constant => {
                return Err(VmTranslatorError::MalformedCommand {
                    pos,
                    detail: "cannot pop into the constant segment".to_string(),
                })
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = segment.base_register().expect("indirect segment");
                self.emit(format!("@{base}"));
                self.emit("D=M");
                self.emit(format!("@{index}"));
                self.emit("D=D+A");
                self.stash_address_then_pop();
            }
            Segment::Temp => {
                self.emit("@R5");
                self.emit("D=A");
                self.emit(format!("@{index}"));
                self.emit("D=D+A");
                self.stash_address_then_pop();
            }
            Segment::Pointer => {
                self.write_pop_to_d();
                self.emit(Self::pointer_register(index, pos)?);
                self.emit("M=D");
                return Ok(());
            }
            Segment::Static => {
                self.write_pop_to_d();
                self.emit(format!("@{}.{index}", self.unit_name));
                self.emit("M=D");
                return Ok(());
            }
        }
        Ok(())
    }

    fn pointer_register(index: i32, pos: Position) -> Result<&'static str> {
        match index {
            0 => Ok("@THIS"),
            1 => Ok("@THAT"),
            other => Err(VmTranslatorError::MalformedCommand {
                pos,
                detail: format!("pointer index must be 0 or 1, got {other}"),
            }),
        }
    }

    /// Stashes the address computed into D at R13, then pops the stack's top
    /// value into that address. Used by every indirect-segment pop.
    fn stash_address_then_pop(&mut self) {
        self.emit_many(["@R13", "M=D"]);
        self.write_pop_to_d();
        self.emit_many(["@R13", "A=M", "M=D"]);
    }

    fn write_push_d(&mut self) {
        self.emit_many(["@SP", "A=M", "M=D", "@SP", "M=M+1"]);
    }

    fn write_pop_to_d(&mut self) {
        self.emit_many(["@SP", "AM=M-1", "D=M"]);
    }

    fn label_in_scope(&self, name: &str) -> String {
        if self.current_function.is_empty() {
            name.to_string()
        } else {
            format!("{}${name}", self.current_function)
        }
    }

    pub fn write_label(&mut self, name: &str) {
        let scoped = self.label_in_scope(name);
        self.emit(format!("// label {name}"));
        self.emit(format!("({scoped})"));
    }

    pub fn write_goto(&mut self, name: &str) {
        let scoped = self.label_in_scope(name);
        self.emit(format!("// goto {name}"));
        self.emit(format!("@{scoped}"));
        self.emit("0;JMP");
    }

    pub fn write_if_goto(&mut self, name: &str) {
        let scoped = self.label_in_scope(name);
        self.emit(format!("// if-goto {name}"));
        self.write_pop_to_d();
        self.emit(format!("@{scoped}"));
        self.emit("D;JNE");
    }

    pub fn write_function(&mut self, name: &str, n_locals: i32) {
        self.current_function = name.to_string();
        self.emit(format!("// function {name} {n_locals}"));
        self.emit(format!("({name})"));
        for _ in 0..n_locals {
            self.emit("@SP");
            self.emit("A=M");
            self.emit("M=0");
            self.emit("@SP");
            self.emit("M=M+1");
        }
    }

    pub fn write_call(&mut self, name: &str, n_args: i32) {
        let site = self.call_site_counts.entry(name.to_string()).or_insert(0);
        let ret_label = format!("{name}$ret.{site}");
        *self.call_site_counts.get_mut(name).expect("just inserted") += 1;

        self.emit(format!("// call {name} {n_args}"));
        self.push_symbol(&ret_label);
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            self.push_register(reg);
        }

        // ARG = SP - 5 - nArgs
        self.emit("@SP");
        self.emit("D=M");
        self.emit("@5");
        self.emit("D=D-A");
        self.emit(format!("@{n_args}"));
        self.emit("D=D-A");
        self.emit("@ARG");
        self.emit("M=D");

        // LCL = SP
        self.emit("@SP");
        self.emit("D=M");
        self.emit("@LCL");
        self.emit("M=D");

        self.emit(format!("@{name}"));
        self.emit("0;JMP");
        self.emit(format!("({ret_label})"));
    }

    fn push_symbol(&mut self, symbol: &str) {
        self.emit(format!("@{symbol}"));
        self.emit("D=A");
        self.write_push_d();
    }

    fn push_register(&mut self, register: &str) {
        self.emit(format!("@{register}"));
        self.emit("D=M");
        self.write_push_d();
    }

    /// `endFrame` (saved in R13) is stashed before any restore touches LCL, since
    /// the restore sequence below overwrites LCL itself.
    pub fn write_return(&mut self) {
        self.emit("// return");
        self.emit("@LCL");
        self.emit("D=M");
        self.emit("@R13");
        self.emit("M=D"); // R13 = endFrame

        self.read_frame_offset(5);
        self.emit("@R14");
        self.emit("M=D"); // R14 = retAddr

        self.write_pop_to_d();
        self.emit("@ARG");
        self.emit("A=M");
        self.emit("M=D"); // *ARG = pop()

        self.emit("@ARG");
        self.emit("D=M+1");
        self.emit("@SP");
        self.emit("M=D"); // SP = ARG + 1

        for (offset, register) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            self.read_frame_offset(offset);
            self.emit(format!("@{register}"));
            self.emit("M=D");
        }

        self.emit("@R14");
        self.emit("A=M");
        self.emit("0;JMP");
    }

    /// `D = *(endFrame - offset)`, reading `endFrame` from R13.
    fn read_frame_offset(&mut self, offset: i32) {
        self.emit("@R13");
        self.emit("D=M");
        self.emit(format!("@{offset}"));
        self.emit("A=D-A");
        self.emit("D=M");
    }
}
