//! Parser module for the VM intermediate language.
//!
//! One command per line, tokens separated by whitespace, `//` line comments.
//! Parsing is zero-copy: every accessor borrows from the original line.

use crate::error::{Position, Result, VmTranslatorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    IfGoto,
    Function,
    Call,
    Return,
}

/// Parser for VM command lines with zero-copy string slicing.
pub struct Parser<'a> {
    lines: std::iter::Enumerate<std::slice::Iter<'a, String>>,
    current_line: &'a str,
    current_line_no: usize,
    parts: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter().enumerate(),
            current_line: "",
            current_line_no: 0,
            parts: Vec::new(),
        }
    }

    /// Advances to the next non-blank, non-comment command.
    pub fn advance(&mut self) -> bool {
        for (idx, line) in self.lines.by_ref() {
            let clean = Self::strip_comment(line);
            let trimmed = clean.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.current_line = trimmed;
            self.current_line_no = idx + 1;
            self.parts = trimmed.split_whitespace().collect();
            return true;
        }
        self.parts.clear();
        false
    }

    fn strip_comment(line: &str) -> &str {
        line.find("//").map_or(line, |pos| &line[..pos])
    }

    #[inline]
    fn pos(&self) -> Position {
        Position {
            line: self.current_line_no,
        }
    }

    fn malformed(&self, detail: impl Into<String>) -> VmTranslatorError {
        VmTranslatorError::MalformedCommand {
            pos: self.pos(),
            detail: detail.into(),
        }
    }

    pub fn command_type(&self) -> Result<CommandType> {
        let keyword = *self
            .parts
            .first()
            .ok_or_else(|| self.malformed("empty command"))?;
        Ok(match keyword {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::IfGoto,
            "function" => CommandType::Function,
            "call" => CommandType::Call,
            "return" => CommandType::Return,
            "add" | "sub" | "neg" | "eq" | "gt" | "lt" | "and" | "or" | "not" => {
                CommandType::Arithmetic
            }
            other => return Err(self.malformed(format!("unrecognized command `{other}`"))),
        })
    }

    /// The command's first argument: the opcode itself for `Arithmetic`, the
    /// segment/label/function name otherwise. Never called for `Return`.
    pub fn arg1(&self) -> Result<&'a str> {
        match self.command_type()? {
            CommandType::Arithmetic => Ok(self.parts[0]),
            CommandType::Return => {
                Err(self.malformed("arg1 is not defined for the return command"))
            }
            _ => self
                .parts
                .get(1)
                .copied()
                .ok_or_else(|| self.malformed("missing first argument")),
        }
    }

    /// The command's second argument, parsed as `i32`. Only defined for
    /// `Push`/`Pop`/`Function`/`Call`.
    pub fn arg2(&self) -> Result<i32> {
        match self.command_type()? {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                let raw = self
                    .parts
                    .get(2)
                    .ok_or_else(|| self.malformed("missing second argument"))?;
                raw.parse()
                    .map_err(|_| self.malformed(format!("`{raw}` is not a valid integer")))
            }
            other => Err(self.malformed(format!("arg2 is not defined for {other:?}"))),
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_push_and_arithmetic() {
        let lines = vec![
            "push constant 7".to_string(),
            "push constant 8".to_string(),
            "add".to_string(),
        ];
        let mut p = Parser::from_lines(&lines);

        assert!(p.advance());
        assert_eq!(p.command_type().unwrap(), CommandType::Push);
        assert_eq!(p.arg1().unwrap(), "constant");
        assert_eq!(p.arg2().unwrap(), 7);

        assert!(p.advance());
        assert_eq!(p.arg2().unwrap(), 8);

        assert!(p.advance());
        assert_eq!(p.command_type().unwrap(), CommandType::Arithmetic);
        assert_eq!(p.arg1().unwrap(), "add");

        assert!(!p.advance());
    }

    #[test]
    fn strips_comments_and_blank_lines() {
        let lines = vec![
            "// header".to_string(),
            String::new(),
            "push constant 1 // one".to_string(),
        ];
        let mut p = Parser::from_lines(&lines);
        assert!(p.advance());
        assert_eq!(p.arg2().unwrap(), 1);
        assert_eq!(p.position().line, 3);
    }

    #[test]
    fn recognizes_all_branching_and_call_commands() {
        let lines = vec![
            "label LOOP".to_string(),
            "goto LOOP".to_string(),
            "if-goto LOOP".to_string(),
            "function Main.run 2".to_string(),
            "call Main.run 0".to_string(),
            "return".to_string(),
        ];
        let mut p = Parser::from_lines(&lines);

        p.advance();
        assert_eq!(p.command_type().unwrap(), CommandType::Label);
        assert_eq!(p.arg1().unwrap(), "LOOP");

        p.advance();
        assert_eq!(p.command_type().unwrap(), CommandType::Goto);

        p.advance();
        assert_eq!(p.command_type().unwrap(), CommandType::IfGoto);

        p.advance();
        assert_eq!(p.command_type().unwrap(), CommandType::Function);
        assert_eq!(p.arg1().unwrap(), "Main.run");
        assert_eq!(p.arg2().unwrap(), 2);

        p.advance();
        assert_eq!(p.command_type().unwrap(), CommandType::Call);

        p.advance();
        assert_eq!(p.command_type().unwrap(), CommandType::Return);
        assert!(p.arg1().is_err());
    }

    #[test]
    fn rejects_unrecognized_command() {
        let lines = vec!["frobnicate".to_string()];
        let mut p = Parser::from_lines(&lines);
        p.advance();
        assert!(p.command_type().is_err());
    }
}
