//! VM Translator for the `Nand2Tetris` course
//!
//! Translates the stack-based VM intermediate language into Hack assembly,
//! implementing the full calling convention: push/pop across all eight memory
//! segments, program flow (label/goto/if-goto) scoped per function, and the
//! function/call/return protocol with an optional bootstrap sequence.
//!
//! # Architecture
//!
//! - [`parser`]: zero-copy parsing of VM command lines
//! - [`code_writer`]: assembly emission and the calling convention
//! - [`error`]: the translator's error taxonomy (malformed commands, I/O)
//!
//! # Example
//!
//! ```
//! use vm_translator::translate_program;
//!
//! let unit = vec![
//!     "push constant 7".to_string(),
//!     "push constant 8".to_string(),
//!     "add".to_string(),
//! ];
//! let asm = translate_program(&[("Add".to_string(), unit)], false).unwrap();
//! assert!(asm.iter().any(|l| l == "M=D+M"));
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code_writer;
pub mod error;
pub mod parser;

pub use code_writer::CodeWriter;
pub use error::{Position, Result, VmTranslatorError};
pub use parser::{CommandType, Parser};

/// Translates one or more translation units into a single Hack assembly
/// program. Units are processed in the order given; `bootstrap` controls
/// whether `SP = 256; call Sys.init 0` is emitted first, matching the CLI's
/// single-file-vs-directory distinction.
pub fn translate_program(units: &[(String, Vec<String>)], bootstrap: bool) -> Result<Vec<String>> {
    let mut writer = CodeWriter::new();
    if bootstrap {
        writer.write_bootstrap();
    }
    for (unit_name, lines) in units {
        translate_unit(unit_name, lines, &mut writer)?;
    }
    Ok(writer.into_lines())
}

fn translate_unit(unit_name: &str, lines: &[String], writer: &mut CodeWriter) -> Result<()> {
    writer.set_unit_name(unit_name);
    let mut parser = Parser::from_lines(lines);

    while parser.advance() {
        let pos = parser.position();
        match parser.command_type()? {
            CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?, pos)?,
            CommandType::Push => writer.write_push(parser.arg1()?, parser.arg2()?, pos)?,
            CommandType::Pop => writer.write_pop(parser.arg1()?, parser.arg2()?, pos)?,
            CommandType::Label => writer.write_label(parser.arg1()?),
            CommandType::Goto => writer.write_goto(parser.arg1()?),
            CommandType::IfGoto => writer.write_if_goto(parser.arg1()?),
            CommandType::Function => writer.write_function(parser.arg1()?, parser.arg2()?),
            CommandType::Call => writer.write_call(parser.arg1()?, parser.arg2()?),
            CommandType::Return => writer.write_return(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_unit_without_bootstrap() {
        let unit = vec!["push constant 1".to_string(), "push constant 1".to_string(), "add".to_string()];
        let asm = translate_program(&[("Foo".to_string(), unit)], false).unwrap();
        assert!(!asm.iter().any(|l| l.contains("Sys.init")));
    }

    #[test]
    fn directory_mode_emits_bootstrap_once() {
        let sys = vec!["function Sys.init 0".to_string(), "push constant 42".to_string(), "return".to_string()];
        let asm = translate_program(&[("Sys".to_string(), sys)], true).unwrap();
        assert_eq!(asm.iter().filter(|l| l.contains("call Sys.init")).count(), 1);
    }

    #[test]
    fn static_segments_do_not_collide_across_units() {
        let a = vec!["push constant 1".to_string(), "pop static 0".to_string()];
        let b = vec!["push constant 2".to_string(), "pop static 0".to_string()];
        let asm = translate_program(&[("A".to_string(), a), ("B".to_string(), b)], false).unwrap();
        assert!(asm.iter().any(|l| l == "@A.0"));
        assert!(asm.iter().any(|l| l == "@B.0"));
    }

    #[test]
    fn malformed_command_is_reported_with_position() {
        let unit = vec!["push constant 1".to_string(), "bogus".to_string()];
        let err = translate_program(&[("Foo".to_string(), unit)], false).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
