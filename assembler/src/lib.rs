//! Hack Assembler for the `Nand2Tetris` course
//!
//! This crate provides a high-performance Hack assembly language assembler that translates
//! assembly code into Hack machine code.
//!
//! # Architecture
//!
//! The assembler consists of four main modules:
//! - [`parser`]: Zero-copy parsing of assembly instructions
//! - [`code`]: Binary encoding using perfect hash functions (PHF)
//! - [`symbol_table`]: Symbol management with predefined symbols
//! - [`error`]: The assembler's error taxonomy (malformed instructions, I/O)
//!
//! # Performance Optimizations
//!
//! - **PHF (Perfect Hash Functions)**: O(1) compile-time hash maps for instruction encoding
//! - **Zero-copy parsing**: Uses string slices to avoid allocations
//! - **Aggressive inlining**: Hot path functions are force-inlined
//! - **Pre-allocated capacity**: Reduces rehashing overhead
//! - **Link-time optimization (LTO)**: Enabled in release profile
//!
//! # Example
//!
//! ```rust
//! use assembler::{ParserLines, CommandType, SymbolTable, code};
//!
//! // Parse assembly code
//! let lines = vec!["@100".to_string(), "D=M".to_string()];
//! let mut parser = ParserLines::from_lines(&lines);
//!
//! // Process first instruction
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::ACommand);
//! assert_eq!(parser.symbol().unwrap(), "100");
//!
//! // Process second instruction
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::CCommand);
//! let instruction = code::encode_c_instruction("D", "M", "");
//! assert_eq!(instruction, "1111110000010000");
//!
//! // Use symbol table
//! let mut symbols = SymbolTable::new();
//! symbols.add_entry("LOOP", 10);
//! assert_eq!(symbols.get_address("LOOP"), 10);
//! assert_eq!(symbols.get_address("SP"), 0); // Predefined symbol
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code;
pub mod error;
pub mod parser;
pub mod symbol_table;

// Re-export commonly used types for convenience
pub use error::{AssemblerError, Position};
pub use parser::{CommandType, ParserLines};
pub use symbol_table::SymbolTable;

/// Runs the full two-pass assembly over an in-memory source, returning one `.hack`
/// line per emitted instruction. This is the function both `main` and the integration
/// tests drive; it contains no I/O of its own.
pub fn assemble(lines: &[String]) -> error::Result<Vec<String>> {
    let mut symbol_table = SymbolTable::new();
    first_pass(lines, &mut symbol_table)?;
    second_pass(lines, &mut symbol_table)
}

fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) -> error::Result<()> {
    let mut rom_address: u16 = 0;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::LCommand => {
                let symbol = parser.symbol()?;
                symbol_table.add_entry(symbol, rom_address);
            }
            CommandType::ACommand | CommandType::CCommand => {
                rom_address += 1;
            }
        }
    }

    Ok(())
}

fn second_pass(lines: &[String], symbol_table: &mut SymbolTable) -> error::Result<Vec<String>> {
    let mut output = Vec::with_capacity(lines.len());
    let mut ram_address: u16 = 16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::ACommand => {
                let symbol = parser.symbol()?;
                let address = if let Ok(value) = symbol.parse::<i64>() {
                    u16::try_from(value)
                        .ok()
                        .filter(|v| *v <= 32767)
                        .ok_or(AssemblerError::AddressOutOfRange {
                            pos: parser.position(),
                            value,
                        })?
                } else {
                    symbol_table.get_or_insert(symbol, &mut ram_address)
                };
                output.push(code::encode_a_instruction(address));
            }
            CommandType::CCommand => {
                let dest = parser.dest()?.unwrap_or("");
                let comp = parser.comp()?.unwrap_or("");
                let jump = parser.jump()?.unwrap_or("");
                output.push(code::encode_c_instruction(dest, comp, jump));
            }
            CommandType::LCommand => {
                // Labels were bound to ROM addresses in the first pass; they emit nothing here.
            }
        }
    }

    Ok(output)
}
