//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols
//!
//! # Usage
//! ```bash
//! hack-assembler <input.asm> [output.hack]
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use assembler::error::{AssemblerError, Result};
use clap::Parser as ClapParser;
use log::{debug, info};

/// Translates a Hack assembly program (`.asm`) into Hack machine code (`.hack`).
#[derive(Debug, ClapParser)]
#[command(name = "hack-assembler", version, about)]
struct Args {
    /// Input `.asm` file.
    input: PathBuf,

    /// Output `.hack` file. Defaults to the input path with its extension replaced.
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .try_init()
        .ok();
}

fn read_lines(path: &std::path::Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines = reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(AssemblerError::from)?;
    Ok(lines)
}

fn output_path(input: &std::path::Path, explicit_output: Option<PathBuf>) -> PathBuf {
    explicit_output.unwrap_or_else(|| input.with_extension("hack"))
}

fn run(args: Args) -> Result<()> {
    info!("assembling {}", args.input.display());
    let lines = read_lines(&args.input)?;
    debug!("read {} source lines", lines.len());

    let instructions = assembler::assemble(&lines)?;
    info!("emitted {} instructions", instructions.len());

    let output = output_path(&args.input, args.output);
    let file = File::create(&output)?;
    let mut writer = BufWriter::new(file);
    for instruction in &instructions {
        writeln!(writer, "{instruction}")?;
    }
    writer.flush()?;

    info!("wrote {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
