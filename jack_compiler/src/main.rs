//! Jack Compiler - Main Entry Point
//!
//! Compiles Jack source (`Nand2Tetris` Project 10/11) into Hack VM code.
//!
//! # Usage
//! ```bash
//! jack-compiler <input.jack>   # -> input.vm
//! jack-compiler <dir>          # -> one <Name>.vm per <Name>.jack in dir
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use jack_compiler::error::Result;
use log::{debug, info};

/// Compiles a Jack program (a single `.jack` file or a directory of them)
/// into Hack VM code.
#[derive(Debug, ClapParser)]
#[command(name = "jack-compiler", version, about)]
struct Args {
    /// Input `.jack` file, or a directory containing one or more `.jack` files.
    input: PathBuf,

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

/// Discovers `*.jack` siblings of a directory, sorted by filename for a
/// deterministic (if otherwise unspecified) processing order.
fn discover_jack_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jack"))
        .collect();
    files.sort();
    Ok(files)
}

fn compile_file(path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)?;
    debug!("read {} bytes from {}", source.len(), path.display());

    let vm = jack_compiler::compile_class(&source)?;
    info!("emitted {} VM lines for {}", vm.len(), path.display());

    let output_path = path.with_extension("vm");
    let file = fs::File::create(&output_path)?;
    let mut writer = BufWriter::new(file);
    for line in &vm {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    info!("wrote {}", output_path.display());
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if args.input.is_dir() {
        let jack_files = discover_jack_files(&args.input)?;
        info!("found {} .jack files in {}", jack_files.len(), args.input.display());
        for path in &jack_files {
            compile_file(path)?;
        }
    } else {
        compile_file(&args.input)?;
    }
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
