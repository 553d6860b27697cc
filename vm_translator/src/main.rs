//! VM Translator - Main Entry Point
//!
//! Translates Hack VM code (`Nand2Tetris` Project 7/8) into Hack assembly.
//!
//! # Usage
//! ```bash
//! vm-translator <input.vm>   # -> input.asm, no bootstrap
//! vm-translator <dir>        # -> dir/dir.asm, every *.vm in dir, with bootstrap
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::{debug, info};
use vm_translator::error::{Result, VmTranslatorError};

/// Translates a VM program (a single `.vm` file or a directory of them) into
/// Hack assembly.
#[derive(Debug, ClapParser)]
#[command(name = "vm-translator", version, about)]
struct Args {
    /// Input `.vm` file, or a directory containing one or more `.vm` files.
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

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines = reader
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(VmTranslatorError::from)?;
    Ok(lines)
}

fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unit".to_string())
}

/// Discovers `*.vm` siblings of a directory, sorted by filename for a
/// deterministic (if otherwise unspecified) processing order.
fn discover_vm_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("vm"))
        .collect();
    files.sort();
    Ok(files)
}

fn run(args: Args) -> Result<()> {
    let (output_path, units, bootstrap) = if args.input.is_dir() {
        let dir_name = args
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string());
        let vm_files = discover_vm_files(&args.input)?;
        info!("found {} .vm files in {}", vm_files.len(), args.input.display());

        let mut units = Vec::with_capacity(vm_files.len());
        for path in &vm_files {
            let lines = read_lines(path)?;
            debug!("read {} lines from {}", lines.len(), path.display());
            units.push((unit_name(path), lines));
        }
        (args.input.join(format!("{dir_name}.asm")), units, true)
    } else {
        let lines = read_lines(&args.input)?;
        debug!("read {} lines from {}", lines.len(), args.input.display());
        let units = vec![(unit_name(&args.input), lines)];
        (args.input.with_extension("asm"), units, false)
    };

    let asm = vm_translator::translate_program(&units, bootstrap)?;
    info!("emitted {} assembly lines", asm.len());

    let file = File::create(&output_path)?;
    let mut writer = BufWriter::new(file);
    for line in &asm {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    info!("wrote {}", output_path.display());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_name_strips_directory_and_extension() {
        assert_eq!(unit_name(Path::new("dir/Foo.vm")), "Foo");
        assert_eq!(unit_name(Path::new("Foo.vm")), "Foo");
    }
}
