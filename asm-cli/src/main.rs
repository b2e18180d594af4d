//! `asm`: the two-pass 6502 assembler CLI described in spec.md §6.1.
//! Grounded in the original project's `assembler/assembler.cpp::main` (the
//! flag set and exit-code contract) and in the teacher's `task` crate for
//! the `clap`-derive CLI shape.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use cpu_6502::asm::{assemble, format_ir, format_memory_map, format_symbol_table};
use cpu_6502::io;

/// Assembles 6502 source text into a raw binary image.
#[derive(Parser)]
#[command(name = "asm", author, version, about, long_about = None)]
struct Cli {
    /// Source file to assemble.
    source: PathBuf,

    /// Output path (default: <source> with its extension replaced by .bin).
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose progress.
    #[arg(short = 'v')]
    verbose: bool,

    /// Debug: print per-stage counts.
    #[arg(short = 'd')]
    debug: bool,

    /// Print the resolved symbol table after assembly.
    #[arg(long)]
    symbols: bool,

    /// Print non-empty memory cells after assembly.
    #[arg(long)]
    memory: bool,

    /// Print the parsed IR after assembly.
    #[arg(long)]
    ir: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source_text = match io::read_source(&cli.source) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("Error: cannot read source file {}: {}", cli.source.display(), error);
            return ExitCode::FAILURE;
        }
    };

    if cli.verbose {
        println!("{}", "assembling...".cyan());
        println!("source: {}", cli.source.display());
    }

    let output_path = cli.output.clone().unwrap_or_else(|| io::default_output_path(&cli.source));

    match assemble(&source_text) {
        Ok(program) => {
            if cli.debug {
                println!(
                    "nodes: {}  symbols: {}  memory cells: {}",
                    program.nodes.len(),
                    program.symbols.len(),
                    program.memory_map.len()
                );
            }

            if cli.ir {
                println!("\n{}", format_ir(&program.nodes));
            }
            if cli.symbols {
                println!("\n{}", format_symbol_table(&program.symbols));
            }
            if cli.memory {
                println!("\n{}", format_memory_map(&program.memory_map));
            }

            if let Err(error) = io::write_binary(&output_path, &program.image) {
                eprintln!("Error: cannot write output file {}: {}", output_path.display(), error);
                return ExitCode::FAILURE;
            }

            if cli.verbose {
                println!("{}", "Assembly completed successfully!".green());
                println!("Output file: {}", output_path.display());
                println!("Binary size: {} bytes", program.image.len());
                println!(
                    "Address range: ${:04X} - ${:04X}",
                    program.start_address,
                    program.end_address()
                );
            }

            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("{}", "Assembly failed!".bright_red());
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
    }
}
