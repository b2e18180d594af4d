//! `emulator`: loads a binary image (as produced by `asm-cli`) or one of the
//! built-in demo programs, runs the 6502 interpreter, and prints the final
//! register/flag state. Grounded in the original project's `EmulatorApi`
//! (`src/emulator_api.cpp`'s `execute_program`) and in the teacher's
//! `emulator/src/main.rs` binary shape, with the SDL2/NES wrapper stripped
//! out since the console shell is out of scope (spec.md §1).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::*;

use cpu_6502::demo;
use cpu_6502::emulator::Emulator;

#[derive(Clone, Copy, ValueEnum)]
enum DemoProgram {
    Lda,
    Ldx,
    Ldy,
    Instructions,
    Counter,
}

/// Runs a 6502 binary image, or a built-in demo program, to completion.
#[derive(Parser)]
#[command(name = "emulator", author, version, about, long_about = None)]
struct Cli {
    /// Binary image to load. Omit to run a built-in demo with `--demo`.
    binary: Option<PathBuf>,

    /// Address to load the binary at.
    #[arg(short = 'a', long, value_name = "ADDRESS", default_value = "0", value_parser = parse_hex_or_decimal)]
    load_address: u16,

    /// Run one of the built-in demo programs instead of a file.
    #[arg(long, value_enum, conflicts_with = "binary")]
    demo: Option<DemoProgram>,

    /// Maximum cycles to run before giving up (0 = unlimited).
    #[arg(short = 'c', long, default_value_t = 0)]
    cycles: i32,

    /// Print the full register/flag dump after running.
    #[arg(short = 'v')]
    verbose: bool,
}

fn parse_hex_or_decimal(text: &str) -> Result<u16, String> {
    if let Some(hex) = text.strip_prefix('$').or_else(|| text.strip_prefix("0x")) {
        u16::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        text.parse::<u16>().map_err(|e| e.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut emulator = Emulator::new();

    match cli.demo {
        Some(program) => {
            let table = match program {
                DemoProgram::Lda => demo::get_lda_demo(),
                DemoProgram::Ldx => demo::get_ldx_demo(),
                DemoProgram::Ldy => demo::get_ldy_demo(),
                DemoProgram::Instructions => demo::get_instruction_demo(),
                DemoProgram::Counter => demo::get_counter_program(),
            };
            emulator.load_table(&table);
        }
        None => {
            let Some(path) = &cli.binary else {
                eprintln!("Error: provide a binary image or --demo <name>");
                return ExitCode::FAILURE;
            };
            if let Err(error) = emulator.load_binary(path, cli.load_address) {
                eprintln!("Error: cannot read binary file {}: {}", path.display(), error);
                return ExitCode::FAILURE;
            }
            if cli.load_address != 0 {
                emulator.set_reset_vector(cli.load_address);
            }
        }
    }

    let testing_mode = cli.cycles <= 0;
    let report = emulator.execute_program(true, 0, cli.cycles, testing_mode);

    if cli.verbose {
        println!("{}", emulator.debug_state());
    }

    if report.completed {
        println!("{}", "execution completed".green());
    } else {
        println!("{}", "execution halted: insufficient cycles or unknown opcode".bright_red());
    }
    println!(
        "A=${:02X} X=${:02X} Y=${:02X} SP=${:02X} PC=${:04X} P=${:02X} cycles={}",
        report.a, report.x, report.y, report.sp, report.pc, report.p, report.cycles_used
    );

    if report.completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
