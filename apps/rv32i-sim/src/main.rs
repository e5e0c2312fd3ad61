//! Command-line front-end for the RV32I emulator.
//!
//! Loads a hex program image, sets up the conventional register presets,
//! and drives the fetch-execute loop with optional tracing, interactive
//! stepping, and per-step register dumps.

mod loader;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use rv32i_emulator::{EmulatorError, Memory, MemoryAccessKind, Simulator, StepResult};
use rv32i_encoder::{disassemble_instruction, Gpr};

/// Entry address for loaded programs.
const ENTRY_ADDRESS: u32 = 0x1000;
/// Static data segment base, also the initial global pointer.
const DATA_ADDRESS: u32 = 0x3000;
/// Initial stack pointer, near the top of the arena.
const STACK_TOP: u32 = 0xeffff;

#[derive(Parser)]
#[command(name = "rv32i-sim", about = "Single-hart RV32I simulator", version)]
struct Args {
    /// Program image: one hex instruction word per line
    program: PathBuf,

    /// Disassemble the program and exit
    #[arg(short = 'd', long)]
    disasm: bool,

    /// Dump all registers after every instruction
    #[arg(short = 'r', long)]
    regdump: bool,

    /// Pause for Enter and print each instruction before executing
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Print each instruction before executing, without pausing
    #[arg(short = 't', long)]
    trace: bool,

    /// Run until a fatal error or exit syscall instead of one pass over the
    /// loaded program words
    #[arg(short = 'e', long)]
    unbounded: bool,

    /// Initialize all registers to 4 (debug preset)
    #[arg(short = 'v', long)]
    init_regs: bool,

    /// Data image loaded at the static data base
    #[arg(short = 's', long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Comma-separated hex words preloaded into a0, a1, ...
    #[arg(short = 'a', long, value_name = "LIST")]
    args: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut memory = Memory::with_default_capacity();
    let text = fs::read_to_string(&args.program)
        .with_context(|| format!("reading program image {}", args.program.display()))?;
    let program_words = loader::load_image(&mut memory, ENTRY_ADDRESS, &text)
        .context("loading program image")?;

    if args.disasm {
        for i in 0..program_words {
            let address = ENTRY_ADDRESS + i * 4;
            let word = memory
                .fetch_instruction(address)
                .map_err(|e| anyhow!("{}", e))?;
            println!("{:08x}: {}", address, disassemble_instruction(word));
        }
        return Ok(());
    }

    if let Some(path) = &args.data {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading data image {}", path.display()))?;
        loader::load_image(&mut memory, DATA_ADDRESS, &text).context("loading data image")?;
    }

    let mut sim = Simulator::new(memory);
    sim.set_pc(ENTRY_ADDRESS);
    if args.init_regs {
        for i in 1..32 {
            sim.set_register(Gpr::new(i), 4);
        }
    }
    sim.set_register(Gpr::GP, DATA_ADDRESS as i32);
    sim.set_register(Gpr::SP, STACK_TOP as i32);
    if let Some(list) = &args.args {
        set_initial_args(&mut sim, list)?;
    }

    let budget = if args.unbounded {
        None
    } else {
        Some(program_words as u64)
    };
    run(&mut sim, budget, &args)
}

/// Parse a comma-separated list of hex words into a0, a1, ...
fn set_initial_args(sim: &mut Simulator, list: &str) -> Result<()> {
    for (i, token) in list.split(',').enumerate() {
        if i >= 8 {
            bail!("too many initial arguments (a0-a7 only)");
        }
        let token = token.trim();
        let stripped = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let value = u32::from_str_radix(stripped, 16)
            .with_context(|| format!("bad initial argument {:?}", token))?;
        sim.set_register(Gpr::new(10 + i as u8), value as i32);
    }
    Ok(())
}

/// Drive the fetch-execute loop until the budget is exhausted, the program
/// halts or exits, or a fatal error occurs.
fn run(sim: &mut Simulator, budget: Option<u64>, args: &Args) -> Result<()> {
    let stdin = io::stdin();
    let mut remaining = budget;
    loop {
        if let Some(ref mut count) = remaining {
            if *count == 0 {
                return Ok(());
            }
            *count -= 1;
        }

        if args.interactive {
            print!("simulator paused, enter to continue...");
            io::stdout().flush()?;
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
        }
        if args.interactive || args.trace {
            match sim.memory().fetch_instruction(sim.pc()) {
                Ok(word) => {
                    println!("{:08x}: {}", sim.pc(), disassemble_instruction(word))
                }
                // The step below reports the fault
                Err(_) => {}
            }
        }

        match sim.step() {
            Ok(StepResult::Continue) => {}
            Ok(StepResult::Syscall(info)) => match info.number {
                // print integer
                1 => println!("{}", info.args[0]),
                // exit
                10 => return Ok(()),
                _ => {}
            },
            Ok(StepResult::Halted) => return Ok(()),
            Err(e) => {
                report_fatal(&e);
                bail!("{}", e);
            }
        }

        if args.regdump {
            print!("{}", sim.dump_registers());
            println!();
        }
    }
}

/// Print the classic fatal diagnostics before propagating the error.
fn report_fatal(error: &EmulatorError) {
    match error {
        EmulatorError::InvalidInstruction { instruction, .. } => {
            eprintln!("Invalid Instruction: 0x{:08x}", instruction);
        }
        EmulatorError::InvalidMemoryAccess { address, kind, .. } => match kind {
            MemoryAccessKind::Write => eprintln!("Bad Write. Address: 0x{:08x}", address),
            MemoryAccessKind::Read | MemoryAccessKind::InstructionFetch => {
                eprintln!("Bad Read. Address: 0x{:08x}", address)
            }
        },
    }
}
