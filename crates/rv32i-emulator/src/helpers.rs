//! Helper functions for testing machine-code programs.

use alloc::format;
use alloc::string::String;

use rv32i_encoder::{disassemble_instruction, Gpr};

use crate::{
    error::EmulatorError,
    logging::LogLevel,
    memory::Memory,
    simulator::{Simulator, StopReason},
};

/// Instruction cap for helper-driven runs; test programs are expected to
/// hit EBREAK long before this.
const RUN_CAP: u64 = 100_000;

/// Build a default-capacity arena with the given words stored from address 0.
pub fn program_from_words(words: &[u32]) -> Memory {
    let mut memory = Memory::with_default_capacity();
    for (i, &word) in words.iter().enumerate() {
        memory
            .store_word((i * 4) as u32, word)
            .expect("program does not fit in memory");
    }
    memory
}

/// Create a simulator over the given words, entry at address 0.
pub fn simulator_with_words(words: &[u32]) -> Simulator {
    Simulator::new(program_from_words(words)).with_log_level(LogLevel::Instructions)
}

/// Format error context with disassembly and recent logs.
fn format_error(sim: &Simulator, error: &EmulatorError, words: &[u32]) -> String {
    let mut result = String::new();
    let error_pc = error.pc();

    result.push_str("=== Execution Error ===\n\n");
    result.push_str(&format!("Error: {}\n", error));
    result.push_str(&format!("PC: 0x{:08x}\n\n", error_pc));

    result.push_str("Disassembly:\n");
    for (i, &word) in words.iter().enumerate() {
        let pc = (i * 4) as u32;
        let marker = if pc == error_pc { ">>> " } else { "    " };
        result.push_str(&format!(
            "{}0x{:08x}: {}\n",
            marker,
            pc,
            disassemble_instruction(word)
        ));
    }

    let logs = sim.logs();
    if !logs.is_empty() {
        result.push_str("\nLast execution logs:\n");
        let start = logs.len().saturating_sub(10);
        for log in &logs[start..] {
            result.push_str(&format!("{}\n", log));
        }
    }

    result
}

/// Run words until EBREAK, panicking on any error, and return the simulator.
fn run_to_halt(words: &[u32]) -> Simulator {
    let mut sim = simulator_with_words(words);
    loop {
        match sim.run(Some(RUN_CAP)) {
            Ok(StopReason::Halted) => return sim,
            // Engine-agnostic policy for tests: ignore syscalls
            Ok(StopReason::Syscall(_)) => {}
            Ok(StopReason::BudgetExhausted) => {
                panic!("program did not halt within {} instructions", RUN_CAP)
            }
            Err(e) => panic!("{}", format_error(&sim, &e, words)),
        }
    }
}

/// Expect the program to halt with a specific value in `reg`.
pub fn expect_register(words: &[u32], reg: Gpr, expected: i32) {
    let sim = run_to_halt(words);
    let actual = sim.register(reg);
    if actual != expected {
        panic!(
            "Register {} mismatch: expected {}, got {}",
            reg, expected, actual
        );
    }
}

/// Expect the program to halt with a specific value in a0.
pub fn expect_a0(words: &[u32], expected: i32) {
    expect_register(words, Gpr::A0, expected);
}

/// Expect the program to fail with an InvalidMemoryAccess error.
pub fn expect_memory_error(words: &[u32]) {
    let mut sim = simulator_with_words(words);
    match sim.run(Some(RUN_CAP)) {
        Err(EmulatorError::InvalidMemoryAccess { .. }) => {}
        Err(e) => panic!("expected InvalidMemoryAccess, got: {}", e),
        Ok(reason) => panic!("expected InvalidMemoryAccess, run stopped: {:?}", reason),
    }
}

/// Expect the program to fail with an InvalidInstruction error.
pub fn expect_decode_error(words: &[u32]) {
    let mut sim = simulator_with_words(words);
    match sim.run(Some(RUN_CAP)) {
        Err(EmulatorError::InvalidInstruction { .. }) => {}
        Err(e) => panic!("expected InvalidInstruction, got: {}", e),
        Ok(reason) => panic!("expected InvalidInstruction, run stopped: {:?}", reason),
    }
}
