//! Single-hart RV32I emulator.
//!
//! This crate provides the core of the simulator: instruction decoding,
//! execution, and the memory and register abstractions they operate on.
//! Program loading, argument parsing, and trace printing live in the
//! `rv32i-sim` binary on top of this crate.

#![no_std]

extern crate alloc;

mod bits;
mod decoder;
mod error;
mod executor;
mod helpers;
mod logging;
mod memory;
mod registers;
mod simulator;

pub use bits::sign_extend;
pub use decoder::{branch_offset, decode, jump_offset, store_offset, Format, Instruction};
pub use error::{EmulatorError, MemoryAccessKind};
pub use executor::{execute_instruction, Effect, Event};
pub use helpers::{
    expect_a0, expect_decode_error, expect_memory_error, expect_register, program_from_words,
    simulator_with_words,
};
pub use logging::{InstLog, LogLevel, SystemKind};
pub use memory::{Memory, MEMORY_SPACE};
pub use registers::Registers;
pub use simulator::{Simulator, StepResult, StopReason, SyscallInfo};
