//! RV32I instruction encoder.
//!
//! This crate provides functions to encode RV32I instructions into their
//! binary representation, and to disassemble instruction words back into
//! human-readable text.

#![no_std]

extern crate alloc;

mod disasm;
mod encode;
mod regs;

pub use disasm::{disassemble_code, disassemble_instruction};
pub use encode::*;
pub use regs::Gpr;
