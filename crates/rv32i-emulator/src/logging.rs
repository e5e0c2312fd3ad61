//! Instruction-trace logging for the RV32I emulator.

use core::fmt;

use rv32i_encoder::{disassemble_instruction, Gpr};

/// Logging verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// No logging.
    None,
    /// Log each instruction execution.
    Instructions,
}

/// System instruction kind for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    Ecall,
    Ebreak,
    Other,
}

/// Log entry for a single executed instruction, keyed by its effect.
#[derive(Debug, Clone)]
pub enum InstLog {
    /// A register write: ALU results, loads, lui, and jump link writes.
    RegWrite {
        cycle: u64,
        pc: u32,
        instruction: u32,
        rd: Gpr,
        rd_old: i32,
        rd_new: i32,
    },
    /// A memory write.
    MemWrite {
        cycle: u64,
        pc: u32,
        instruction: u32,
        addr: u32,
        size: u32,
        value: u32,
    },
    /// A conditional branch, taken or not.
    Branch {
        cycle: u64,
        pc: u32,
        instruction: u32,
        taken: bool,
        target: u32,
    },
    /// An unconditional jump, with the link value if rd is not x0.
    Jump {
        cycle: u64,
        pc: u32,
        instruction: u32,
        target: u32,
        link: Option<i32>,
    },
    /// A system instruction.
    System {
        cycle: u64,
        pc: u32,
        instruction: u32,
        kind: SystemKind,
    },
}

impl InstLog {
    /// Get the cycle count for this log entry.
    pub fn cycle(&self) -> u64 {
        match self {
            InstLog::RegWrite { cycle, .. }
            | InstLog::MemWrite { cycle, .. }
            | InstLog::Branch { cycle, .. }
            | InstLog::Jump { cycle, .. }
            | InstLog::System { cycle, .. } => *cycle,
        }
    }

    /// Get the PC for this log entry.
    pub fn pc(&self) -> u32 {
        match self {
            InstLog::RegWrite { pc, .. }
            | InstLog::MemWrite { pc, .. }
            | InstLog::Branch { pc, .. }
            | InstLog::Jump { pc, .. }
            | InstLog::System { pc, .. } => *pc,
        }
    }

    /// Get the instruction word for this log entry.
    pub fn instruction(&self) -> u32 {
        match self {
            InstLog::RegWrite { instruction, .. }
            | InstLog::MemWrite { instruction, .. }
            | InstLog::Branch { instruction, .. }
            | InstLog::Jump { instruction, .. }
            | InstLog::System { instruction, .. } => *instruction,
        }
    }

    /// Set the cycle count. The executor creates entries with cycle 0; the
    /// simulator stamps the real count when it buffers them.
    pub fn set_cycle(&mut self, value: u64) {
        match self {
            InstLog::RegWrite { cycle, .. }
            | InstLog::MemWrite { cycle, .. }
            | InstLog::Branch { cycle, .. }
            | InstLog::Jump { cycle, .. }
            | InstLog::System { cycle, .. } => *cycle = value,
        }
    }
}

impl fmt::Display for InstLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disassembly = disassemble_instruction(self.instruction());
        write!(f, "[{:4}] 0x{:08x}: {}", self.cycle(), self.pc(), disassembly)?;

        match self {
            InstLog::RegWrite {
                rd, rd_old, rd_new, ..
            } => {
                write!(f, "\n    {}: {} -> {}", rd, rd_old, rd_new)?;
            }
            InstLog::MemWrite {
                addr, size, value, ..
            } => {
                write!(
                    f,
                    "\n    mem[0x{:08x}] <- 0x{:08x} ({} bytes)",
                    addr, value, size
                )?;
            }
            InstLog::Branch { taken, target, pc, .. } => {
                if *taken {
                    write!(f, "\n    branch taken: 0x{:08x} -> 0x{:08x}", pc, target)?;
                } else {
                    write!(f, "\n    branch not taken")?;
                }
            }
            InstLog::Jump {
                target, link, pc, ..
            } => {
                if let Some(link) = link {
                    write!(f, "\n    link: {}", link)?;
                }
                write!(f, "\n    jump: 0x{:08x} -> 0x{:08x}", pc, target)?;
            }
            InstLog::System { kind, .. } => match kind {
                SystemKind::Ecall => write!(f, "\n    syscall")?,
                SystemKind::Ebreak => write!(f, "\n    breakpoint")?,
                SystemKind::Other => write!(f, "\n    system no-op")?,
            },
        }

        Ok(())
    }
}
