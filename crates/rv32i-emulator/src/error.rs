//! Error types for the RV32I emulator.

/// Kind of memory access that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryAccessKind {
    Read,
    Write,
    InstructionFetch,
}

/// Errors that can occur during emulation.
///
/// Both conditions are fatal to a run; whether the process terminates or
/// recovers is the caller's policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    /// Unrecognized opcode or invalid sub-encoding.
    InvalidInstruction { pc: u32, instruction: u32 },
    /// Out-of-bounds memory access.
    InvalidMemoryAccess {
        address: u32,
        size: u32,
        kind: MemoryAccessKind,
        pc: u32,
    },
}

impl EmulatorError {
    /// Get the PC where the error occurred.
    pub fn pc(&self) -> u32 {
        match self {
            EmulatorError::InvalidInstruction { pc, .. } => *pc,
            EmulatorError::InvalidMemoryAccess { pc, .. } => *pc,
        }
    }

    /// Attach the faulting PC. Memory and decode errors are created below
    /// the level that knows the PC, which fills it in on the way up.
    pub fn at_pc(mut self, at: u32) -> Self {
        match &mut self {
            EmulatorError::InvalidInstruction { pc, .. } => *pc = at,
            EmulatorError::InvalidMemoryAccess { pc, .. } => *pc = at,
        }
        self
    }
}

impl core::fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EmulatorError::InvalidInstruction { pc, instruction } => write!(
                f,
                "invalid instruction 0x{:08x} at pc 0x{:08x}",
                instruction, pc
            ),
            EmulatorError::InvalidMemoryAccess {
                address,
                size,
                kind,
                pc,
            } => {
                let kind_str = match kind {
                    MemoryAccessKind::Read => "read",
                    MemoryAccessKind::Write => "write",
                    MemoryAccessKind::InstructionFetch => "instruction fetch",
                };
                write!(
                    f,
                    "bad {} at address 0x{:08x} ({} bytes) at pc 0x{:08x}",
                    kind_str, address, size, pc
                )
            }
        }
    }
}
