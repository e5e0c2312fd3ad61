//! Register file for the RV32I emulator.

use alloc::format;
use alloc::string::String;

use rv32i_encoder::Gpr;

/// 32 signed 32-bit general-purpose registers.
///
/// Register x0 is hard-wired to zero: writes directed at it are discarded,
/// and `enforce_zero` is re-applied after every executed instruction so
/// that no indirect path can make it non-zero.
pub struct Registers {
    regs: [i32; 32],
}

impl Registers {
    /// Create a zeroed register file.
    pub fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Read a register. x0 always reads as zero.
    pub fn read(&self, reg: Gpr) -> i32 {
        if reg.num() == 0 {
            0
        } else {
            self.regs[reg.num() as usize]
        }
    }

    /// Write a register. Writes to x0 are discarded.
    pub fn write(&mut self, reg: Gpr, value: i32) {
        if reg.num() != 0 {
            self.regs[reg.num() as usize] = value;
        }
    }

    /// Re-apply the x0 invariant. Called after every executed instruction.
    pub fn enforce_zero(&mut self) {
        self.regs[0] = 0;
    }

    /// Format all 32 registers as 8 rows of 4 `r<index>=<8-hex>` cells.
    pub fn dump(&self) -> String {
        let mut result = String::new();
        for row in 0..8 {
            for col in 0..4 {
                let index = row * 4 + col;
                result.push_str(&format!("r{:2}={:08x} ", index, self.regs[index] as u32));
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
