//! RV32I general-purpose registers.

extern crate alloc;

use core::fmt;

/// RV32I general-purpose register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gpr(u8);

impl Gpr {
    /// Create a new GPR from register number (0-31).
    ///
    /// # Panics
    ///
    /// Panics if the register number is >= 32.
    pub fn new(num: u8) -> Self {
        assert!(num < 32, "Register number must be < 32");
        Self(num)
    }

    /// Get the register number (0-31).
    pub fn num(&self) -> u8 {
        self.0
    }
}

// Named registers (ABI mnemonics)
impl Gpr {
    // x0: hardwired zero
    pub const ZERO: Gpr = Gpr(0);
    // x1: return address
    pub const RA: Gpr = Gpr(1);
    // x2: stack pointer
    pub const SP: Gpr = Gpr(2);
    // x3: global pointer
    pub const GP: Gpr = Gpr(3);
    // x4: thread pointer
    pub const TP: Gpr = Gpr(4);
    // x5-x7: temporaries
    pub const T0: Gpr = Gpr(5);
    pub const T1: Gpr = Gpr(6);
    pub const T2: Gpr = Gpr(7);
    // x8: saved register / frame pointer
    pub const S0: Gpr = Gpr(8);
    // x9: saved register
    pub const S1: Gpr = Gpr(9);
    // x10-x17: arguments / return values
    pub const A0: Gpr = Gpr(10);
    pub const A1: Gpr = Gpr(11);
    pub const A2: Gpr = Gpr(12);
    pub const A3: Gpr = Gpr(13);
    pub const A4: Gpr = Gpr(14);
    pub const A5: Gpr = Gpr(15);
    pub const A6: Gpr = Gpr(16);
    pub const A7: Gpr = Gpr(17);
    // x18-x27: saved registers
    pub const S2: Gpr = Gpr(18);
    pub const S3: Gpr = Gpr(19);
    pub const S4: Gpr = Gpr(20);
    pub const S5: Gpr = Gpr(21);
    pub const S6: Gpr = Gpr(22);
    pub const S7: Gpr = Gpr(23);
    pub const S8: Gpr = Gpr(24);
    pub const S9: Gpr = Gpr(25);
    pub const S10: Gpr = Gpr(26);
    pub const S11: Gpr = Gpr(27);
    // x28-x31: temporaries
    pub const T3: Gpr = Gpr(28);
    pub const T4: Gpr = Gpr(29);
    pub const T5: Gpr = Gpr(30);
    pub const T6: Gpr = Gpr(31);
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0 => "zero",
            1 => "ra",
            2 => "sp",
            3 => "gp",
            4 => "tp",
            5 => "t0",
            6 => "t1",
            7 => "t2",
            8 => "s0",
            9 => "s1",
            10 => "a0",
            11 => "a1",
            12 => "a2",
            13 => "a3",
            14 => "a4",
            15 => "a5",
            16 => "a6",
            17 => "a7",
            18 => "s2",
            19 => "s3",
            20 => "s4",
            21 => "s5",
            22 => "s6",
            23 => "s7",
            24 => "s8",
            25 => "s9",
            26 => "s10",
            27 => "s11",
            28 => "t3",
            29 => "t4",
            30 => "t5",
            31 => "t6",
            _ => unreachable!(),
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_gpr_creation() {
        let reg = Gpr::new(5);
        assert_eq!(reg.num(), 5);
    }

    #[test]
    #[should_panic(expected = "Register number must be < 32")]
    fn test_gpr_invalid() {
        Gpr::new(32);
    }

    #[test]
    fn test_named_registers() {
        assert_eq!(Gpr::ZERO.num(), 0);
        assert_eq!(Gpr::RA.num(), 1);
        assert_eq!(Gpr::SP.num(), 2);
        assert_eq!(Gpr::GP.num(), 3);
        assert_eq!(Gpr::A0.num(), 10);
        assert_eq!(Gpr::T6.num(), 31);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Gpr::ZERO), "zero");
        assert_eq!(format!("{}", Gpr::RA), "ra");
        assert_eq!(format!("{}", Gpr::SP), "sp");
        assert_eq!(format!("{}", Gpr::GP), "gp");
        assert_eq!(format!("{}", Gpr::T0), "t0");
        assert_eq!(format!("{}", Gpr::S0), "s0");
        assert_eq!(format!("{}", Gpr::A0), "a0");
        assert_eq!(format!("{}", Gpr::S11), "s11");
        assert_eq!(format!("{}", Gpr::T6), "t6");
    }
}
