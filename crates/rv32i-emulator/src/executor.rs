//! Instruction executor for the RV32I emulator.

use crate::bits::sign_extend;
use crate::decoder::{branch_offset, jump_offset, store_offset, Format, Instruction};
use crate::error::EmulatorError;
use crate::logging::{InstLog, SystemKind};
use crate::memory::Memory;
use crate::registers::Registers;

/// Control event raised by a system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// ECALL: syscall handling is the caller's policy.
    Syscall,
    /// EBREAK: execution should stop.
    Halted,
}

/// Result of executing a single instruction.
#[derive(Debug, Clone)]
pub struct Effect {
    /// New PC value (None means PC += 4).
    pub new_pc: Option<u32>,
    /// Control event, if the instruction raised one.
    pub event: Option<Event>,
    /// Log entry for this instruction (cycle stamped by the simulator).
    pub log: InstLog,
}

impl Effect {
    fn fall_through(log: InstLog) -> Self {
        Self {
            new_pc: None,
            event: None,
            log,
        }
    }
}

fn invalid(inst: &Instruction, pc: u32) -> EmulatorError {
    EmulatorError::InvalidInstruction {
        pc,
        instruction: inst.bits,
    }
}

/// Execute a decoded instruction against the register file and memory.
///
/// Returns the PC redirection and control event, or an error for invalid
/// sub-encodings and memory faults. The caller re-applies the x0 invariant
/// after every instruction.
pub fn execute_instruction(
    inst: &Instruction,
    regs: &mut Registers,
    memory: &mut Memory,
    pc: u32,
) -> Result<Effect, EmulatorError> {
    match inst.format {
        Format::R {
            rd,
            funct3,
            rs1,
            rs2,
            funct7,
        } => {
            let a = regs.read(rs1);
            let b = regs.read(rs2);
            let result = if inst.opcode == 0x2a {
                // Dedicated set-less-than opcode
                match (funct3, funct7) {
                    (0x0, 0x00) => (a < b) as i32,
                    _ => return Err(invalid(inst, pc)),
                }
            } else {
                match (funct3, funct7) {
                    (0x0, 0x00) => a.wrapping_add(b),
                    (0x0, 0x20) => a.wrapping_sub(b),
                    (0x1, 0x00) => ((a as u32) << (b & 0x1f)) as i32,
                    (0x2, 0x00) => (a < b) as i32,
                    (0x3, 0x00) => ((a as u32) < (b as u32)) as i32,
                    (0x4, 0x00) => a ^ b,
                    (0x5, 0x00) => ((a as u32) >> (b & 0x1f)) as i32,
                    (0x5, 0x20) => a >> (b & 0x1f),
                    (0x6, 0x00) => a | b,
                    (0x7, 0x00) => a & b,
                    (0x0, 0x01) => a.wrapping_mul(b),
                    (0x1, 0x01) => (((a as i64) * (b as i64)) >> 32) as i32,
                    (0x2, 0x01) => (((a as i64) * ((b as u32) as i64)) >> 32) as i32,
                    (0x3, 0x01) => ((((a as u32) as u64) * ((b as u32) as u64)) >> 32) as i32,
                    (0x4, 0x01) => {
                        if b == 0 {
                            -1
                        } else if a == i32::MIN && b == -1 {
                            i32::MIN
                        } else {
                            a / b
                        }
                    }
                    (0x5, 0x01) => {
                        if b == 0 {
                            -1
                        } else {
                            ((a as u32) / (b as u32)) as i32
                        }
                    }
                    (0x6, 0x01) => {
                        if b == 0 {
                            a
                        } else if a == i32::MIN && b == -1 {
                            0
                        } else {
                            a % b
                        }
                    }
                    (0x7, 0x01) => {
                        if b == 0 {
                            a
                        } else {
                            ((a as u32) % (b as u32)) as i32
                        }
                    }
                    _ => return Err(invalid(inst, pc)),
                }
            };
            let rd_old = regs.read(rd);
            regs.write(rd, result);
            Ok(Effect::fall_through(InstLog::RegWrite {
                cycle: 0,
                pc,
                instruction: inst.bits,
                rd,
                rd_old,
                rd_new: regs.read(rd),
            }))
        }

        Format::I {
            rd,
            funct3,
            rs1,
            imm,
        } => match inst.opcode {
            0x13 => {
                let a = regs.read(rs1);
                let simm = sign_extend(imm, 12);
                let shamt = imm & 0x1f;
                let funct7 = ((imm >> 5) & 0x7f) as u8;
                let result = match funct3 {
                    0x0 => a.wrapping_add(simm),
                    0x1 => match funct7 {
                        0x00 => ((a as u32) << shamt) as i32,
                        _ => return Err(invalid(inst, pc)),
                    },
                    0x2 => (a < simm) as i32,
                    0x3 => ((a as u32) < (simm as u32)) as i32,
                    0x4 => a ^ simm,
                    0x5 => match funct7 {
                        0x00 => ((a as u32) >> shamt) as i32,
                        0x20 => a >> shamt,
                        _ => return Err(invalid(inst, pc)),
                    },
                    0x6 => a | simm,
                    0x7 => a & simm,
                    _ => return Err(invalid(inst, pc)),
                };
                let rd_old = regs.read(rd);
                regs.write(rd, result);
                Ok(Effect::fall_through(InstLog::RegWrite {
                    cycle: 0,
                    pc,
                    instruction: inst.bits,
                    rd,
                    rd_old,
                    rd_new: regs.read(rd),
                }))
            }
            0x03 => {
                let base = regs.read(rs1);
                let address = base.wrapping_add(sign_extend(imm, 12)) as u32;
                let value = match funct3 {
                    0x0 => {
                        let byte = memory.load_byte(address).map_err(|e| e.at_pc(pc))?;
                        sign_extend(byte as u32, 8)
                    }
                    0x1 => {
                        let half = memory.load_half(address).map_err(|e| e.at_pc(pc))?;
                        sign_extend(half as u32, 16)
                    }
                    0x2 => memory.load_word(address).map_err(|e| e.at_pc(pc))? as i32,
                    0x4 => memory.load_byte(address).map_err(|e| e.at_pc(pc))? as i32,
                    0x5 => memory.load_half(address).map_err(|e| e.at_pc(pc))? as i32,
                    _ => return Err(invalid(inst, pc)),
                };
                let rd_old = regs.read(rd);
                regs.write(rd, value);
                Ok(Effect::fall_through(InstLog::RegWrite {
                    cycle: 0,
                    pc,
                    instruction: inst.bits,
                    rd,
                    rd_old,
                    rd_new: regs.read(rd),
                }))
            }
            0x73 => {
                let kind = match imm {
                    0 => SystemKind::Ecall,
                    1 => SystemKind::Ebreak,
                    _ => SystemKind::Other,
                };
                let event = match kind {
                    SystemKind::Ecall => Some(Event::Syscall),
                    SystemKind::Ebreak => Some(Event::Halted),
                    SystemKind::Other => None,
                };
                Ok(Effect {
                    new_pc: None,
                    event,
                    log: InstLog::System {
                        cycle: 0,
                        pc,
                        instruction: inst.bits,
                        kind,
                    },
                })
            }
            _ => Err(invalid(inst, pc)),
        },

        Format::S {
            imm_lo,
            funct3,
            rs1,
            rs2,
            imm_hi,
        } => {
            let base = regs.read(rs1);
            let value = regs.read(rs2);
            let address = base.wrapping_add(store_offset(imm_lo, imm_hi)) as u32;
            let (size, stored) = match funct3 {
                0x0 => {
                    memory
                        .store_byte(address, value as u8)
                        .map_err(|e| e.at_pc(pc))?;
                    (1, (value as u32) & 0xff)
                }
                0x1 => {
                    memory
                        .store_half(address, value as u16)
                        .map_err(|e| e.at_pc(pc))?;
                    (2, (value as u32) & 0xffff)
                }
                0x2 => {
                    memory
                        .store_word(address, value as u32)
                        .map_err(|e| e.at_pc(pc))?;
                    (4, value as u32)
                }
                _ => return Err(invalid(inst, pc)),
            };
            Ok(Effect::fall_through(InstLog::MemWrite {
                cycle: 0,
                pc,
                instruction: inst.bits,
                addr: address,
                size,
                value: stored,
            }))
        }

        Format::Sb {
            imm_lo,
            funct3,
            rs1,
            rs2,
            imm_hi,
        } => {
            let a = regs.read(rs1);
            let b = regs.read(rs2);
            let taken = match funct3 {
                0x0 => a == b,
                0x1 => a != b,
                0x4 => a < b,
                0x5 => a >= b,
                0x6 => (a as u32) < (b as u32),
                0x7 => (a as u32) >= (b as u32),
                _ => return Err(invalid(inst, pc)),
            };
            let target = pc.wrapping_add(branch_offset(imm_lo, imm_hi) as u32);
            Ok(Effect {
                new_pc: if taken { Some(target) } else { None },
                event: None,
                log: InstLog::Branch {
                    cycle: 0,
                    pc,
                    instruction: inst.bits,
                    taken,
                    target,
                },
            })
        }

        Format::U { rd, imm } => {
            let rd_old = regs.read(rd);
            regs.write(rd, (imm << 12) as i32);
            Ok(Effect::fall_through(InstLog::RegWrite {
                cycle: 0,
                pc,
                instruction: inst.bits,
                rd,
                rd_old,
                rd_new: regs.read(rd),
            }))
        }

        Format::Uj { rd, imm } => {
            let link = pc.wrapping_add(4) as i32;
            regs.write(rd, link);
            let target = pc.wrapping_add(jump_offset(imm) as u32);
            Ok(Effect {
                new_pc: Some(target),
                event: None,
                log: InstLog::Jump {
                    cycle: 0,
                    pc,
                    instruction: inst.bits,
                    target,
                    link: if rd.num() != 0 { Some(link) } else { None },
                },
            })
        }
    }
}
