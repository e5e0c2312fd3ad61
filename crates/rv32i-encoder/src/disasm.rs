//! RV32I instruction disassembly.

use alloc::{format, string::String};

use crate::regs::Gpr;

/// Disassemble a single RV32I instruction word.
///
/// Returns a human-readable string like "add a0, a1, a2" or "jal ra, 16".
pub fn disassemble_instruction(inst: u32) -> String {
    let opcode = inst & 0x7f;
    let rd = Gpr::new(((inst >> 7) & 0x1f) as u8);
    let funct3 = ((inst >> 12) & 0x7) as u8;
    let rs1 = Gpr::new(((inst >> 15) & 0x1f) as u8);
    let rs2 = Gpr::new(((inst >> 20) & 0x1f) as u8);
    let funct7 = ((inst >> 25) & 0x7f) as u8;

    // Extract immediates for the formats that need them
    let imm_i = {
        let imm_raw = (inst >> 20) & 0xfff;
        if (imm_raw & 0x800) != 0 {
            (imm_raw | 0xfffff000) as i32
        } else {
            imm_raw as i32
        }
    };
    let imm_u = (inst >> 12) & 0xfffff;
    let imm_s = {
        let imm_lo = (inst >> 7) & 0x1f;
        let imm_hi_raw = (inst >> 25) & 0x7f;
        let imm_hi = if (imm_hi_raw & 0x40) != 0 {
            (imm_hi_raw | 0xffffff80) as i32
        } else {
            imm_hi_raw as i32
        };
        (imm_hi << 5) | (imm_lo as i32)
    };
    let imm_b = {
        let imm_12 = ((inst >> 31) & 0x1) as i32;
        let imm_10_5 = ((inst >> 25) & 0x3f) as i32;
        let imm_4_1 = ((inst >> 8) & 0xf) as i32;
        let imm_11 = ((inst >> 7) & 0x1) as i32;
        let imm = (imm_12 << 12) | (imm_11 << 11) | (imm_10_5 << 5) | (imm_4_1 << 1);
        if (imm & 0x1000) != 0 {
            imm | (-8192i32)
        } else {
            imm
        }
    };
    let imm_j = {
        let imm_20 = ((inst >> 31) & 0x1) as i32;
        let imm_10_1 = ((inst >> 21) & 0x3ff) as i32;
        let imm_11 = ((inst >> 20) & 0x1) as i32;
        let imm_19_12 = ((inst >> 12) & 0xff) as i32;
        let imm = (imm_20 << 20) | (imm_19_12 << 12) | (imm_11 << 11) | (imm_10_1 << 1);
        if (imm & 0x100000) != 0 {
            imm | (-2097152i32)
        } else {
            imm
        }
    };

    match opcode {
        0x33 => {
            let mnemonic = match (funct3, funct7) {
                (0x0, 0x00) => "add",
                (0x0, 0x20) => "sub",
                (0x1, 0x00) => "sll",
                (0x2, 0x00) => "slt",
                (0x3, 0x00) => "sltu",
                (0x4, 0x00) => "xor",
                (0x5, 0x00) => "srl",
                (0x5, 0x20) => "sra",
                (0x6, 0x00) => "or",
                (0x7, 0x00) => "and",
                (0x0, 0x01) => "mul",
                (0x1, 0x01) => "mulh",
                (0x2, 0x01) => "mulhsu",
                (0x3, 0x01) => "mulhu",
                (0x4, 0x01) => "div",
                (0x5, 0x01) => "divu",
                (0x6, 0x01) => "rem",
                (0x7, 0x01) => "remu",
                _ => return format!("unknown_r_type 0x{:08x}", inst),
            };
            format!("{} {}, {}, {}", mnemonic, rd, rs1, rs2)
        }
        0x2a => {
            // Dedicated set-less-than opcode
            match (funct3, funct7) {
                (0x0, 0x00) => format!("slt {}, {}, {}", rd, rs1, rs2),
                _ => format!("unknown_r_type 0x{:08x}", inst),
            }
        }
        0x13 => match funct3 {
            0x0 => format!("addi {}, {}, {}", rd, rs1, imm_i),
            0x1 => format!("slli {}, {}, {}", rd, rs1, imm_i & 0x1f),
            0x2 => format!("slti {}, {}, {}", rd, rs1, imm_i),
            0x3 => format!("sltiu {}, {}, {}", rd, rs1, imm_i),
            0x4 => format!("xori {}, {}, {}", rd, rs1, imm_i),
            0x5 => match funct7 {
                0x00 => format!("srli {}, {}, {}", rd, rs1, imm_i & 0x1f),
                0x20 => format!("srai {}, {}, {}", rd, rs1, imm_i & 0x1f),
                _ => format!("unknown_i_type 0x{:08x}", inst),
            },
            0x6 => format!("ori {}, {}, {}", rd, rs1, imm_i),
            0x7 => format!("andi {}, {}, {}", rd, rs1, imm_i),
            _ => format!("unknown_i_type 0x{:08x}", inst),
        },
        0x03 => {
            let mnemonic = match funct3 {
                0x0 => "lb",
                0x1 => "lh",
                0x2 => "lw",
                0x4 => "lbu",
                0x5 => "lhu",
                _ => return format!("unknown_load 0x{:08x}", inst),
            };
            format!("{} {}, {}({})", mnemonic, rd, imm_i, rs1)
        }
        0x23 => {
            let mnemonic = match funct3 {
                0x0 => "sb",
                0x1 => "sh",
                0x2 => "sw",
                _ => return format!("unknown_store 0x{:08x}", inst),
            };
            format!("{} {}, {}({})", mnemonic, rs2, imm_s, rs1)
        }
        0x63 => {
            let mnemonic = match funct3 {
                0x0 => "beq",
                0x1 => "bne",
                0x4 => "blt",
                0x5 => "bge",
                0x6 => "bltu",
                0x7 => "bgeu",
                _ => return format!("unknown_branch 0x{:08x}", inst),
            };
            format!("{} {}, {}, {}", mnemonic, rs1, rs2, imm_b)
        }
        0x37 => format!("lui {}, 0x{:05x}", rd, imm_u),
        0x6f => format!("jal {}, {}", rd, imm_j),
        0x73 => {
            if inst == 0x00000073 {
                String::from("ecall")
            } else if inst == 0x00100073 {
                String::from("ebreak")
            } else {
                format!("unknown_system 0x{:08x}", inst)
            }
        }
        _ => format!("unknown 0x{:08x} (opcode=0x{:02x})", inst, opcode),
    }
}

/// Disassemble a code buffer containing RV32I instructions.
///
/// Returns a formatted string with one instruction per line, showing
/// the address/offset and the disassembled instruction.
pub fn disassemble_code(code: &[u8]) -> String {
    let mut result = String::new();
    let mut offset = 0;

    while offset + 4 <= code.len() {
        let inst_bytes = [
            code[offset],
            code[offset + 1],
            code[offset + 2],
            code[offset + 3],
        ];
        let inst = u32::from_le_bytes(inst_bytes);

        let disasm = disassemble_instruction(inst);
        result.push_str(&format!("0x{:04x}: {}\n", offset, disasm));

        offset += 4;
    }

    if offset < code.len() {
        result.push_str(&format!("0x{:04x}: <incomplete instruction>\n", offset));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::*;
    use alloc::vec::Vec;

    #[test]
    fn test_disassemble_add() {
        let inst = add(Gpr::A0, Gpr::A1, Gpr::A2);
        assert_eq!(disassemble_instruction(inst), "add a0, a1, a2");
    }

    #[test]
    fn test_disassemble_sub() {
        let inst = sub(Gpr::A0, Gpr::A1, Gpr::A2);
        assert_eq!(disassemble_instruction(inst), "sub a0, a1, a2");
    }

    #[test]
    fn test_disassemble_addi_negative() {
        let inst = addi(Gpr::A0, Gpr::A1, -5);
        assert_eq!(disassemble_instruction(inst), "addi a0, a1, -5");
    }

    #[test]
    fn test_disassemble_loads_and_stores() {
        assert_eq!(
            disassemble_instruction(lbu(Gpr::A0, Gpr::SP, 3)),
            "lbu a0, 3(sp)"
        );
        assert_eq!(
            disassemble_instruction(sh(Gpr::SP, Gpr::A0, -2)),
            "sh a0, -2(sp)"
        );
    }

    #[test]
    fn test_disassemble_branch_negative_offset() {
        let inst = bne(Gpr::A0, Gpr::A1, -8);
        assert_eq!(disassemble_instruction(inst), "bne a0, a1, -8");
    }

    #[test]
    fn test_disassemble_slt_alt() {
        let inst = slt_alt(Gpr::A0, Gpr::A1, Gpr::A2);
        assert_eq!(disassemble_instruction(inst), "slt a0, a1, a2");
    }

    #[test]
    fn test_disassemble_lui() {
        let inst = lui(Gpr::A0, 0x12345);
        let disasm = disassemble_instruction(inst);
        assert!(disasm.contains("lui a0"));
        assert!(disasm.contains("0x12345"));
    }

    #[test]
    fn test_disassemble_ecall() {
        assert_eq!(disassemble_instruction(ecall()), "ecall");
        assert_eq!(disassemble_instruction(ebreak()), "ebreak");
    }

    #[test]
    fn test_disassemble_unknown_opcode() {
        let disasm = disassemble_instruction(0x0000007b);
        assert!(disasm.contains("unknown"));
        assert!(disasm.contains("0x7b"));
    }

    #[test]
    fn test_disassemble_code() {
        let mut code = Vec::new();
        code.extend_from_slice(&add(Gpr::A0, Gpr::A1, Gpr::A2).to_le_bytes());
        code.extend_from_slice(&addi(Gpr::A1, Gpr::A0, 10).to_le_bytes());
        code.extend_from_slice(&ecall().to_le_bytes());

        let disasm = disassemble_code(&code);
        assert!(disasm.contains("add a0, a1, a2"));
        assert!(disasm.contains("addi a1, a0, 10"));
        assert!(disasm.contains("ecall"));
    }
}
