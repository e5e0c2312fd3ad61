//! Memory access tests for the RV32I emulator.

use rv32i_emulator::{EmulatorError, Memory, MemoryAccessKind, Simulator};
use rv32i_encoder::{addi, lb, lbu, lh, lhu, lui, lw, sb, sh, sw, Gpr};

fn simulator_with(words: &[u32]) -> Simulator {
    let mut memory = Memory::with_default_capacity();
    for (i, &word) in words.iter().enumerate() {
        memory.store_word((i * 4) as u32, word).unwrap();
    }
    Simulator::new(memory)
}

#[test]
fn test_byte_and_half_round_trip() {
    let mut sim = simulator_with(&[
        lui(Gpr::A2, 0x3),               // a2 = 0x3000
        addi(Gpr::A1, Gpr::ZERO, -2),    // a1 = 0xfffffffe
        sb(Gpr::A2, Gpr::A1, 0),
        sh(Gpr::A2, Gpr::A1, 4),
        lb(Gpr::A3, Gpr::A2, 0),
        lbu(Gpr::A4, Gpr::A2, 0),
        lh(Gpr::A5, Gpr::A2, 4),
        lhu(Gpr::A6, Gpr::A2, 4),
        rv32i_encoder::ebreak(),
    ]);
    loop {
        match sim.step().expect("execution failed") {
            rv32i_emulator::StepResult::Halted => break,
            _ => {}
        }
    }
    assert_eq!(sim.register(Gpr::A3), -2);
    assert_eq!(sim.register(Gpr::A4), 0xfe);
    assert_eq!(sim.register(Gpr::A5), -2);
    assert_eq!(sim.register(Gpr::A6), 0xfffe);
}

#[test]
fn test_out_of_bounds_read() {
    let mut sim = simulator_with(&[
        lui(Gpr::SP, 0x80000),           // sp = 0x80000000, far out of bounds
        lw(Gpr::A0, Gpr::SP, 0),
    ]);
    sim.step().expect("lui failed");
    match sim.step() {
        Err(EmulatorError::InvalidMemoryAccess { address, kind, pc, .. }) => {
            assert_eq!(address, 0x80000000);
            assert_eq!(kind, MemoryAccessKind::Read);
            assert_eq!(pc, 4);
        }
        other => panic!("expected InvalidMemoryAccess, got {:?}", other),
    }
}

#[test]
fn test_out_of_bounds_write() {
    let mut sim = simulator_with(&[
        lui(Gpr::SP, 0x80000),
        addi(Gpr::A0, Gpr::ZERO, 42),
        sw(Gpr::SP, Gpr::A0, 0),
    ]);
    sim.step().expect("lui failed");
    sim.step().expect("addi failed");
    match sim.step() {
        Err(EmulatorError::InvalidMemoryAccess { address, kind, .. }) => {
            assert_eq!(address, 0x80000000);
            assert_eq!(kind, MemoryAccessKind::Write);
        }
        other => panic!("expected InvalidMemoryAccess, got {:?}", other),
    }
}

#[test]
fn test_access_straddling_end_of_arena() {
    // A word access that starts in bounds but ends past the arena must fail
    let capacity = rv32i_emulator::MEMORY_SPACE;
    let mut sim = simulator_with(&[
        lui(Gpr::SP, capacity >> 12),    // sp = capacity
        lw(Gpr::A0, Gpr::SP, -2),
    ]);
    sim.step().expect("lui failed");
    match sim.step() {
        Err(EmulatorError::InvalidMemoryAccess { address, size, .. }) => {
            assert_eq!(address, capacity - 2);
            assert_eq!(size, 4);
        }
        other => panic!("expected InvalidMemoryAccess, got {:?}", other),
    }
}

#[test]
fn test_fetch_past_end_of_arena() {
    let mut sim = simulator_with(&[]);
    sim.set_pc(rv32i_emulator::MEMORY_SPACE);
    match sim.step() {
        Err(EmulatorError::InvalidMemoryAccess { kind, .. }) => {
            assert_eq!(kind, MemoryAccessKind::InstructionFetch);
        }
        other => panic!("expected InvalidMemoryAccess, got {:?}", other),
    }
}

#[test]
fn test_negative_store_offset() {
    let mut sim = simulator_with(&[
        lui(Gpr::A2, 0x3),               // a2 = 0x3000
        addi(Gpr::A1, Gpr::ZERO, 7),
        sw(Gpr::A2, Gpr::A1, -4),
        rv32i_encoder::ebreak(),
    ]);
    loop {
        match sim.step().expect("execution failed") {
            rv32i_emulator::StepResult::Halted => break,
            _ => {}
        }
    }
    assert_eq!(sim.memory().load_word(0x3000 - 4).unwrap(), 7);
}
