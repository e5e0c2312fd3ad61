//! The simulation session: fetch-decode-execute over owned state.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use rv32i_encoder::Gpr;

use crate::{
    decoder::decode,
    error::EmulatorError,
    executor::{execute_instruction, Event},
    logging::{InstLog, LogLevel},
    memory::Memory,
    registers::Registers,
};

/// Result of a single step.
#[derive(Debug, Clone)]
pub enum StepResult {
    /// Normal step completed, continue execution.
    Continue,
    /// ECALL encountered, syscall information available.
    Syscall(SyscallInfo),
    /// EBREAK encountered, execution halted.
    Halted,
}

/// Why a bounded or unbounded run stopped without a fatal error.
#[derive(Debug, Clone)]
pub enum StopReason {
    /// The instruction budget was exhausted (normal termination).
    BudgetExhausted,
    /// ECALL encountered; the caller decides the policy and may resume.
    Syscall(SyscallInfo),
    /// EBREAK encountered.
    Halted,
}

/// Information about a syscall (ECALL): call number from a0, arguments
/// from a1-a7.
#[derive(Debug, Clone)]
pub struct SyscallInfo {
    pub number: i32,
    pub args: [i32; 7],
}

/// A single-hart simulation session.
///
/// Owns the register file, memory arena, and program counter for one run;
/// created zeroed and mutated in place by every executed instruction.
pub struct Simulator {
    regs: Registers,
    pc: u32,
    memory: Memory,
    instruction_count: u64,
    log_level: LogLevel,
    log_buffer: Vec<InstLog>,
}

/// Rolling log buffer cap.
const LOG_BUFFER_LIMIT: usize = 100;

impl Simulator {
    /// Create a new session over the given memory arena. The PC starts at
    /// zero; callers set the entry address and register presets.
    pub fn new(memory: Memory) -> Self {
        Self {
            regs: Registers::new(),
            pc: 0,
            memory,
            instruction_count: 0,
            log_level: LogLevel::None,
            log_buffer: Vec::new(),
        }
    }

    /// Set the logging level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Execute a single fetch-decode-execute cycle.
    pub fn step(&mut self) -> Result<StepResult, EmulatorError> {
        let pc = self.pc;
        let word = self
            .memory
            .fetch_instruction(pc)
            .map_err(|e| e.at_pc(pc))?;
        let inst = decode(word).map_err(|e| e.at_pc(pc))?;

        let effect = execute_instruction(&inst, &mut self.regs, &mut self.memory, pc)?;

        // x0 is hard-wired to zero; re-applied after every instruction
        self.regs.enforce_zero();

        self.instruction_count += 1;
        self.pc = effect.new_pc.unwrap_or(pc.wrapping_add(4));

        let mut log = effect.log;
        log.set_cycle(self.instruction_count);
        self.log_instruction(log);

        match effect.event {
            Some(Event::Halted) => Ok(StepResult::Halted),
            Some(Event::Syscall) => Ok(StepResult::Syscall(self.syscall_info())),
            None => Ok(StepResult::Continue),
        }
    }

    /// Run until the budget is exhausted, a system event surfaces, or a
    /// fatal error occurs. A `None` budget runs unbounded.
    pub fn run(&mut self, budget: Option<u64>) -> Result<StopReason, EmulatorError> {
        let mut remaining = budget;
        loop {
            if let Some(ref mut count) = remaining {
                if *count == 0 {
                    return Ok(StopReason::BudgetExhausted);
                }
                *count -= 1;
            }
            match self.step()? {
                StepResult::Continue => {}
                StepResult::Syscall(info) => return Ok(StopReason::Syscall(info)),
                StepResult::Halted => return Ok(StopReason::Halted),
            }
        }
    }

    fn syscall_info(&self) -> SyscallInfo {
        SyscallInfo {
            number: self.regs.read(Gpr::A0),
            args: [
                self.regs.read(Gpr::A1),
                self.regs.read(Gpr::A2),
                self.regs.read(Gpr::A3),
                self.regs.read(Gpr::A4),
                self.regs.read(Gpr::A5),
                self.regs.read(Gpr::A6),
                self.regs.read(Gpr::A7),
            ],
        }
    }

    /// Get the value of a register.
    pub fn register(&self, reg: Gpr) -> i32 {
        self.regs.read(reg)
    }

    /// Set the value of a register. Writing to x0 is a no-op.
    pub fn set_register(&mut self, reg: Gpr, value: i32) {
        self.regs.write(reg, value);
    }

    /// Get the current program counter.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Set the program counter.
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Get the number of instructions executed so far.
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Get a reference to the memory (for inspection).
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Get a mutable reference to the memory (for initialization).
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Format all 32 registers in the fixed 8x4 dump layout.
    pub fn dump_registers(&self) -> String {
        self.regs.dump()
    }

    /// Get captured log entries.
    pub fn logs(&self) -> &[InstLog] {
        &self.log_buffer
    }

    /// Format all captured logs as a string.
    pub fn format_logs(&self) -> String {
        let mut result = String::new();
        for log in &self.log_buffer {
            result.push_str(&format!("{}\n", log));
        }
        result
    }

    /// Clear captured log messages.
    pub fn clear_logs(&mut self) {
        self.log_buffer.clear();
    }

    fn log_instruction(&mut self, log: InstLog) {
        match self.log_level {
            LogLevel::None => {}
            LogLevel::Instructions => {
                if self.log_buffer.len() >= LOG_BUFFER_LIMIT {
                    self.log_buffer.remove(0);
                }
                self.log_buffer.push(log);
            }
        }
    }
}
