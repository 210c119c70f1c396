//! Sharp SM83 interpreter (Game Boy CPU).
//!
//! Fetch one opcode byte, advance PC, run the handler found in the primary
//! table. The `0xCB` entry of that table fetches a second byte and runs one
//! handler from the prefixed table before returning to the loop.

use serde_json::Value;

use crate::error::CpuError;
use crate::logging::{log, LogCategory, LogLevel};
use crate::memory::Memory;
use crate::opcodes::{OpcodeTables, Table, IME_LATCH};
use crate::registers::{Reg8, Registers};

/// The most recent fetch: which table was consulted, for which byte, and
/// where that byte was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub table: Table,
    pub opcode: u8,
    pub addr: u16,
}

/// Full copy of the CPU's mutable state, registers and memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    regs: Registers,
    memory: Memory,
    instructions: u64,
}

impl Snapshot {
    pub fn registers(&self) -> &Registers {
        &self.regs
    }
}

#[derive(Debug)]
pub struct Sm83 {
    pub regs: Registers,
    pub memory: Memory,
    tables: Box<OpcodeTables>,
    dispatch: Dispatch,
    /// Completed `step()` calls
    instructions: u64,
}

impl Sm83 {
    /// CPU over `memory` with the full SM83 instruction set. PC starts at 0.
    pub fn new(memory: Memory) -> Self {
        Self::with_tables(memory, OpcodeTables::sm83())
    }

    /// CPU with caller-supplied dispatch tables.
    pub fn with_tables(memory: Memory, tables: OpcodeTables) -> Self {
        Self {
            regs: Registers::new(),
            memory,
            tables: Box::new(tables),
            dispatch: Dispatch {
                table: Table::Primary,
                opcode: 0,
                addr: 0,
            },
            instructions: 0,
        }
    }

    /// Clear every register. Memory is left as it is.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.dispatch = Dispatch {
            table: Table::Primary,
            opcode: 0,
            addr: 0,
        };
        self.instructions = 0;
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<(), CpuError> {
        self.dispatch(Table::Primary)?;
        self.instructions += 1;
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, table: Table) -> Result<(), CpuError> {
        let addr = self.regs.pc;
        let opcode = self.fetch_byte();
        self.dispatch = Dispatch {
            table,
            opcode,
            addr,
        };
        log(LogCategory::Cpu, LogLevel::Trace, || {
            format!("CPU: {} {:02X} @ {:04X}", table, opcode, addr)
        });
        let handler = self.tables.get(table, opcode);
        handler(self, opcode)
    }

    pub fn last_dispatch(&self) -> Dispatch {
        self.dispatch
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn fetch_byte(&mut self) -> u8 {
        let val = self.memory.read_byte(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        val
    }

    pub fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    /// High byte goes to the higher address.
    pub fn push_word(&mut self, val: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.memory.write_byte(self.regs.sp, (val >> 8) as u8);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.memory.write_byte(self.regs.sp, val as u8);
    }

    pub fn pop_word(&mut self) -> u16 {
        let lo = self.memory.read_byte(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = self.memory.read_byte(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        (hi << 8) | lo
    }

    /// 8-bit operand selected by a 3-bit register field; 6 is `(HL)`.
    pub(crate) fn read_operand(&self, field: u8) -> u8 {
        match Reg8::from_field(field) {
            Some(reg) => self.regs.get(reg),
            None => self.memory.read_byte(self.regs.hl()),
        }
    }

    pub(crate) fn write_operand(&mut self, field: u8, val: u8) {
        match Reg8::from_field(field) {
            Some(reg) => self.regs.set(reg, val),
            None => self.memory.write_byte(self.regs.hl(), val),
        }
    }

    /// State of the interrupt-enable latch written by EI/DI/RETI.
    pub fn interrupts_enabled(&self) -> bool {
        self.memory.read_byte(IME_LATCH) != 0
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            regs: self.regs,
            memory: self.memory.clone(),
            instructions: self.instructions,
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.regs = snapshot.regs;
        self.memory = snapshot.memory.clone();
        self.instructions = snapshot.instructions;
    }

    /// Register state as JSON for debugging. Memory is not included.
    pub fn save_state(&self) -> Value {
        serde_json::json!({
            "system": "sm83",
            "version": 1,
            "cpu": self.regs,
            "ime": self.interrupts_enabled(),
            "instructions": self.instructions,
        })
    }

    pub fn load_state(&mut self, v: &Value) -> Result<(), serde_json::Error> {
        if let Some(cpu_state) = v.get("cpu") {
            let regs: Registers = serde_json::from_value(cpu_state.clone())?;
            self.regs = regs;
            self.regs.set_af(regs.af());
        }
        if let Some(ime) = v.get("ime").and_then(|v| v.as_bool()) {
            self.memory.write_byte(IME_LATCH, ime as u8);
        }
        if let Some(count) = v.get("instructions").and_then(|v| v.as_u64()) {
            self.instructions = count;
        }
        Ok(())
    }
}

impl crate::Cpu for Sm83 {
    type Error = CpuError;

    fn reset(&mut self) {
        self.reset();
    }

    fn step(&mut self) -> Result<(), CpuError> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{CARRY, HALF_CARRY, SUBTRACT, ZERO};

    fn make_cpu(program: &[u8]) -> Sm83 {
        let mut memory = Memory::new();
        memory.load(0, program).unwrap();
        Sm83::new(memory)
    }

    #[test]
    fn test_fetch_advances_pc() {
        let mut cpu = make_cpu(&[0x34, 0x12, 0x56]);
        assert_eq!(cpu.fetch_word(), 0x1234);
        assert_eq!(cpu.regs.pc, 2);
        assert_eq!(cpu.fetch_byte(), 0x56);
        assert_eq!(cpu.regs.pc, 3);
    }

    #[test]
    fn test_fetch_wraps_pc() {
        let mut cpu = make_cpu(&[0xAB]);
        cpu.memory.write_byte(0xFFFF, 0xCD);
        cpu.regs.pc = 0xFFFF;
        assert_eq!(cpu.fetch_word(), 0xABCD);
        assert_eq!(cpu.regs.pc, 0x0001);
    }

    #[test]
    fn test_push_pop_byte_order() {
        let mut cpu = make_cpu(&[0x00]);
        cpu.regs.sp = 0xFFFE;
        cpu.push_word(0x1234);
        assert_eq!(cpu.regs.sp, 0xFFFC);
        assert_eq!(cpu.memory.read_byte(0xFFFD), 0x12);
        assert_eq!(cpu.memory.read_byte(0xFFFC), 0x34);
        assert_eq!(cpu.pop_word(), 0x1234);
        assert_eq!(cpu.regs.sp, 0xFFFE);
    }

    #[test]
    fn test_sp_wraps() {
        let mut cpu = make_cpu(&[0x00]);
        cpu.regs.sp = 0x0001;
        cpu.push_word(0xBEEF);
        assert_eq!(cpu.regs.sp, 0xFFFF);
        assert_eq!(cpu.memory.read_byte(0x0000), 0xBE);
        assert_eq!(cpu.memory.read_byte(0xFFFF), 0xEF);
        assert_eq!(cpu.pop_word(), 0xBEEF);
        assert_eq!(cpu.regs.sp, 0x0001);
    }

    #[test]
    fn test_step_counts_instructions() {
        let mut cpu = make_cpu(&[0x00, 0x00]);
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.instructions(), 2);
        assert_eq!(cpu.last_dispatch().addr, 1);
    }

    #[test]
    fn test_failed_step_not_counted() {
        let mut cpu = make_cpu(&[0xD3]);
        assert!(cpu.step().is_err());
        assert_eq!(cpu.instructions(), 0);
    }

    #[test]
    fn test_boot_scenario() {
        // LD A,$05 ; XOR A ; NOP
        let mut cpu = make_cpu(&[0x3E, 0x05, 0xAF]);
        for _ in 0..3 {
            cpu.step().unwrap();
        }
        assert_eq!(cpu.regs.a(), 0);
        assert!(cpu.regs.flag(ZERO));
        assert!(!cpu.regs.flag(SUBTRACT));
        assert!(!cpu.regs.flag(HALF_CARRY));
        assert!(!cpu.regs.flag(CARRY));
        assert_eq!(cpu.regs.pc, 4);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut cpu = make_cpu(&[0x3E, 0x77, 0xD3]);
        cpu.step().unwrap();
        let snapshot = cpu.snapshot();
        assert!(cpu.step().is_err());
        assert_eq!(cpu.regs.pc, 3);

        cpu.restore(&snapshot);
        assert_eq!(cpu.regs.pc, 2);
        assert_eq!(cpu.regs.a(), 0x77);
        assert_eq!(cpu.instructions(), 1);
        assert_eq!(snapshot.registers().a(), 0x77);
    }

    #[test]
    fn test_save_load_state_roundtrip() {
        let mut cpu = make_cpu(&[0x31, 0xFE, 0xFF, 0xFB]);
        cpu.regs.set_bc(0x1234);
        cpu.regs.set_af(0x56B0);
        cpu.step().unwrap();
        cpu.step().unwrap();
        let state = cpu.save_state();
        let text = serde_json::to_string(&state).expect("serialize");

        let mut other = make_cpu(&[0x00]);
        let parsed: Value = serde_json::from_str(&text).expect("deserialize");
        other.load_state(&parsed).unwrap();
        assert_eq!(other.regs, cpu.regs);
        assert_eq!(other.regs.sp, 0xFFFE);
        assert!(other.interrupts_enabled());
        assert_eq!(other.instructions(), 2);
    }

    #[test]
    fn test_load_state_rejects_bad_registers() {
        let mut cpu = make_cpu(&[0x00]);
        let bad = serde_json::json!({ "cpu": { "af": "nope" } });
        assert!(cpu.load_state(&bad).is_err());
    }

    #[test]
    fn test_reset_keeps_memory() {
        let mut cpu = make_cpu(&[0x3E, 0x01]);
        cpu.step().unwrap();
        crate::Cpu::reset(&mut cpu);
        assert_eq!(cpu.regs, Registers::new());
        assert_eq!(cpu.memory.read_byte(0), 0x3E);
        assert_eq!(cpu.instructions(), 0);
    }
}
