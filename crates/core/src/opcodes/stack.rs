use super::branch::condition;
use super::control::write_latch;
use super::{OpcodeTables, Table};
use crate::cpu::Sm83;
use crate::error::CpuError;
use crate::registers::StackPair;

pub(super) fn register(t: &mut OpcodeTables) {
    t.fill(Table::Primary, [0xC5, 0xD5, 0xE5, 0xF5], push);
    t.fill(Table::Primary, [0xC1, 0xD1, 0xE1, 0xF1], pop);
    t.set_primary(0xCD, call);
    t.fill(Table::Primary, [0xC4, 0xCC, 0xD4, 0xDC], call_cc);
    t.set_primary(0xC9, ret);
    t.fill(Table::Primary, [0xC0, 0xC8, 0xD0, 0xD8], ret_cc);
    t.set_primary(0xD9, reti);
    t.fill(Table::Primary, (0..8).map(|n| 0xC7 | (n << 3)), rst);
}

fn push(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.regs.get_stack_pair(StackPair::from_field(opcode >> 4));
    cpu.push_word(val);
    Ok(())
}

/// POP AF drops the low nibble of F.
fn pop(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.pop_word();
    cpu.regs.set_stack_pair(StackPair::from_field(opcode >> 4), val);
    Ok(())
}

fn call_to(cpu: &mut Sm83, target: u16) {
    cpu.push_word(cpu.regs.pc);
    cpu.regs.pc = target;
}

fn call(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let target = cpu.fetch_word();
    call_to(cpu, target);
    Ok(())
}

fn call_cc(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let target = cpu.fetch_word();
    if condition(cpu, opcode) {
        call_to(cpu, target);
    }
    Ok(())
}

fn ret(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.pc = cpu.pop_word();
    Ok(())
}

fn ret_cc(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    if condition(cpu, opcode) {
        cpu.regs.pc = cpu.pop_word();
    }
    Ok(())
}

fn reti(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.pc = cpu.pop_word();
    write_latch(cpu, true);
    Ok(())
}

/// RST n: call to `opcode & 0x38`.
fn rst(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    call_to(cpu, (opcode & 0x38) as u16);
    Ok(())
}
