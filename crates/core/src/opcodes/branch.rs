//! Jumps. Calls and returns are in `stack`.

use super::{OpcodeTables, Table};
use crate::cpu::Sm83;
use crate::error::CpuError;
use crate::flags::{CARRY, ZERO};

pub(super) fn register(t: &mut OpcodeTables) {
    t.set_primary(0x18, jr);
    t.fill(Table::Primary, [0x20, 0x28, 0x30, 0x38], jr_cc);
    t.set_primary(0xC3, jp);
    t.fill(Table::Primary, [0xC2, 0xCA, 0xD2, 0xDA], jp_cc);
    t.set_primary(0xE9, jp_hl);
}

/// Condition field at bits 3-4: NZ, Z, NC, C.
pub(super) fn condition(cpu: &Sm83, opcode: u8) -> bool {
    match (opcode >> 3) & 0x03 {
        0 => !cpu.regs.flag(ZERO),
        1 => cpu.regs.flag(ZERO),
        2 => !cpu.regs.flag(CARRY),
        _ => cpu.regs.flag(CARRY),
    }
}

/// The displacement is relative to the byte after the operand.
fn relative_jump(cpu: &mut Sm83, taken: bool) {
    let offset = cpu.fetch_byte() as i8;
    if taken {
        cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
    }
}

fn jr(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    relative_jump(cpu, true);
    Ok(())
}

fn jr_cc(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let taken = condition(cpu, opcode);
    relative_jump(cpu, taken);
    Ok(())
}

fn jp(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.pc = cpu.fetch_word();
    Ok(())
}

fn jp_cc(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let target = cpu.fetch_word();
    if condition(cpu, opcode) {
        cpu.regs.pc = target;
    }
    Ok(())
}

fn jp_hl(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.pc = cpu.regs.hl();
    Ok(())
}
