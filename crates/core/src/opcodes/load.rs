//! 8- and 16-bit loads. None of these touch the flags, except
//! `LD HL,SP+e8`, which lives with the ALU.

use super::{OpcodeTables, Table};
use crate::cpu::Sm83;
use crate::error::CpuError;
use crate::registers::{Reg16, Reg8};

const HIGH_PAGE: u16 = 0xFF00;

pub(super) fn register(t: &mut OpcodeTables) {
    t.fill(Table::Primary, [0x01, 0x11, 0x21, 0x31], ld_rr_n16);
    t.fill(Table::Primary, [0x02, 0x12, 0x22, 0x32], ld_indirect_a);
    t.fill(Table::Primary, [0x0A, 0x1A, 0x2A, 0x3A], ld_a_indirect);
    t.fill(Table::Primary, (0..8).map(|r| 0x06 | (r << 3)), ld_r_n8);
    t.fill(Table::Primary, (0x40..=0x7F).filter(|&op| op != 0x76), ld_r_r);
    t.set_primary(0x08, ld_a16_sp);
    t.set_primary(0xE0, ldh_a8_a);
    t.set_primary(0xF0, ldh_a_a8);
    t.set_primary(0xE2, ldh_c_a);
    t.set_primary(0xF2, ldh_a_c);
    t.set_primary(0xEA, ld_a16_a);
    t.set_primary(0xFA, ld_a_a16);
    t.set_primary(0xF9, ld_sp_hl);
}

/// LD BC/DE/HL/SP,n16
fn ld_rr_n16(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.fetch_word();
    cpu.regs.set16(Reg16::from_field(opcode >> 4), val);
    Ok(())
}

/// Address for the `(BC)`, `(DE)`, `(HL+)`, `(HL-)` forms. The HL variants
/// adjust HL after the address is taken.
fn indirect_addr(cpu: &mut Sm83, opcode: u8) -> u16 {
    match (opcode >> 4) & 0x03 {
        0 => cpu.regs.bc(),
        1 => cpu.regs.de(),
        2 => {
            let hl = cpu.regs.hl();
            cpu.regs.set_hl(hl.wrapping_add(1));
            hl
        }
        _ => {
            let hl = cpu.regs.hl();
            cpu.regs.set_hl(hl.wrapping_sub(1));
            hl
        }
    }
}

fn ld_indirect_a(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let addr = indirect_addr(cpu, opcode);
    cpu.memory.write_byte(addr, cpu.regs.a());
    Ok(())
}

fn ld_a_indirect(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let addr = indirect_addr(cpu, opcode);
    let val = cpu.memory.read_byte(addr);
    cpu.regs.set_a(val);
    Ok(())
}

/// LD r,n8 and LD (HL),n8
fn ld_r_n8(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.fetch_byte();
    cpu.write_operand(opcode >> 3, val);
    Ok(())
}

/// LD r,r' (0x40-0x7F, 0x76 is HALT)
fn ld_r_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.read_operand(opcode);
    cpu.write_operand(opcode >> 3, val);
    Ok(())
}

fn ld_a16_sp(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let addr = cpu.fetch_word();
    cpu.memory.write_word(addr, cpu.regs.sp);
    Ok(())
}

fn ldh_a8_a(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let offset = cpu.fetch_byte() as u16;
    cpu.memory.write_byte(HIGH_PAGE + offset, cpu.regs.a());
    Ok(())
}

fn ldh_a_a8(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let offset = cpu.fetch_byte() as u16;
    let val = cpu.memory.read_byte(HIGH_PAGE + offset);
    cpu.regs.set_a(val);
    Ok(())
}

fn ldh_c_a(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let addr = HIGH_PAGE + cpu.regs.get(Reg8::C) as u16;
    cpu.memory.write_byte(addr, cpu.regs.a());
    Ok(())
}

fn ldh_a_c(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let addr = HIGH_PAGE + cpu.regs.get(Reg8::C) as u16;
    let val = cpu.memory.read_byte(addr);
    cpu.regs.set_a(val);
    Ok(())
}

fn ld_a16_a(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let addr = cpu.fetch_word();
    cpu.memory.write_byte(addr, cpu.regs.a());
    Ok(())
}

fn ld_a_a16(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let addr = cpu.fetch_word();
    let val = cpu.memory.read_byte(addr);
    cpu.regs.set_a(val);
    Ok(())
}

fn ld_sp_hl(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.sp = cpu.regs.hl();
    Ok(())
}
