//! Arithmetic and logic: 8-bit ALU ops on A, INC/DEC, 16-bit adds, and the
//! accumulator adjust instructions.

use super::{OpcodeTables, Table};
use crate::cpu::Sm83;
use crate::error::CpuError;
use crate::flags::{flag_if, ALL, CARRY, HALF_CARRY, SUBTRACT, ZERO};
use crate::registers::{Reg16, Reg8};

pub(super) fn register(t: &mut OpcodeTables) {
    t.fill(Table::Primary, (0..8).map(|r| 0x04 | (r << 3)), inc_r);
    t.fill(Table::Primary, (0..8).map(|r| 0x05 | (r << 3)), dec_r);
    t.fill(Table::Primary, [0x03, 0x13, 0x23, 0x33], inc_rr);
    t.fill(Table::Primary, [0x0B, 0x1B, 0x2B, 0x3B], dec_rr);
    t.fill(Table::Primary, [0x09, 0x19, 0x29, 0x39], add_hl_rr);
    t.fill(Table::Primary, 0x80..=0xBF, alu_a_r);
    t.fill(Table::Primary, (0..8).map(|op| 0xC6 | (op << 3)), alu_a_n8);
    t.set_primary(0x27, daa);
    t.set_primary(0x2F, cpl);
    t.set_primary(0x37, scf);
    t.set_primary(0x3F, ccf);
    t.set_primary(0xE8, add_sp_e8);
    t.set_primary(0xF8, ld_hl_sp_e8);
}

/// INC r / INC (HL). Carry is not affected.
fn inc_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let field = opcode >> 3;
    let val = cpu.read_operand(field);
    let result = val.wrapping_add(1);
    cpu.regs.update_flags(
        ZERO | SUBTRACT | HALF_CARRY,
        flag_if(ZERO, result == 0) | flag_if(HALF_CARRY, (val & 0x0F) == 0x0F),
    );
    cpu.write_operand(field, result);
    Ok(())
}

/// DEC r / DEC (HL). Carry is not affected.
fn dec_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let field = opcode >> 3;
    let val = cpu.read_operand(field);
    let result = val.wrapping_sub(1);
    cpu.regs.update_flags(
        ZERO | SUBTRACT | HALF_CARRY,
        flag_if(ZERO, result == 0) | SUBTRACT | flag_if(HALF_CARRY, (val & 0x0F) == 0),
    );
    cpu.write_operand(field, result);
    Ok(())
}

fn inc_rr(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let reg = Reg16::from_field(opcode >> 4);
    cpu.regs.set16(reg, cpu.regs.get16(reg).wrapping_add(1));
    Ok(())
}

fn dec_rr(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let reg = Reg16::from_field(opcode >> 4);
    cpu.regs.set16(reg, cpu.regs.get16(reg).wrapping_sub(1));
    Ok(())
}

/// ADD HL,rr: H from bit 11, C from bit 15, Z untouched.
fn add_hl_rr(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let hl = cpu.regs.hl();
    let val = cpu.regs.get16(Reg16::from_field(opcode >> 4));
    let (result, carry) = hl.overflowing_add(val);
    cpu.regs.update_flags(
        SUBTRACT | HALF_CARRY | CARRY,
        flag_if(HALF_CARRY, (hl & 0x0FFF) + (val & 0x0FFF) > 0x0FFF) | flag_if(CARRY, carry),
    );
    cpu.regs.set_hl(result);
    Ok(())
}

/// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,r (0x80-0xBF)
fn alu_a_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.read_operand(opcode);
    alu(cpu, opcode >> 3, val);
    Ok(())
}

/// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,n8
fn alu_a_n8(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.fetch_byte();
    alu(cpu, opcode >> 3, val);
    Ok(())
}

fn alu(cpu: &mut Sm83, op: u8, val: u8) {
    let a = cpu.regs.a();
    let carry_in = cpu.regs.carry() as u8;
    let (result, flags) = match op & 0x07 {
        0 => add(a, val, 0),
        1 => add(a, val, carry_in),
        2 => sub(a, val, 0),
        3 => sub(a, val, carry_in),
        4 => {
            let r = a & val;
            (r, flag_if(ZERO, r == 0) | HALF_CARRY)
        }
        5 => {
            let r = a ^ val;
            (r, flag_if(ZERO, r == 0))
        }
        6 => {
            let r = a | val;
            (r, flag_if(ZERO, r == 0))
        }
        _ => {
            // CP only sets flags
            let (_, flags) = sub(a, val, 0);
            (a, flags)
        }
    };
    cpu.regs.set_a(result);
    cpu.regs.update_flags(ALL, flags);
}

fn add(a: u8, val: u8, carry: u8) -> (u8, u8) {
    let sum = a as u16 + val as u16 + carry as u16;
    let result = sum as u8;
    let flags = flag_if(ZERO, result == 0)
        | flag_if(HALF_CARRY, (a & 0x0F) + (val & 0x0F) + carry > 0x0F)
        | flag_if(CARRY, sum > 0xFF);
    (result, flags)
}

fn sub(a: u8, val: u8, carry: u8) -> (u8, u8) {
    let result = a.wrapping_sub(val).wrapping_sub(carry);
    let flags = flag_if(ZERO, result == 0)
        | SUBTRACT
        | flag_if(HALF_CARRY, (a & 0x0F) < (val & 0x0F) + carry)
        | flag_if(CARRY, (a as u16) < val as u16 + carry as u16);
    (result, flags)
}

/// Decimal adjust after a BCD add or subtract.
fn daa(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let mut a = cpu.regs.a();
    let mut carry = cpu.regs.carry();
    if cpu.regs.subtract() {
        if carry {
            a = a.wrapping_sub(0x60);
        }
        if cpu.regs.half_carry() {
            a = a.wrapping_sub(0x06);
        }
    } else {
        if carry || a > 0x99 {
            a = a.wrapping_add(0x60);
            carry = true;
        }
        if cpu.regs.half_carry() || (a & 0x0F) > 0x09 {
            a = a.wrapping_add(0x06);
        }
    }
    cpu.regs.set_a(a);
    cpu.regs.update_flags(
        ZERO | HALF_CARRY | CARRY,
        flag_if(ZERO, a == 0) | flag_if(CARRY, carry),
    );
    Ok(())
}

fn cpl(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.set_a(!cpu.regs.a());
    cpu.regs.update_flags(SUBTRACT | HALF_CARRY, SUBTRACT | HALF_CARRY);
    Ok(())
}

fn scf(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.update_flags(SUBTRACT | HALF_CARRY | CARRY, CARRY);
    Ok(())
}

fn ccf(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let carry = !cpu.regs.carry();
    cpu.regs.update_flags(SUBTRACT | HALF_CARRY | CARRY, flag_if(CARRY, carry));
    Ok(())
}

/// SP plus a signed offset. H and C come from the unsigned low-byte add;
/// Z and N are cleared.
fn sp_plus_e8(cpu: &mut Sm83) -> u16 {
    let sp = cpu.regs.sp;
    let offset = cpu.fetch_byte() as i8 as i16 as u16;
    cpu.regs.update_flags(
        ALL,
        flag_if(HALF_CARRY, (sp & 0x000F) + (offset & 0x000F) > 0x000F)
            | flag_if(CARRY, (sp & 0x00FF) + (offset & 0x00FF) > 0x00FF),
    );
    sp.wrapping_add(offset)
}

fn add_sp_e8(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.regs.sp = sp_plus_e8(cpu);
    Ok(())
}

fn ld_hl_sp_e8(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    let val = sp_plus_e8(cpu);
    cpu.regs.set_hl(val);
    Ok(())
}
