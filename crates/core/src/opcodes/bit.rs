//! Rotates, shifts and single-bit operations: the accumulator rotates of the
//! primary table and the whole `0xCB`-prefixed table.

use super::{OpcodeTables, Table};
use crate::cpu::Sm83;
use crate::error::CpuError;
use crate::flags::{flag_if, ALL, CARRY, HALF_CARRY, SUBTRACT, ZERO};

pub(super) fn register(t: &mut OpcodeTables) {
    t.fill(Table::Primary, [0x07, 0x0F, 0x17, 0x1F], rotate_a);
    t.fill(Table::Prefixed, 0x00..=0x3F, shift_r);
    t.fill(Table::Prefixed, 0x40..=0x7F, bit_n_r);
    t.fill(Table::Prefixed, 0x80..=0xBF, res_n_r);
    t.fill(Table::Prefixed, 0xC0..=0xFF, set_n_r);
}

/// Rotate/shift kinds in opcode-field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl Shift {
    fn from_field(field: u8) -> Self {
        match field & 0x07 {
            0 => Shift::Rlc,
            1 => Shift::Rrc,
            2 => Shift::Rl,
            3 => Shift::Rr,
            4 => Shift::Sla,
            5 => Shift::Sra,
            6 => Shift::Swap,
            _ => Shift::Srl,
        }
    }

    /// Returns the result and the bit shifted out (the new carry).
    fn apply(self, val: u8, carry_in: bool) -> (u8, bool) {
        match self {
            Shift::Rlc => (val.rotate_left(1), val & 0x80 != 0),
            Shift::Rrc => (val.rotate_right(1), val & 0x01 != 0),
            Shift::Rl => ((val << 1) | carry_in as u8, val & 0x80 != 0),
            Shift::Rr => ((val >> 1) | ((carry_in as u8) << 7), val & 0x01 != 0),
            Shift::Sla => (val << 1, val & 0x80 != 0),
            Shift::Sra => ((val >> 1) | (val & 0x80), val & 0x01 != 0),
            Shift::Swap => (val.rotate_left(4), false),
            Shift::Srl => (val >> 1, val & 0x01 != 0),
        }
    }
}

/// RLCA / RRCA / RLA / RRA. Unlike the prefixed forms these always clear Z.
fn rotate_a(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let (result, carry) = Shift::from_field(opcode >> 3).apply(cpu.regs.a(), cpu.regs.carry());
    cpu.regs.set_a(result);
    cpu.regs.update_flags(ALL, flag_if(CARRY, carry));
    Ok(())
}

/// RLC RRC RL RR SLA SRA SWAP SRL on r or (HL)
fn shift_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let val = cpu.read_operand(opcode);
    let (result, carry) = Shift::from_field(opcode >> 3).apply(val, cpu.regs.carry());
    cpu.regs
        .update_flags(ALL, flag_if(ZERO, result == 0) | flag_if(CARRY, carry));
    cpu.write_operand(opcode, result);
    Ok(())
}

/// BIT n,r: Z is set when the tested bit is clear.
fn bit_n_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let bit = (opcode >> 3) & 0x07;
    let val = cpu.read_operand(opcode);
    let is_clear = val & (1 << bit) == 0;
    cpu.regs.update_flags(
        ZERO | SUBTRACT | HALF_CARRY,
        flag_if(ZERO, is_clear) | HALF_CARRY,
    );
    Ok(())
}

fn res_n_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let bit = (opcode >> 3) & 0x07;
    let val = cpu.read_operand(opcode);
    cpu.write_operand(opcode, val & !(1 << bit));
    Ok(())
}

fn set_n_r(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let bit = (opcode >> 3) & 0x07;
    let val = cpu.read_operand(opcode);
    cpu.write_operand(opcode, val | (1 << bit));
    Ok(())
}
