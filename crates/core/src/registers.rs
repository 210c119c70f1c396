//! SM83 register file.
//!
//! The four general pairs (AF, BC, DE, HL) are stored as 16-bit values and
//! exposed through 8-bit views. SP and PC are plain 16-bit registers.

use serde::{Deserialize, Serialize};

/// 8-bit register views, in the order the opcode register field encodes
/// them (with `F` appended; field value 6 means `(HL)` and has no variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
    F,
}

impl Reg8 {
    /// Decode a 3-bit register field. Returns `None` for 6, which selects
    /// the memory operand `(HL)`.
    pub fn from_field(field: u8) -> Option<Self> {
        match field & 0x07 {
            0 => Some(Reg8::B),
            1 => Some(Reg8::C),
            2 => Some(Reg8::D),
            3 => Some(Reg8::E),
            4 => Some(Reg8::H),
            5 => Some(Reg8::L),
            6 => None,
            _ => Some(Reg8::A),
        }
    }
}

/// 16-bit pairs addressed by the `rr` field of loads and 16-bit arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    BC,
    DE,
    HL,
    SP,
}

impl Reg16 {
    pub fn from_field(field: u8) -> Self {
        match field & 0x03 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ => Reg16::SP,
        }
    }
}

/// 16-bit pairs addressed by PUSH/POP, where field 3 means AF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPair {
    BC,
    DE,
    HL,
    AF,
}

impl StackPair {
    pub fn from_field(field: u8) -> Self {
        match field & 0x03 {
            0 => StackPair::BC,
            1 => StackPair::DE,
            2 => StackPair::HL,
            _ => StackPair::AF,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub(crate) af: u16,
    pub(crate) bc: u16,
    pub(crate) de: u16,
    pub(crate) hl: u16,
    pub sp: u16,
    pub pc: u16,
}

#[inline]
fn high(pair: u16) -> u8 {
    (pair >> 8) as u8
}

#[inline]
fn low(pair: u16) -> u8 {
    pair as u8
}

#[inline]
fn with_high(pair: u16, val: u8) -> u16 {
    (pair & 0x00FF) | ((val as u16) << 8)
}

#[inline]
fn with_low(pair: u16, val: u8) -> u16 {
    (pair & 0xFF00) | val as u16
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn af(&self) -> u16 {
        self.af
    }

    /// Write AF. The low nibble of F does not exist in hardware and always
    /// reads back as zero.
    pub fn set_af(&mut self, val: u16) {
        self.af = val & 0xFFF0;
    }

    pub fn bc(&self) -> u16 {
        self.bc
    }

    pub fn set_bc(&mut self, val: u16) {
        self.bc = val;
    }

    pub fn de(&self) -> u16 {
        self.de
    }

    pub fn set_de(&mut self, val: u16) {
        self.de = val;
    }

    pub fn hl(&self) -> u16 {
        self.hl
    }

    pub fn set_hl(&mut self, val: u16) {
        self.hl = val;
    }

    pub fn get(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => high(self.af),
            Reg8::F => low(self.af),
            Reg8::B => high(self.bc),
            Reg8::C => low(self.bc),
            Reg8::D => high(self.de),
            Reg8::E => low(self.de),
            Reg8::H => high(self.hl),
            Reg8::L => low(self.hl),
        }
    }

    pub fn set(&mut self, reg: Reg8, val: u8) {
        match reg {
            Reg8::A => self.af = with_high(self.af, val),
            Reg8::F => self.af = with_low(self.af, val & 0xF0),
            Reg8::B => self.bc = with_high(self.bc, val),
            Reg8::C => self.bc = with_low(self.bc, val),
            Reg8::D => self.de = with_high(self.de, val),
            Reg8::E => self.de = with_low(self.de, val),
            Reg8::H => self.hl = with_high(self.hl, val),
            Reg8::L => self.hl = with_low(self.hl, val),
        }
    }

    pub fn a(&self) -> u8 {
        self.get(Reg8::A)
    }

    pub fn set_a(&mut self, val: u8) {
        self.set(Reg8::A, val);
    }

    pub fn f(&self) -> u8 {
        self.get(Reg8::F)
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::BC => self.bc,
            Reg16::DE => self.de,
            Reg16::HL => self.hl,
            Reg16::SP => self.sp,
        }
    }

    pub fn set16(&mut self, reg: Reg16, val: u16) {
        match reg {
            Reg16::BC => self.bc = val,
            Reg16::DE => self.de = val,
            Reg16::HL => self.hl = val,
            Reg16::SP => self.sp = val,
        }
    }

    pub fn get_stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.bc,
            StackPair::DE => self.de,
            StackPair::HL => self.hl,
            StackPair::AF => self.af,
        }
    }

    pub fn set_stack_pair(&mut self, pair: StackPair, val: u16) {
        match pair {
            StackPair::BC => self.bc = val,
            StackPair::DE => self.de = val,
            StackPair::HL => self.hl = val,
            StackPair::AF => self.set_af(val),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: [(Reg8, Reg8); 3] = [(Reg8::B, Reg8::C), (Reg8::D, Reg8::E), (Reg8::H, Reg8::L)];

    #[test]
    fn test_high_write_keeps_low() {
        for (hi, lo) in PAIRS {
            let mut regs = Registers::new();
            regs.set(lo, 0x5A);
            regs.set(hi, 0xC3);
            assert_eq!(regs.get(lo), 0x5A, "{:?} clobbered by {:?}", lo, hi);
            assert_eq!(regs.get(hi), 0xC3);
        }
    }

    #[test]
    fn test_low_write_keeps_high() {
        for (hi, lo) in PAIRS {
            let mut regs = Registers::new();
            regs.set(hi, 0x12);
            regs.set(lo, 0xFE);
            assert_eq!(regs.get(hi), 0x12, "{:?} clobbered by {:?}", hi, lo);
            assert_eq!(regs.get(lo), 0xFE);
        }
    }

    #[test]
    fn test_accumulator_keeps_flags() {
        let mut regs = Registers::new();
        regs.set_af(0x00B0);
        regs.set_a(0x42);
        assert_eq!(regs.af(), 0x42B0);
        regs.set(Reg8::F, 0x80);
        assert_eq!(regs.a(), 0x42);
    }

    #[test]
    fn test_pair_views() {
        let mut regs = Registers::new();
        regs.set_bc(0x1234);
        assert_eq!(regs.get(Reg8::B), 0x12);
        assert_eq!(regs.get(Reg8::C), 0x34);
        regs.set_de(0xBEEF);
        assert_eq!(regs.get(Reg8::D), 0xBE);
        assert_eq!(regs.get(Reg8::E), 0xEF);
        regs.set_hl(0x8000);
        assert_eq!(regs.get(Reg8::H), 0x80);
        assert_eq!(regs.get(Reg8::L), 0x00);
    }

    #[test]
    fn test_af_low_nibble_reads_zero() {
        let mut regs = Registers::new();
        regs.set_af(0x12FF);
        assert_eq!(regs.af(), 0x12F0);
        regs.set_stack_pair(StackPair::AF, 0xFFFF);
        assert_eq!(regs.f(), 0xF0);
    }

    #[test]
    fn test_field_decoding() {
        assert_eq!(Reg8::from_field(0), Some(Reg8::B));
        assert_eq!(Reg8::from_field(6), None);
        assert_eq!(Reg8::from_field(7), Some(Reg8::A));
        assert_eq!(Reg16::from_field(3), Reg16::SP);
        assert_eq!(StackPair::from_field(3), StackPair::AF);
    }
}
