//! Flag codec for the F register.
//!
//! Every flag-producing instruction goes through [`Registers::update_flags`],
//! naming only the flags it defines. Flags outside the mask are left alone.

use crate::registers::{Reg8, Registers};

// Flag bit positions (in F register)
pub const ZERO: u8 = 0b1000_0000;
pub const SUBTRACT: u8 = 0b0100_0000;
pub const HALF_CARRY: u8 = 0b0010_0000;
pub const CARRY: u8 = 0b0001_0000;
pub const ALL: u8 = ZERO | SUBTRACT | HALF_CARRY | CARRY;

/// `flag` when `cond` holds, zero otherwise.
#[inline]
pub const fn flag_if(flag: u8, cond: bool) -> u8 {
    if cond {
        flag
    } else {
        0
    }
}

impl Registers {
    /// Replace the flags selected by `mask` with the matching bits of
    /// `values`. Bits of `values` outside `mask` are ignored.
    pub fn update_flags(&mut self, mask: u8, values: u8) {
        let mask = mask & ALL;
        let f = (self.f() & !mask) | (values & mask);
        self.set(Reg8::F, f);
    }

    pub fn flag(&self, flag: u8) -> bool {
        self.f() & flag != 0
    }

    /// Single flag as 0 or 1.
    pub fn flag_bit(&self, flag: u8) -> u8 {
        self.flag(flag) as u8
    }

    pub fn zero(&self) -> bool {
        self.flag(ZERO)
    }

    pub fn subtract(&self) -> bool {
        self.flag(SUBTRACT)
    }

    pub fn half_carry(&self) -> bool {
        self.flag(HALF_CARRY)
    }

    pub fn carry(&self) -> bool {
        self.flag(CARRY)
    }
}
