//! Opcode dispatch tables.
//!
//! Two 256-entry tables of handler functions: the primary table, indexed by
//! the first opcode byte, and the prefixed table, reached only through the
//! `0xCB` escape entry of the primary table. Every slot starts out on
//! [`not_implemented`] so gaps in coverage stop execution instead of doing
//! something plausible but wrong.
//!
//! Handlers receive the opcode byte they were dispatched for, which lets one
//! handler serve a whole register-field family (`LD r,r'`, `BIT n,r`, ...).

mod alu;
mod bit;
mod branch;
mod control;
mod load;
mod stack;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cpu::{Dispatch, Sm83};
use crate::error::CpuError;
use crate::logging::{log, LogCategory, LogLevel};

pub use control::IME_LATCH;

/// Escape byte selecting the prefixed table for the next fetch.
pub const PREFIX_OPCODE: u8 = 0xCB;

pub type Handler = fn(&mut Sm83, u8) -> Result<(), CpuError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Primary,
    Prefixed,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Primary => write!(f, "primary"),
            Table::Prefixed => write!(f, "prefixed"),
        }
    }
}

#[derive(Clone)]
pub struct OpcodeTables {
    primary: [Handler; 256],
    prefixed: [Handler; 256],
}

impl fmt::Debug for OpcodeTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpcodeTables").finish_non_exhaustive()
    }
}

impl Default for OpcodeTables {
    fn default() -> Self {
        Self::sm83()
    }
}

impl OpcodeTables {
    /// Tables with no instructions except the prefix escape.
    pub fn empty() -> Self {
        let mut tables = Self {
            primary: [not_implemented as Handler; 256],
            prefixed: [not_implemented as Handler; 256],
        };
        tables.primary[PREFIX_OPCODE as usize] = prefix;
        tables
    }

    /// The documented SM83 instruction set.
    pub fn sm83() -> Self {
        let mut tables = Self::empty();
        control::register(&mut tables);
        load::register(&mut tables);
        alu::register(&mut tables);
        bit::register(&mut tables);
        branch::register(&mut tables);
        stack::register(&mut tables);
        tables
    }

    pub fn set_primary(&mut self, opcode: u8, handler: Handler) {
        self.primary[opcode as usize] = handler;
    }

    pub fn set_prefixed(&mut self, opcode: u8, handler: Handler) {
        self.prefixed[opcode as usize] = handler;
    }

    /// Install `handler` on every opcode of `opcodes` in `table`.
    pub(crate) fn fill<I>(&mut self, table: Table, opcodes: I, handler: Handler)
    where
        I: IntoIterator<Item = u8>,
    {
        for opcode in opcodes {
            match table {
                Table::Primary => self.set_primary(opcode, handler),
                Table::Prefixed => self.set_prefixed(opcode, handler),
            }
        }
    }

    #[inline]
    pub fn get(&self, table: Table, opcode: u8) -> Handler {
        match table {
            Table::Primary => self.primary[opcode as usize],
            Table::Prefixed => self.prefixed[opcode as usize],
        }
    }
}

/// Default entry of every unassigned slot. Execution must stop here: the
/// error names the opcode, the table it was looked up in and the address it
/// was fetched from.
pub fn not_implemented(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let Dispatch { table, addr, .. } = cpu.last_dispatch();
    log(LogCategory::Stubs, LogLevel::Error, || {
        format!("CPU: {} opcode {:02X} at {:04X} has no handler", table, opcode, addr)
    });
    Err(CpuError::UnimplementedOpcode {
        opcode,
        addr,
        table,
    })
}

/// The `0xCB` escape: one nested dispatch through the prefixed table.
fn prefix(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.dispatch(Table::Prefixed)
}
