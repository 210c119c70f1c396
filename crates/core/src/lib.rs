//! Sharp SM83 (Game Boy) instruction interpreter.
//!
//! The machine is a register file, a flat 64 KiB memory and two opcode
//! dispatch tables. Nothing else is emulated: no video, audio, timers or
//! interrupt delivery.
//!
//! ```rust
//! use sm83_core::{Memory, Sm83};
//!
//! let mut memory = Memory::new();
//! memory.load(0, &[0x3E, 0x05, 0xAF]).unwrap(); // LD A,$05 ; XOR A
//! let mut cpu = Sm83::new(memory);
//! cpu.step().unwrap();
//! cpu.step().unwrap();
//! assert_eq!(cpu.regs.a(), 0);
//! ```

pub mod cpu;
pub mod error;
pub mod flags;
pub mod logging;
pub mod memory;
pub mod opcodes;
pub mod registers;

pub use cpu::{Dispatch, Sm83, Snapshot};
pub use error::{CpuError, MemoryError};
pub use memory::Memory;
pub use opcodes::{Handler, OpcodeTables, Table};
pub use registers::{Reg16, Reg8, Registers, StackPair};

/// A CPU that can be stepped one instruction at a time.
///
/// `step` returning an error is fatal for the host: the CPU state is left
/// at the failing fetch and further steps are not meaningful.
pub trait Cpu {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Back to power-on register state.
    fn reset(&mut self);

    fn step(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<C: Cpu>(cpu: &mut C, steps: usize) -> Result<usize, C::Error> {
        for _ in 0..steps {
            cpu.step()?;
        }
        Ok(steps)
    }

    #[test]
    fn test_cpu_trait_drives_sm83() {
        let mut memory = Memory::new();
        memory.load(0, &[0x06, 0x01, 0x04, 0xD3]).unwrap();
        let mut cpu = Sm83::new(memory);

        assert_eq!(run(&mut cpu, 2), Ok(2));
        assert_eq!(cpu.regs.get(Reg8::B), 0x02);

        let err = run(&mut cpu, 1).unwrap_err();
        assert!(matches!(err, CpuError::UnimplementedOpcode { opcode: 0xD3, addr: 0x0003, .. }));
    }

    #[test]
    fn test_cpu_trait_reset() {
        let mut memory = Memory::new();
        memory.load(0, &[0x00]).unwrap();
        let mut cpu = Sm83::new(memory);
        cpu.step().unwrap();
        Cpu::reset(&mut cpu);
        assert_eq!(cpu.regs.pc, 0);
    }
}
