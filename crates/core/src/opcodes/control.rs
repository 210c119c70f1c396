use super::{OpcodeTables, Table};
use crate::cpu::Sm83;
use crate::error::CpuError;
use crate::logging::{log, LogCategory, LogLevel};

/// Interrupt-enable latch. Only the write side is modelled; nothing delivers
/// interrupts.
pub const IME_LATCH: u16 = 0xFFFF;

pub(super) fn register(t: &mut OpcodeTables) {
    t.set_primary(0x00, nop);
    t.set_primary(0x10, stop);
    t.fill(Table::Primary, [0xF3, 0xFB], set_ime);
}

fn nop(_cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    Ok(())
}

/// STOP is encoded with a padding byte, which is skipped.
fn stop(cpu: &mut Sm83, _opcode: u8) -> Result<(), CpuError> {
    cpu.fetch_byte();
    Ok(())
}

/// DI (0xF3) / EI (0xFB)
fn set_ime(cpu: &mut Sm83, opcode: u8) -> Result<(), CpuError> {
    let enable = opcode == 0xFB;
    write_latch(cpu, enable);
    Ok(())
}

pub(super) fn write_latch(cpu: &mut Sm83, enable: bool) {
    log(LogCategory::Interrupts, LogLevel::Debug, || {
        format!(
            "CPU: IME {} at PC={:04X}",
            if enable { "enabled" } else { "disabled" },
            cpu.regs.pc
        )
    });
    cpu.memory.write_byte(IME_LATCH, enable as u8);
}
