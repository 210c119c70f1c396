use crate::opcodes::Table;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("memory buffer must be {expected} bytes, got {actual}")]
    InvalidSize { expected: usize, actual: usize },
    #[error("image is empty")]
    EmptyImage,
    #[error("image of {len} bytes does not fit at {base:04X} ({available} bytes available)")]
    ImageTooLarge {
        base: u16,
        len: usize,
        available: usize,
    },
}

/// Fatal execution errors. There is no recoverable error inside an
/// instruction; hosts stop calling `step()` when one is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("Instruction not implemented: {opcode:02x} ({table} table, fetched at {addr:04X})")]
    UnimplementedOpcode { opcode: u8, addr: u16, table: Table },
}
