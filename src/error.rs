use thiserror::Error;

/// Everything that can stop the instruction stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("memory access out of range at address {address:#06x}")]
    AddressOutOfRange { address: usize },

    #[error("stack overflow: more than 16 nested calls")]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {0:#06x}")]
    UnknownOpcode(u16),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
