//! Faults raised while decoding and executing a program.
//!
//! Every variant of [`Error`] is fatal for the current run: the scheduler
//! stops itself and hands the error back to the caller.

use thiserror::Error;

/// Failure of [`OpCode::try_from`](crate::OpCode)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum DecodeError {
    /// Raw word `0x0000`, usually a sign of running past the loaded program
    #[error("empty opcode 0x0000")]
    Empty,
    /// No instruction shape matches the raw word
    #[error("unknown opcode {0:#06X}")]
    Unknown(u16),
}

impl DecodeError {
    /// Attach the program counter of the faulting fetch
    pub fn at(self, pc: u16) -> Error {
        match self {
            DecodeError::Empty => Error::EmptyOpcode { pc },
            DecodeError::Unknown(opcode) => Error::UnknownOpcode { opcode, pc },
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum Error {
    #[error("empty opcode 0x0000 at pc {pc:#05X}")]
    EmptyOpcode { pc: u16 },
    #[error("unknown opcode {opcode:#06X} at pc {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },
    #[error("machine code routine {opcode:#06X} at pc {pc:#05X} is not supported")]
    UnsupportedOperation { opcode: u16, pc: u16 },
    #[error("call stack overflow at pc {pc:#05X}")]
    StackOverflow { pc: u16 },
    #[error("return with empty call stack at pc {pc:#05X}")]
    StackUnderflow { pc: u16 },
}

impl Error {
    /// Program counter of the instruction that faulted
    pub fn pc(&self) -> u16 {
        match *self {
            Error::EmptyOpcode { pc }
            | Error::UnknownOpcode { pc, .. }
            | Error::UnsupportedOperation { pc, .. }
            | Error::StackOverflow { pc }
            | Error::StackUnderflow { pc } => pc,
        }
    }
}
