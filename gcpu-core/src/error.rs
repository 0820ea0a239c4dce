use thiserror::Error;

/// Faults raised while executing instructions or touching memory at runtime.
/// Any of these ends the current execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("address ${0:04X} is outside of physical memory")]
    OutOfBounds(usize),

    #[error("write to read-only address ${0:04X}")]
    ReadOnlyViolation(usize),

    #[error("unknown instruction ${opcode:02X} at PC ${pc:04X}")]
    UnknownInstruction { opcode: u8, pc: u16 },
}

/// Failures while reading memory images or debug records from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed file at line {line}: {text}")]
    MalformedFile { line: usize, text: String },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}
