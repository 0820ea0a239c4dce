use thiserror::Error;

/// Fatal assembly errors. Any of these aborts the run and no output is
/// written. Line numbers are 1-based positions in the original source.
#[derive(Debug, Error)]
pub enum AsmError {
    #[error("line {line}: unknown instruction `{text}`")]
    UnknownInstruction { line: usize, text: String },

    #[error("line {line}: address ${addr:04X} already defined in memory")]
    DuplicateDefinition { line: usize, addr: u32 },

    #[error("line {line}: label `{text}` is not followed by an instruction")]
    DanglingLabel { line: usize, text: String },

    #[error("line {line}: invalid operand `{text}`")]
    InvalidOperand { line: usize, text: String },

    #[error("line {line}: undefined symbol `{name}`")]
    UndefinedSymbol { line: usize, name: String },

    #[error("line {line}: address ${addr:04X} is outside of physical memory")]
    AddressOutOfRange { line: usize, addr: u32 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to encode debug info: {0}")]
    Json(#[from] serde_json::Error),
}
