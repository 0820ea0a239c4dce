use thiserror::Error;

use gcpu_core::LoadError;

/// Errors raised by debugger commands. The REPL reports them and keeps going;
/// only `Io` on the console itself ends a session.
#[derive(Debug, Error)]
pub enum DebugError {
    #[error("no symbol named `{0}`")]
    UnresolvedSymbol(String),

    #[error("no instruction recorded for source line {0}")]
    UnknownLine(u32),

    #[error("no {kind} with id {id}")]
    InvalidId { kind: &'static str, id: usize },

    #[error("address ${0:X} is outside of the address space")]
    InvalidAddress(u32),

    #[error("session file: {0}")]
    Session(#[from] LoadError),

    #[error("console i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command not recognized: `{0}`")]
    NotRecognized(String),
}
