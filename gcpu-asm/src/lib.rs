pub mod assembler;
pub mod error;
pub mod grammar;
pub mod output;
pub mod preproc;

pub use assembler::{assemble, Assembly, Diagnostic};
pub use error::AsmError;
