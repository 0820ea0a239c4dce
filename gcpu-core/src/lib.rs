pub mod clock;
pub mod consts;
pub mod cpu;
pub mod disasm;
pub mod error;
pub mod instr;
pub mod io;
pub mod mem;
pub mod symbols;
pub mod utils;

pub use cpu::GCpu;
pub use error::{CpuError, LoadError};
pub use mem::MemoryImage;
pub use symbols::DebugInfo;
