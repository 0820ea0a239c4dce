pub mod command;
pub mod debugger;
pub mod error;
pub mod registry;
pub mod session;

pub use command::Command;
pub use debugger::Debugger;
pub use error::DebugError;
