//! Error types, one per failure class, so callers can tell a bad operand from a bad
//! mnemonic, and an undecodable binary from a bad memory access.

mod assembly;
mod bytecode;
mod vm;

pub use assembly::{AssemblyError, ParseError};
pub use bytecode::{DecodeError, FieldError, ValidationError};
pub use vm::VmError;
