use thiserror::Error;

use super::ValidationError;
use crate::bytecode::Opcode;

/// A line of assembly that cannot be resolved to an instruction.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
  #[error("{0} is not an operation.")]
  UnknownMnemonic(String),

  #[error("{opcode} requires {expected} arguments but was given {given}.")]
  WrongArity {
    opcode   : Opcode,
    expected : usize,
    given    : usize,
  },

  #[error("`{0}` is not an integer.")]
  NotAnInteger(String),

  #[error("Cannot split the line into a mnemonic and its arguments.")]
  Malformed,

  #[error(transparent)]
  Validation(#[from] ValidationError),
}

/// A `ParseError` tied to the line it came from. Assembly stops at the first one.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("Error on line {line}: {source} ({text})")]
pub struct AssemblyError {
  /// 1-based line number.
  pub line   : usize,
  pub text   : String,
  pub source : ParseError,
}
