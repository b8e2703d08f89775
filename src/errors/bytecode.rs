use thiserror::Error;

use crate::bytecode::Opcode;

/// Failure to place or extract a bit field in a byte buffer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum FieldError {
  #[error("Value {value} does not fit in a {width} bit field.")]
  Overflow { value: u64, width: usize },

  #[error(
    "A {width} bit field at bit {bit_offset} runs past the end of a {length} byte buffer."
  )]
  OutOfBuffer { bit_offset: usize, width: usize, length: usize },

  /// Fields are carried in a `u64` on their way in and out of the buffer.
  #[error("A {0} bit field is wider than 64 bits.")]
  TooWide(usize),
}

/**
  An instruction operand outside the unsigned range of its field. The value is kept as
  text so that integers too large for any machine type are reported as written.
*/
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("Operand `{field}` = {value} is outside the range [0, {max}].")]
pub struct ValidationError {
  pub field : &'static str,
  pub value : String,
  pub max   : u64,
}

/// The bytes at the program counter are not an instruction.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DecodeError {
  #[error("Unknown opcode {opcode} at byte {pc}.")]
  UnknownOpcode { opcode: u8, pc: usize },

  #[error("{opcode} at byte {pc} needs {needed} bytes but only {available} remain.")]
  Truncated {
    opcode    : Opcode,
    pc        : usize,
    needed    : usize,
    available : usize,
  },

  #[error("No instruction at byte {pc}: the binary is {length} bytes long.")]
  EndOfCode { pc: usize, length: usize },

  #[error(transparent)]
  Field(#[from] FieldError),
}
