use thiserror::Error;

use super::DecodeError;

/// Fatal conditions that stop the machine. Memory writes made by earlier steps persist.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum VmError {
  #[error(transparent)]
  Decode(#[from] DecodeError),

  /// Direct or effective (base + offset) address outside data memory.
  #[error("Address {address} is outside data memory [0, {size}).")]
  AddressOutOfRange { address: i64, size: usize },
}
