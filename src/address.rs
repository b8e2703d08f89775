//! Data memory addresses as they appear in instruction operands, and the two ways an
//! instruction can name a memory cell: directly, or through a base cell plus an offset.

use std::fmt::{Display, Formatter};

use crate::bytecode::layout::ADDRESS_WIDTH;
use crate::errors::VmError;
use crate::memory::DataMemory;

pub type AddressNumberType = u32;

/// A 26 bit address operand. Values that do not fit cannot be constructed.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Address(AddressNumberType);

impl Address {
  pub const MAX: AddressNumberType = (1 << ADDRESS_WIDTH) - 1;

  pub fn new(value: u64) -> Option<Address> {
    match value <= Address::MAX as u64 {
      true  => Some(Address(value as AddressNumberType)),
      false => None
    }
  }

  /// Builds an address from a field the decoder has already cut to `ADDRESS_WIDTH` bits.
  pub(crate) fn from_field(raw: u64) -> Address {
    Address((raw & Address::MAX as u64) as AddressNumberType)
  }

  /// Converts the address to an index into data memory.
  pub fn idx(&self) -> usize {
    self.0 as usize
  }

  pub fn value(&self) -> u64 {
    self.0 as u64
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "M[{}]", self.0)
  }
}


/**
  An `Either` of a direct address and an indirect one. The effective address of
  `Indirect { base, offset }` is the value stored at `base` plus `offset`.
*/
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operand {
  Direct(Address),
  Indirect {
    base   : Address,
    offset : u8
  }
}

impl Operand {
  /// Computes the memory index this operand refers to, checked against `memory`.
  pub fn resolve(&self, memory: &DataMemory) -> Result<usize, VmError> {
    match self {

      Operand::Direct(address) => memory.check_address(address.idx() as i64),

      Operand::Indirect { base, offset } => {
        let base_value = memory.load(base.idx())?;
        memory.check_address(base_value.saturating_add(*offset as i64))
      }

    }
  }
}

impl Display for Operand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Operand::Direct(address) => {
        write!(f, "{}", address)
      },
      Operand::Indirect { base, offset } => {
        write!(f, "M[{} + {}]", base, offset)
      }
    }
  }
}
