//! Records of executed instructions. They are produced by `UVM::step` for display only and
//! never feed back into the machine.

use std::fmt::{Display, Formatter};

use crate::address::Operand;
use crate::bytecode::Instruction;
use crate::memory::Value;

/// A memory operand after resolution: where it pointed and the value read or written there.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Access {
  pub operand : Operand,
  pub address : usize,
  pub value   : Value,
}

impl Display for Access {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.operand {
      Operand::Direct(_) => {
        write!(f, "M[{}] = {}", self.address, self.value)
      },
      Operand::Indirect { .. } => {
        write!(f, "{} = M[{}] = {}", self.operand, self.address, self.value)
      }
    }
  }
}

/// One executed instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
  /// Byte offset the instruction was fetched from.
  pub pc          : usize,
  pub instruction : Instruction,
  /// Source operands in the order the instruction reads them.
  pub reads       : Vec<Access>,
  pub write       : Access,
}

impl Display for Step {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:>6}  {}  =>  {}", self.pc, self.instruction, self.write)?;
    if !self.reads.is_empty() {
      write!(
        f,
        "  <-  {}",
        self.reads
            .iter()
            .map(Access::to_string)
            .collect::<Vec<String>>()
            .join(", ")
      )?;
    }
    Ok(())
  }
}
