use std::fmt::{Display, Formatter};

use super::layout::{ADDRESS_WIDTH, CONSTANT_WIDTH, OFFSET_WIDTH};
use super::Opcode;
use crate::address::{Address, Operand};
use crate::errors::ValidationError;

/// An 11 bit constant operand of `LOAD_CONST`.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Constant(u16);

impl Constant {
  pub const MAX: u16 = (1 << CONSTANT_WIDTH) - 1;

  pub(crate) fn from_field(raw: u64) -> Constant {
    Constant((raw & Constant::MAX as u64) as u16)
  }

  pub fn value(&self) -> u64 {
    self.0 as u64
  }
}

impl Display for Constant {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}


/**
  Holds the unencoded components of an instruction, one variant per opcode. Operand types
  are bounded to their field widths, so every value of this type can be encoded. Use the
  checked constructors to build one from untrusted integers.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [Opcode:7][Constant:11][Address:26]
  LoadConst {
    constant : Constant,
    address  : Address
  },
  /// [Opcode:7][Offset:8][SrcAddr:26][DstAddr:26]
  ReadMem {
    offset   : u8,
    src_addr : Address,
    dst_addr : Address
  },
  /// [Opcode:7][SrcAddr:26][DstAddr:26]
  WriteMem {
    src_addr : Address,
    dst_addr : Address
  },
  /// [Opcode:7][Offset1:8][Addr1:26][Addr2:26][ResAddr:26][Offset2:8]
  Gte {
    offset1  : u8,
    addr1    : Address,
    addr2    : Address,
    res_addr : Address,
    offset2  : u8
  },
}

/// Checks that `value` fits in an unsigned field of `width` bits.
fn checked(field: &'static str, value: i64, width: usize) -> Result<u64, ValidationError> {
  let max = (1u64 << width) - 1;
  match value >= 0 && value as u64 <= max {
    true  => Ok(value as u64),
    false => Err(ValidationError { field, value: value.to_string(), max })
  }
}

fn checked_address(field: &'static str, value: i64) -> Result<Address, ValidationError> {
  checked(field, value, ADDRESS_WIDTH).map(Address::from_field)
}

fn checked_offset(field: &'static str, value: i64) -> Result<u8, ValidationError> {
  checked(field, value, OFFSET_WIDTH).map(|v| v as u8)
}

impl Instruction {

  // region Checked constructors

  pub fn load_const(constant: i64, address: i64) -> Result<Instruction, ValidationError> {
    Ok(Instruction::LoadConst {
      constant : checked("constant", constant, CONSTANT_WIDTH).map(Constant::from_field)?,
      address  : checked_address("address", address)?,
    })
  }

  pub fn read_mem(offset: i64, src_addr: i64, dst_addr: i64)
    -> Result<Instruction, ValidationError>
  {
    Ok(Instruction::ReadMem {
      offset   : checked_offset("offset", offset)?,
      src_addr : checked_address("src_addr", src_addr)?,
      dst_addr : checked_address("dst_addr", dst_addr)?,
    })
  }

  pub fn write_mem(src_addr: i64, dst_addr: i64) -> Result<Instruction, ValidationError> {
    Ok(Instruction::WriteMem {
      src_addr : checked_address("src_addr", src_addr)?,
      dst_addr : checked_address("dst_addr", dst_addr)?,
    })
  }

  pub fn gte(offset1: i64, addr1: i64, addr2: i64, res_addr: i64, offset2: i64)
    -> Result<Instruction, ValidationError>
  {
    Ok(Instruction::Gte {
      offset1  : checked_offset("offset1", offset1)?,
      addr1    : checked_address("addr1", addr1)?,
      addr2    : checked_address("addr2", addr2)?,
      res_addr : checked_address("res_addr", res_addr)?,
      offset2  : checked_offset("offset2", offset2)?,
    })
  }

  /**
    Builds the instruction for `opcode` from its operands in assembly order.

    The caller guarantees `operands.len() == opcode.arity()`.
  */
  pub(crate) fn from_operands(opcode: Opcode, operands: &[i64])
    -> Result<Instruction, ValidationError>
  {
    match opcode {
      Opcode::LoadConst => Instruction::load_const(operands[0], operands[1]),
      Opcode::ReadMem   => Instruction::read_mem(operands[0], operands[1], operands[2]),
      Opcode::WriteMem  => Instruction::write_mem(operands[0], operands[1]),
      Opcode::Gte       => Instruction::gte(
        operands[0], operands[1], operands[2], operands[3], operands[4]
      ),
    }
  }

  /**
    Builds the instruction for `opcode` from decoded field values, opcode excluded, in
    layout order. Each value has already been cut to its field width.
  */
  pub(crate) fn from_fields(opcode: Opcode, fields: &[u64]) -> Instruction {
    match opcode {

      Opcode::LoadConst => Instruction::LoadConst {
        constant : Constant::from_field(fields[0]),
        address  : Address::from_field(fields[1]),
      },

      Opcode::ReadMem => Instruction::ReadMem {
        offset   : fields[0] as u8,
        src_addr : Address::from_field(fields[1]),
        dst_addr : Address::from_field(fields[2]),
      },

      Opcode::WriteMem => Instruction::WriteMem {
        src_addr : Address::from_field(fields[0]),
        dst_addr : Address::from_field(fields[1]),
      },

      Opcode::Gte => Instruction::Gte {
        offset1  : fields[0] as u8,
        addr1    : Address::from_field(fields[1]),
        addr2    : Address::from_field(fields[2]),
        res_addr : Address::from_field(fields[3]),
        offset2  : fields[4] as u8,
      },

    }
  }

  // endregion

  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::LoadConst { .. } => Opcode::LoadConst,
      Instruction::ReadMem   { .. } => Opcode::ReadMem,
      Instruction::WriteMem  { .. } => Opcode::WriteMem,
      Instruction::Gte       { .. } => Opcode::Gte,
    }
  }

  /// Size in bytes of the encoded instruction.
  pub fn size(&self) -> usize {
    self.opcode().size()
  }

  /// Operand values, opcode excluded, in layout order (which is also assembly order).
  pub fn fields(&self) -> Vec<u64> {
    match *self {

      Instruction::LoadConst { constant, address } => {
        vec![constant.value(), address.value()]
      }

      Instruction::ReadMem { offset, src_addr, dst_addr } => {
        vec![offset as u64, src_addr.value(), dst_addr.value()]
      }

      Instruction::WriteMem { src_addr, dst_addr } => {
        vec![src_addr.value(), dst_addr.value()]
      }

      Instruction::Gte { offset1, addr1, addr2, res_addr, offset2 } => {
        vec![
          offset1 as u64, addr1.value(), addr2.value(), res_addr.value(), offset2 as u64
        ]
      }

    }
  }

  /**
    The memory operands in the order the instruction uses them: sources first, the
    destination last. `ReadMem`'s source and `Gte`'s first operand and result are
    indirect; everything else is direct.
  */
  pub fn operands(&self) -> Vec<Operand> {
    match *self {

      Instruction::LoadConst { address, .. } => vec![Operand::Direct(address)],

      Instruction::ReadMem { offset, src_addr, dst_addr } => vec![
        Operand::Indirect { base: src_addr, offset },
        Operand::Direct(dst_addr),
      ],

      Instruction::WriteMem { src_addr, dst_addr } => vec![
        Operand::Direct(src_addr),
        Operand::Direct(dst_addr),
      ],

      Instruction::Gte { offset1, addr1, addr2, res_addr, offset2 } => vec![
        Operand::Indirect { base: addr1, offset: offset1 },
        Operand::Direct(addr2),
        Operand::Indirect { base: res_addr, offset: offset2 },
      ],

    }
  }

  /// Field values labeled with their field names, opcode included.
  pub fn describe(&self) -> String {
    let opcode = self.opcode();
    std::iter::once(opcode.code() as u64)
      .chain(self.fields())
      .zip(opcode.layout())
      .map(|(value, field)| format!("{}={}", field.name, value))
      .collect::<Vec<String>>()
      .join(", ")
  }
}

/// Formats the instruction as a line of assembly.
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.opcode())?;
    for value in self.fields() {
      write!(f, " {}", value)?;
    }
    Ok(())
  }
}
