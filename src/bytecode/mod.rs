/*!

  Instructions are packed into the fewest whole bytes that hold their fields, with no
  alignment and no separators between consecutive instructions. Fields are laid out
  least-significant bit first from bit 0 of the instruction's first byte, and multi-byte
  values are little-endian. The sizes of instruction components are as follows:

    Opcode:    7 bits
    Constant: 11 bits
    Offset:    8 bits
    Address:  26 bits

  Every instruction begins with its opcode, and every opcode has a single fixed layout
  (see `layout`), so the length of an instruction is known as soon as its opcode is read.
  This is the only way the decoder finds the start of the next instruction.

  | Instruction | Opcode | Bits | Bytes |
  |-------------|--------|------|-------|
  | LOAD_CONST  |   111  |   44 |     6 |
  | GTE         |    68  |  101 |    13 |
  | WRITE_MEM   |   101  |   59 |     8 |
  | READ_MEM    |    40  |   67 |     9 |

  A GTE instruction is wider than a `u64`. Encoding and decoding therefore go field by
  field against the byte buffer (see `bitfield`) instead of building the instruction as
  one integer.

*/

pub mod bitfield;
pub mod layout;
mod assembly;
mod binary;
mod instruction;

pub use assembly::{assemble, parse_assembly, parse_line};
pub use binary::{
  disassemble,
  encode_instruction,
  encode_program,
  read_opcode,
  try_decode_instruction
};
pub use instruction::{Constant, Instruction};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use layout::{Field, GTE_LAYOUT, LOAD_CONST_LAYOUT, READ_MEM_LAYOUT, WRITE_MEM_LAYOUT};

/**
  Opcodes of the virtual machine.

  The discriminants are the 7 bit opcode values found in the binary. They are neither
  contiguous nor ordered by size, so nothing may depend on the order of the variants.
  The `strum` names are the assembly mnemonics.
*/
#[derive(
  StrumDisplay, EnumString, EnumIter,  TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,       Eq,        PartialEq,        Debug,         Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "LOAD_CONST")]
  LoadConst = 111, // load_const( constant, address )
  #[strum(serialize = "GTE")]
  Gte       =  68, // gte( offset1, addr1, addr2, res_addr, offset2 )
  #[strum(serialize = "WRITE_MEM")]
  WriteMem  = 101, // write_mem( src_addr, dst_addr )
  #[strum(serialize = "READ_MEM")]
  ReadMem   =  40, // read_mem( offset, src_addr, dst_addr )
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The fields of the instruction, opcode first.
  pub fn layout(&self) -> &'static [Field] {
    match self {
      Opcode::LoadConst => &LOAD_CONST_LAYOUT,
      Opcode::Gte       => &GTE_LAYOUT,
      Opcode::WriteMem  => &WRITE_MEM_LAYOUT,
      Opcode::ReadMem   => &READ_MEM_LAYOUT,
    }
  }

  /// Size in BYTES of an instruction with this opcode.
  pub fn size(&self) -> usize {
    match self {
      Opcode::LoadConst =>  6,
      Opcode::Gte       => 13,
      Opcode::WriteMem  =>  8,
      Opcode::ReadMem   =>  9,
    }
  }

  /// Number of operands written after the mnemonic in assembly.
  pub fn arity(&self) -> usize {
    self.layout().len() - 1
  }
}


#[cfg(test)]
mod tests {
  use std::convert::TryFrom;
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;
  use super::layout::{bit_length, OPCODE_WIDTH};

  #[test]
  fn test_opcode_values() {
    assert_eq!(Opcode::LoadConst.code(), 111);
    assert_eq!(Opcode::Gte.code(), 68);
    assert_eq!(Opcode::WriteMem.code(), 101);
    assert_eq!(Opcode::ReadMem.code(), 40);
    assert_eq!(Opcode::try_from(101u8).unwrap(), Opcode::WriteMem);
    assert!(Opcode::try_from(0u8).is_err());
  }

  #[test]
  fn test_opcodes_fit_opcode_field() {
    for opcode in Opcode::iter() {
      assert!((opcode.code() as usize) < 1 << OPCODE_WIDTH);
      assert_eq!(opcode.layout()[0].width, OPCODE_WIDTH);
    }
  }

  #[test]
  fn test_size_is_minimal_byte_count() {
    for opcode in Opcode::iter() {
      let bits = bit_length(opcode.layout());
      assert_eq!(opcode.size(), (bits + 7) / 8, "{}", opcode);
    }
  }

  #[test]
  fn test_mnemonics() {
    assert_eq!(Opcode::LoadConst.to_string(), "LOAD_CONST");
    assert_eq!(Opcode::from_str("READ_MEM").unwrap(), Opcode::ReadMem);
    assert_eq!(Opcode::from_str("GTE").unwrap(), Opcode::Gte);
    assert!(Opcode::from_str("JMP").is_err());
  }

  #[test]
  fn test_arity() {
    assert_eq!(Opcode::LoadConst.arity(), 2);
    assert_eq!(Opcode::ReadMem.arity(), 3);
    assert_eq!(Opcode::WriteMem.arity(), 2);
    assert_eq!(Opcode::Gte.arity(), 5);
  }
}
