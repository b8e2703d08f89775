/*!
  This module is responsible for the encoding and decoding of binary instructions.

*/
use std::convert::TryFrom;

use super::bitfield::{read_field, write_field};
use super::layout::{placed_fields, OPCODE_WIDTH};
use super::{Instruction, Opcode};
use crate::errors::{DecodeError, FieldError};

/**
  Encodes the instruction into bytecode. The result is exactly `instruction.size()` bytes
  long whatever the operand values are, and the unused high bits of the last byte are zero.
*/
pub fn encode_instruction(instruction: &Instruction) -> Vec<u8> {
  let opcode     = instruction.opcode();
  let mut buffer = vec![0u8; opcode.size()];
  let values     = std::iter::once(opcode.code() as u64).chain(instruction.fields());

  for ((bit_offset, field), value) in placed_fields(opcode.layout()).zip(values) {
    if let Err(e) = write_field(&mut buffer, bit_offset, field.width, value) {
      // Operand types are bounded by their field widths.
      unreachable!("Unreachable: field `{}` of {} cannot be encoded: {}", field.name, opcode, e);
    }
  }
  buffer
}

/// Concatenates the encodings of `instructions` in order, with nothing in between.
pub fn encode_program(instructions: &[Instruction]) -> Vec<u8> {
  instructions.iter().flat_map(encode_instruction).collect()
}

/// Reads the opcode of the instruction starting at byte `pc` of `code`.
pub fn read_opcode(code: &[u8], pc: usize) -> Result<Opcode, DecodeError> {
  let raw = match read_field(code, pc, 0, OPCODE_WIDTH) {
    Ok(raw) => raw as u8,
    Err(FieldError::OutOfBuffer { .. }) => {
      return Err(DecodeError::EndOfCode { pc, length: code.len() });
    }
    Err(e) => return Err(e.into())
  };

  Opcode::try_from(raw).map_err(|_| DecodeError::UnknownOpcode { opcode: raw, pc })
}

/**
  Decodes the instruction starting at byte `pc` of `code`. The opcode determines how many
  bytes the instruction occupies; all of them must be present.
*/
pub fn try_decode_instruction(code: &[u8], pc: usize) -> Result<Instruction, DecodeError> {
  let opcode    = read_opcode(code, pc)?;
  let available = code.len() - pc;
  if available < opcode.size() {
    return Err(DecodeError::Truncated { opcode, pc, needed: opcode.size(), available });
  }

  let fields =
    placed_fields(opcode.layout())
      .skip(1)
      .map(|(bit_offset, field)| read_field(code, pc, bit_offset, field.width))
      .collect::<Result<Vec<u64>, FieldError>>()?;

  Ok(Instruction::from_fields(opcode, &fields))
}

/// Decodes a whole binary, pairing each instruction with the byte offset it starts at.
pub fn disassemble(code: &[u8]) -> Result<Vec<(usize, Instruction)>, DecodeError> {
  let mut listing = Vec::new();
  let mut pc      = 0;

  while pc < code.len() {
    let instruction = try_decode_instruction(code, pc)?;
    listing.push((pc, instruction));
    pc += instruction.size();
  }
  Ok(listing)
}
