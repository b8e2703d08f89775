//! Tabular listing of a program: what each instruction is, where it sits in the binary and
//! the bytes it encodes to.

use prettytable::Table;

use crate::bytecode::{encode_instruction, Instruction};
use crate::memory::TABLE_DISPLAY_FORMAT;

/// Formats bytes as `0xEF, 0x02, ...`.
pub fn hex_bytes(bytes: &[u8]) -> String {
  bytes
    .iter()
    .map(|byte| format!("0x{:02X}", byte))
    .collect::<Vec<String>>()
    .join(", ")
}

/// Pairs each instruction with the byte offset it will have in the encoded program.
pub fn with_offsets(instructions: &[Instruction]) -> Vec<(usize, Instruction)> {
  instructions
    .iter()
    .scan(0, |offset, instruction| {
      let start = *offset;
      *offset += instruction.size();
      Some((start, *instruction))
    })
    .collect()
}

pub fn make_listing_table(program: &[(usize, Instruction)]) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"#", ubr->"Offset", ubl->"Instruction", ubl->"Fields", ubl->"Bytes"]);

  for (i, (offset, instruction)) in program.iter().enumerate() {
    table.add_row(row![
      r->i,
      r->offset,
      instruction,
      instruction.describe(),
      hex_bytes(&encode_instruction(instruction))
    ]);
  }
  table
}
