/*!
  Field layout of every instruction: the ordered list of named fields, each with its
  width in bits, starting at bit 0 with the opcode. Field `n` starts where field `n - 1`
  ends. An instruction occupies the fewest whole bytes that hold all of its fields.
*/

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Field {
  pub name  : &'static str,
  pub width : usize,
}

impl Field {
  const fn new(name: &'static str, width: usize) -> Field {
    Field { name, width }
  }
}

pub const OPCODE_WIDTH   : usize =  7;
pub const CONSTANT_WIDTH : usize = 11;
pub const OFFSET_WIDTH   : usize =  8;
pub const ADDRESS_WIDTH  : usize = 26;

const OPCODE: Field = Field::new("opcode", OPCODE_WIDTH);

/// [Opcode:7][Constant:11][Address:26] = 44 bits
pub const LOAD_CONST_LAYOUT: [Field; 3] = [
  OPCODE,
  Field::new("constant", CONSTANT_WIDTH),
  Field::new("address",  ADDRESS_WIDTH),
];

/// [Opcode:7][Offset1:8][Addr1:26][Addr2:26][ResAddr:26][Offset2:8] = 101 bits
pub const GTE_LAYOUT: [Field; 6] = [
  OPCODE,
  Field::new("offset1",  OFFSET_WIDTH),
  Field::new("addr1",    ADDRESS_WIDTH),
  Field::new("addr2",    ADDRESS_WIDTH),
  Field::new("res_addr", ADDRESS_WIDTH),
  Field::new("offset2",  OFFSET_WIDTH),
];

/// [Opcode:7][SrcAddr:26][DstAddr:26] = 59 bits
pub const WRITE_MEM_LAYOUT: [Field; 3] = [
  OPCODE,
  Field::new("src_addr", ADDRESS_WIDTH),
  Field::new("dst_addr", ADDRESS_WIDTH),
];

/// [Opcode:7][Offset:8][SrcAddr:26][DstAddr:26] = 67 bits
pub const READ_MEM_LAYOUT: [Field; 4] = [
  OPCODE,
  Field::new("offset",   OFFSET_WIDTH),
  Field::new("src_addr", ADDRESS_WIDTH),
  Field::new("dst_addr", ADDRESS_WIDTH),
];

/// Pairs each field of `layout` with the bit at which it starts.
pub fn placed_fields(layout: &'static [Field]) -> impl Iterator<Item = (usize, &'static Field)> {
  layout.iter().scan(0, |bit_offset, field| {
    let start = *bit_offset;
    *bit_offset += field.width;
    Some((start, field))
  })
}

/// Total number of bits used by `layout`.
pub fn bit_length(layout: &[Field]) -> usize {
  layout.iter().map(|field| field.width).sum()
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_gte_field_offsets() {
    let offsets: Vec<(usize, &str)> =
      placed_fields(&GTE_LAYOUT)
        .map(|(bit_offset, field)| (bit_offset, field.name))
        .collect();
    assert_eq!(
      offsets,
      vec![
        (0, "opcode"),
        (7, "offset1"),
        (15, "addr1"),
        (41, "addr2"),
        (67, "res_addr"),
        (93, "offset2"),
      ]
    );
    assert_eq!(bit_length(&GTE_LAYOUT), 101);
  }

  #[test]
  fn test_bit_lengths() {
    assert_eq!(bit_length(&LOAD_CONST_LAYOUT), 44);
    assert_eq!(bit_length(&WRITE_MEM_LAYOUT), 59);
    assert_eq!(bit_length(&READ_MEM_LAYOUT), 67);
  }

  #[test]
  fn test_read_mem_field_offsets() {
    let starts: Vec<usize> = placed_fields(&READ_MEM_LAYOUT).map(|(bit, _)| bit).collect();
    assert_eq!(starts, vec![0, 7, 15, 41]);
  }
}
