/*!
  Reading and writing unsigned fields of any width at any bit offset in a byte buffer.

  Bits are numbered least-significant first across a little-endian buffer: bit `n` is bit
  `n % 8` of byte `n / 8`. A field is moved one byte-sized chunk at a time, so no
  instruction is ever assembled in a single machine integer. The only width limit is that
  of the `u64` carrying one field's value.
*/

use crate::errors::FieldError;

pub type FieldValue = u64;

/// Widest field that fits in a `FieldValue`.
pub const MAX_FIELD_WIDTH: usize = 64;

fn check_span(length: usize, bit_offset: usize, width: usize) -> Result<(), FieldError> {
  if width > MAX_FIELD_WIDTH {
    return Err(FieldError::TooWide(width));
  }
  match bit_offset.checked_add(width) {
    Some(end) if end <= length * 8 => Ok(()),
    _ => Err(FieldError::OutOfBuffer { bit_offset, width, length })
  }
}

/// Mask of the low `bits` bits of a byte, `bits <= 8`.
fn low_mask(bits: usize) -> u8 {
  ((1u16 << bits) - 1) as u8
}

/**
  Stores `value` in the `width` bits of `buffer` starting at absolute bit `bit_offset`.
  Bits of `buffer` outside the field are left untouched.

  A value that needs more than `width` bits is an error, never truncated.
*/
pub fn write_field(buffer: &mut [u8], bit_offset: usize, width: usize, value: FieldValue)
  -> Result<(), FieldError>
{
  check_span(buffer.len(), bit_offset, width)?;
  if width < MAX_FIELD_WIDTH && value >> width != 0 {
    return Err(FieldError::Overflow { value, width });
  }

  let mut written = 0;
  while written < width {
    let bit   = bit_offset + written;
    let byte  = bit / 8;
    let shift = bit % 8;
    let chunk = (8 - shift).min(width - written);
    let mask  = low_mask(chunk);
    let bits  = (value >> written) as u8 & mask;

    buffer[byte] = (buffer[byte] & !(mask << shift)) | (bits << shift);
    written += chunk;
  }
  Ok(())
}

/**
  Extracts `width` bits starting at `bit_offset` bits past byte `base_byte_offset`, that is,
  a field of the instruction whose first byte is `buffer[base_byte_offset]`.
*/
pub fn read_field(buffer: &[u8], base_byte_offset: usize, bit_offset: usize, width: usize)
  -> Result<FieldValue, FieldError>
{
  let start = base_byte_offset
    .checked_mul(8)
    .and_then(|base| base.checked_add(bit_offset))
    .ok_or(FieldError::OutOfBuffer { bit_offset, width, length: buffer.len() })?;
  check_span(buffer.len(), start, width)?;

  let mut value: FieldValue = 0;
  let mut read = 0;
  while read < width {
    let bit   = start + read;
    let shift = bit % 8;
    let chunk = (8 - shift).min(width - read);
    let bits  = (buffer[bit / 8] >> shift) & low_mask(chunk);

    value |= (bits as FieldValue) << read;
    read += chunk;
  }
  Ok(value)
}


#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn test_byte_aligned_field() {
    let mut buffer = [0u8; 2];
    write_field(&mut buffer, 8, 8, 0xAB).unwrap();
    assert_eq!(buffer, [0x00, 0xAB]);
    assert_eq!(read_field(&buffer, 0, 8, 8).unwrap(), 0xAB);
    assert_eq!(read_field(&buffer, 1, 0, 8).unwrap(), 0xAB);
  }

  #[test]
  fn test_field_spanning_three_bytes() {
    // 11 bits of ones starting at bit 7 cover bit 7 of byte 0, all of byte 1 and
    // the low two bits of byte 2.
    let mut buffer = [0u8; 3];
    write_field(&mut buffer, 7, 11, 0x7FF).unwrap();
    assert_eq!(buffer, [0x80, 0xFF, 0x03]);
    assert_eq!(read_field(&buffer, 0, 7, 11).unwrap(), 0x7FF);
  }

  #[test]
  fn test_write_preserves_neighbouring_bits() {
    let mut buffer = [0xFFu8; 4];
    write_field(&mut buffer, 5, 13, 0).unwrap();
    assert_eq!(buffer, [0x1F, 0x00, 0xFC, 0xFF]);
  }

  #[test]
  fn test_opcode_and_constant_layout() {
    // 111 | 5 << 7 == 751 == 0x02EF
    let mut buffer = [0u8; 6];
    write_field(&mut buffer, 0, 7, 111).unwrap();
    write_field(&mut buffer, 7, 11, 5).unwrap();
    assert_eq!(buffer, [0xEF, 0x02, 0, 0, 0, 0]);
  }

  #[test]
  fn test_field_past_bit_64() {
    // The last field of a 101 bit instruction.
    let mut buffer = [0u8; 13];
    write_field(&mut buffer, 93, 8, 0xFF).unwrap();
    assert_eq!(buffer[11], 0xE0);
    assert_eq!(buffer[12], 0x1F);
    assert_eq!(read_field(&buffer, 0, 93, 8).unwrap(), 0xFF);
  }

  #[test]
  fn test_overflowing_value_is_rejected() {
    let mut buffer = [0u8; 4];
    assert_eq!(
      write_field(&mut buffer, 0, 8, 256),
      Err(FieldError::Overflow { value: 256, width: 8 })
    );
    assert_eq!(buffer, [0u8; 4]);
    assert!(write_field(&mut buffer, 0, 8, 255).is_ok());
  }

  #[test]
  fn test_field_outside_buffer_is_rejected() {
    let mut buffer = [0u8; 2];
    assert_eq!(
      write_field(&mut buffer, 10, 7, 1),
      Err(FieldError::OutOfBuffer { bit_offset: 10, width: 7, length: 2 })
    );
    assert!(read_field(&buffer, 1, 2, 7).is_err());
    assert!(read_field(&buffer, 2, 0, 1).is_err());
  }

  #[test]
  fn test_too_wide_field_is_rejected() {
    let mut buffer = [0u8; 16];
    assert_eq!(write_field(&mut buffer, 0, 65, 0), Err(FieldError::TooWide(65)));
    assert_eq!(read_field(&buffer, 0, 0, 65), Err(FieldError::TooWide(65)));
  }

  #[test]
  fn test_full_width_field() {
    let mut buffer = [0u8; 9];
    write_field(&mut buffer, 3, 64, u64::MAX).unwrap();
    assert_eq!(read_field(&buffer, 0, 3, 64).unwrap(), u64::MAX);
    assert_eq!(buffer[0], 0xF8);
    assert_eq!(buffer[8], 0x07);
  }

  proptest! {
    #[test]
    fn test_write_then_read(
      bit_offset in 0usize..64,
      width in 1usize..=64,
      raw in any::<u64>()
    ) {
      let value = if width == 64 { raw } else { raw & ((1u64 << width) - 1) };
      let mut buffer = [0u8; 16];
      write_field(&mut buffer, bit_offset, width, value).unwrap();
      prop_assert_eq!(read_field(&buffer, 0, bit_offset, width).unwrap(), value);

      // Nothing outside the field was touched.
      let total: u32 = buffer.iter().map(|b| b.count_ones()).sum();
      prop_assert_eq!(total, value.count_ones());
    }
  }
}
