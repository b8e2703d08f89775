//! XML export of a range of data memory.

use std::io::{self, Write};

use crate::memory::{DataMemory, Value};

/**
  Writes `cells` as a `memory_dump` document for the requested range. Only the cells given
  are listed, so addresses past the end of memory simply do not appear.

  ```xml
  <?xml version="1.0" ?>
  <memory_dump start_address="0" end_address="2">
    <cell address="0" value="7"/>
  </memory_dump>
  ```
*/
pub fn write_xml<W: Write>(writer: &mut W, start: usize, end: usize, cells: &[(usize, Value)])
  -> io::Result<()>
{
  writeln!(writer, "<?xml version=\"1.0\" ?>")?;
  if cells.is_empty() {
    writeln!(writer, "<memory_dump start_address=\"{}\" end_address=\"{}\"/>", start, end)?;
    return Ok(());
  }

  writeln!(writer, "<memory_dump start_address=\"{}\" end_address=\"{}\">", start, end)?;
  for (address, value) in cells {
    writeln!(writer, "  <cell address=\"{}\" value=\"{}\"/>", address, value)?;
  }
  writeln!(writer, "</memory_dump>")
}

/// Dumps `start..=end` of `memory` as XML.
pub fn dump_memory_xml<W: Write>(writer: &mut W, memory: &DataMemory, start: usize, end: usize)
  -> io::Result<()>
{
  write_xml(writer, start, end, &memory.read_range(start, end))
}
