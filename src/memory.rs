//! Data memory: a fixed number of zero-initialized cells. Instructions live in a separate,
//! read-only byte buffer, so nothing here can alias the code.

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::errors::VmError;

/// Contents of a memory cell. Comparisons store 0 or 1; loads store plain integers.
pub type Value = i64;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DataMemory {
  cells: Vec<Value>
}

impl DataMemory {

  pub fn new(size: usize) -> DataMemory {
    DataMemory { cells: vec![0; size] }
  }

  pub fn size(&self) -> usize {
    self.cells.len()
  }

  pub fn cells(&self) -> &[Value] {
    &self.cells
  }

  /// Converts a possibly negative or computed address to an index, if it is in bounds.
  pub fn check_address(&self, address: i64) -> Result<usize, VmError> {
    match address >= 0 && (address as u64) < self.cells.len() as u64 {
      true  => Ok(address as usize),
      false => Err(VmError::AddressOutOfRange { address, size: self.cells.len() })
    }
  }

  pub fn load(&self, address: usize) -> Result<Value, VmError> {
    self.cells
        .get(address)
        .copied()
        .ok_or_else(|| self.out_of_range(address))
  }

  pub fn store(&mut self, address: usize, value: Value) -> Result<(), VmError> {
    if address >= self.cells.len() {
      return Err(self.out_of_range(address));
    }
    self.cells[address] = value;
    Ok(())
  }

  fn out_of_range(&self, address: usize) -> VmError {
    VmError::AddressOutOfRange {
      address : address.min(i64::MAX as usize) as i64,
      size    : self.cells.len()
    }
  }

  /**
    Lists `(address, value)` for every address in `start..=end`, in order. Addresses past
    the end of memory are skipped rather than reported, since this only feeds memory dumps.
  */
  pub fn read_range(&self, start: usize, end: usize) -> Vec<(usize, Value)> {
    (start..=end)
      .take_while(|address| *address < self.cells.len())
      .map(|address| (address, self.cells[address]))
      .collect()
  }

  /// Cells holding something other than zero.
  pub fn nonzero_cells(&self) -> Vec<(usize, Value)> {
    self.cells
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0)
        .map(|(address, value)| (address, *value))
        .collect()
  }

  /// Formats `(address, value)` pairs as a two column table.
  pub fn make_table(cells: &[(usize, Value)]) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (address, value) in cells {
      table.add_row(row![r->format!("M[{}] =", address), format!("{}", value)]);
    }
    table
  }
}

lazy_static! {
  pub static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

// Memory is mostly zeros, so only the cells that were written show up.
impl Display for DataMemory {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let cells = self.nonzero_cells();
    write!(
      f,
      "{} cells, {} nonzero\n{}",
      self.cells.len(),
      cells.len(),
      DataMemory::make_table(&cells)
    )
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_memory_is_zeroed() {
    let memory = DataMemory::new(5);
    assert_eq!(memory.size(), 5);
    assert!(memory.cells().iter().all(|v| *v == 0));
  }

  #[test]
  fn test_load_and_store() {
    let mut memory = DataMemory::new(4);
    memory.store(3, -7).unwrap();
    assert_eq!(memory.load(3), Ok(-7));
    assert_eq!(
      memory.store(4, 1),
      Err(VmError::AddressOutOfRange { address: 4, size: 4 })
    );
    assert_eq!(
      memory.load(100),
      Err(VmError::AddressOutOfRange { address: 100, size: 4 })
    );
  }

  #[test]
  fn test_check_address() {
    let memory = DataMemory::new(3);
    assert_eq!(memory.check_address(0), Ok(0));
    assert_eq!(memory.check_address(2), Ok(2));
    assert!(memory.check_address(3).is_err());
    assert!(memory.check_address(-1).is_err());
  }

  #[test]
  fn test_read_range_is_inclusive() {
    let mut memory = DataMemory::new(10);
    memory.store(2, 20).unwrap();
    memory.store(4, 40).unwrap();
    assert_eq!(memory.read_range(2, 4), vec![(2, 20), (3, 0), (4, 40)]);
    assert_eq!(memory.read_range(4, 4), vec![(4, 40)]);
  }

  #[test]
  fn test_read_range_skips_out_of_bounds() {
    let mut memory = DataMemory::new(3);
    memory.store(2, 9).unwrap();
    assert_eq!(memory.read_range(1, 10), vec![(1, 0), (2, 9)]);
    assert!(memory.read_range(5, 8).is_empty());
    assert!(memory.read_range(2, 1).is_empty());
  }

  #[test]
  fn test_display_lists_nonzero_cells() {
    let mut memory = DataMemory::new(100);
    memory.store(42, 1).unwrap();
    let text = memory.to_string();
    assert!(text.starts_with("100 cells, 1 nonzero"));
    assert!(text.contains("M[42] ="));
    assert!(!text.contains("M[41] ="));
  }
}
