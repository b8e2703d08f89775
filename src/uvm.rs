//! The virtual machine: a data memory, a read-only code buffer and a program counter, with
//! the fetch-decode-execute loop that runs the code against the memory.

use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::address::{Address, Operand};
use crate::bytecode::{try_decode_instruction, Constant, Instruction};
use crate::errors::VmError;
use crate::memory::{DataMemory, Value, TABLE_DISPLAY_FORMAT};
use crate::trace::{Access, Step};

/// Memory size used by the interpreter front end when none is given.
pub const DEFAULT_MEMORY_SIZE: usize = 100_000;

/**
  The machine is Running while the program counter is inside the code and Halted once it
  reaches or passes the end. There is no halt instruction and no control flow: every step
  moves the program counter forward by the length of the instruction just executed, so a
  run always terminates.
*/
#[derive(Clone, Debug)]
pub struct UVM {

  // Memory Stores
  memory : DataMemory, // Data memory, zero-initialized
  code   : Vec<u8>,    // Code memory, the binary being run

  // Registers //
  pc     : usize,      // Program counter, a byte offset into `code`
  steps  : usize,      // Instructions executed since the program was loaded

}

impl UVM {

  // region Low-level utility methods

  pub fn new(memory_size: usize) -> UVM {
    UVM {
      memory : DataMemory::new(memory_size),
      code   : vec![],
      pc     : 0,
      steps  : 0,
    }
  }

  /// A machine of `memory_size` cells with `code` loaded.
  pub fn with_program(memory_size: usize, code: Vec<u8>) -> UVM {
    let mut machine = UVM::new(memory_size);
    machine.load_program(code);
    machine
  }

  /// Replaces the code and rewinds the program counter. Data memory is kept.
  pub fn load_program(&mut self, code: Vec<u8>) {
    self.code  = code;
    self.pc    = 0;
    self.steps = 0;
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn steps(&self) -> usize {
    self.steps
  }

  pub fn code(&self) -> &[u8] {
    &self.code
  }

  pub fn memory(&self) -> &DataMemory {
    &self.memory
  }

  pub fn is_halted(&self) -> bool {
    self.pc >= self.code.len()
  }

  /// Resolves a source operand and reads the cell it points to.
  fn read(&self, operand: Operand) -> Result<Access, VmError> {
    let address = operand.resolve(&self.memory)?;
    let value   = self.memory.load(address)?;
    Ok(Access { operand, address, value })
  }

  /// Resolves a destination operand and stores `value` there.
  fn write(&mut self, operand: Operand, value: Value) -> Result<Access, VmError> {
    let address = operand.resolve(&self.memory)?;
    self.memory.store(address, value)?;
    Ok(Access { operand, address, value })
  }

  // endregion

  // region Fetch/decode/execute

  /**
    Executes the instruction at the program counter. Returns `Ok(None)` once the machine is
    halted. On an error the program counter stays on the failing instruction and earlier
    writes to memory are kept; a failing instruction itself writes nothing.
  */
  pub fn step(&mut self) -> Result<Option<Step>, VmError> {
    if self.is_halted() {
      return Ok(None);
    }

    let instruction = try_decode_instruction(&self.code, self.pc)?;
    let (reads, write) = match instruction {

      Instruction::LoadConst { constant, address } => {
        self.load_const(constant, address)?
      }

      Instruction::ReadMem { offset, src_addr, dst_addr } => {
        self.read_mem(offset, src_addr, dst_addr)?
      }

      Instruction::WriteMem { src_addr, dst_addr } => {
        self.write_mem(src_addr, dst_addr)?
      }

      Instruction::Gte { offset1, addr1, addr2, res_addr, offset2 } => {
        self.gte(offset1, addr1, addr2, res_addr, offset2)?
      }

    };

    let step = Step { pc: self.pc, instruction, reads, write };
    self.pc    += instruction.size();
    self.steps += 1;

    #[cfg(feature = "trace_computation")] println!("{}", step);
    Ok(Some(step))
  }

  /// Steps until the machine halts or fails. Returns the number of instructions executed.
  pub fn run(&mut self) -> Result<usize, VmError> {
    let start = self.steps;
    while self.step()?.is_some() {}

    #[cfg(feature = "trace_computation")] println!("{}", self);
    Ok(self.steps - start)
  }

  // endregion

  // region VM instruction methods

  /// `M[address] = constant`
  fn load_const(&mut self, constant: Constant, address: Address)
    -> Result<(Vec<Access>, Access), VmError>
  {
    let write = self.write(Operand::Direct(address), constant.value() as Value)?;
    Ok((vec![], write))
  }

  /// `M[dst_addr] = M[M[src_addr] + offset]`
  fn read_mem(&mut self, offset: u8, src_addr: Address, dst_addr: Address)
    -> Result<(Vec<Access>, Access), VmError>
  {
    let source = self.read(Operand::Indirect { base: src_addr, offset })?;
    let write  = self.write(Operand::Direct(dst_addr), source.value)?;
    Ok((vec![source], write))
  }

  /// `M[dst_addr] = M[src_addr]`
  fn write_mem(&mut self, src_addr: Address, dst_addr: Address)
    -> Result<(Vec<Access>, Access), VmError>
  {
    let source = self.read(Operand::Direct(src_addr))?;
    let write  = self.write(Operand::Direct(dst_addr), source.value)?;
    Ok((vec![source], write))
  }

  /**
    `M[M[res_addr] + offset2] = (M[M[addr1] + offset1] >= M[addr2]) as 0 or 1`

    The first operand and the result are addressed through a base cell; the second operand
    is addressed directly.
  */
  fn gte(&mut self, offset1: u8, addr1: Address, addr2: Address, res_addr: Address, offset2: u8)
    -> Result<(Vec<Access>, Access), VmError>
  {
    let result_operand = Operand::Indirect { base: res_addr, offset: offset2 };
    // Resolved up front so a bad result address is reported before anything is read.
    result_operand.resolve(&self.memory)?;

    let left  = self.read(Operand::Indirect { base: addr1, offset: offset1 })?;
    let right = self.read(Operand::Direct(addr2))?;
    let write = self.write(result_operand, (left.value >= right.value) as Value)?;
    Ok((vec![left, right], write))
  }

  // endregion

}

impl Display for UVM {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let m_table = DataMemory::make_table(&self.memory.nonzero_cells());

    let mut combined_table = Table::new();
    combined_table.add_row(row![m_table]);
    combined_table.set_titles(row![ub->"Data Memory (nonzero cells)"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let state = match self.is_halted() {
      true  => "Halted",
      false => "Running"
    };

    write!(
      f,
      "{}: PC = {} of {} bytes, {} instructions executed.\n{}",
      state, self.pc, self.code.len(), self.steps, combined_table
    )
  }
}
