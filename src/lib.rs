/*!
  A small virtual machine with four bit-packed instructions, an assembler that translates
  their mnemonics into bytecode, and an interpreter that runs the bytecode against a flat
  data memory.

  The pipeline is this:
  ```text
  text -> [`bytecode::parse_assembly`] -> `Instruction`s -> [`bytecode::encode_program`] ->⋯

  ⋯-> bytes -> [`uvm::UVM::run`] -> `DataMemory` -> [`dump::dump_memory_xml`] -> XML
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod dump;
pub mod errors;
pub mod listing;
pub mod memory;
pub mod trace;
pub mod uvm;

pub use bytecode::{Instruction, Opcode};
pub use uvm::UVM;
