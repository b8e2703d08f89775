//! Runs a UVM binary and dumps a range of data memory as XML.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use uvm::bytecode::disassemble;
use uvm::dump::dump_memory_xml;
use uvm::listing::make_listing_table;
use uvm::uvm::{DEFAULT_MEMORY_SIZE, UVM};

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs UVM bytecode and dumps data memory")]
struct Args {
  /// Binary produced by the assembler
  input: PathBuf,

  /// Where to write the XML memory dump
  output: PathBuf,

  /// First address of the dump
  start: usize,

  /// Last address of the dump, inclusive
  end: usize,

  /// Number of data memory cells
  #[arg(short, long, default_value_t = DEFAULT_MEMORY_SIZE)]
  memory_size: usize,

  /// List the decoded program before running it
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let args = Args::parse();

  let code =
    fs::read(&args.input)
      .with_context(|| format!("cannot read {}", args.input.display()))?;
  println!("Loaded {} bytes of program.", code.len());

  if args.verbose {
    match disassemble(&code) {
      Ok(listing) => println!("{}", make_listing_table(&listing)),
      Err(e)      => eprintln!("Cannot list the program: {}", e),
    }
  }

  let mut machine = UVM::with_program(args.memory_size, code);
  let outcome     = machine.run();

  // Memory is dumped as it stands, also after a failed run.
  let file = File::create(&args.output)
    .with_context(|| format!("cannot create {}", args.output.display()))?;
  let mut writer = BufWriter::new(file);
  dump_memory_xml(&mut writer, machine.memory(), args.start, args.end)
    .and_then(|_| writer.flush())
    .with_context(|| format!("cannot write {}", args.output.display()))?;

  let steps = outcome.with_context(|| format!("execution stopped at byte {}", machine.pc()))?;
  println!(
    "Executed {} instructions. Memory {}..={} written to {}",
    steps,
    args.start,
    args.end,
    args.output.display()
  );
  Ok(())
}
