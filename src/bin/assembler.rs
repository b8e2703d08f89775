//! Assembles UVM assembly text into a binary for the interpreter.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use uvm::bytecode::{encode_program, parse_assembly};
use uvm::listing::{make_listing_table, with_offsets};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assembles UVM assembly into bytecode")]
struct Args {
  /// Assembly source, one instruction per line
  input: PathBuf,

  /// Where to write the binary
  output: PathBuf,

  /// List every instruction with its fields and encoded bytes
  #[arg(short, long, alias = "test")]
  verbose: bool,
}

fn main() -> Result<()> {
  let args = Args::parse();

  let source =
    fs::read_to_string(&args.input)
      .with_context(|| format!("cannot read {}", args.input.display()))?;

  // Nothing is written unless every line assembles.
  let instructions = parse_assembly(&source)?;
  if args.verbose {
    println!("{}", make_listing_table(&with_offsets(&instructions)));
  }

  let binary = encode_program(&instructions);
  fs::write(&args.output, &binary)
    .with_context(|| format!("cannot write {}", args.output.display()))?;

  println!(
    "Assembled {} instructions into {} bytes: {}",
    instructions.len(),
    binary.len(),
    args.output.display()
  );
  Ok(())
}
