/*!
  The human readable textual form of bytecode is called assembly. This module leverages the
  `strum` derives of `Opcode` to resolve mnemonics and `nom` to split lines into tokens.

  One instruction per line. `#` starts a comment that runs to the end of the line, and
  blank lines are ignored. A line is a mnemonic, in any case, followed by its integer
  arguments separated by whitespace:

  ```text
  LOAD_CONST const addr
  READ_MEM   offset src dst
  WRITE_MEM  src dst
  GTE        offset1 addr1 addr2 res offset2
  ```
*/

use std::num::IntErrorKind;
use std::str::FromStr;

use nom::{
  bytes::complete::{take_till1, take_while1},
  combinator::all_consuming,
  multi::many0,
  sequence::{pair, preceded},
  IResult
};

use super::layout::Field;
use super::{encode_program, Instruction, Opcode};
use crate::errors::{AssemblyError, ParseError, ValidationError};

const COMMENT: char = '#';

fn token(input: &str) -> IResult<&str, &str> {
  take_till1(char::is_whitespace)(input)
}

fn separator(input: &str) -> IResult<&str, &str> {
  take_while1(char::is_whitespace)(input)
}

/// Splits a comment-free, trimmed, nonempty line into the mnemonic and its arguments.
fn tokens(line: &str) -> IResult<&str, (&str, Vec<&str>)> {
  all_consuming(pair(token, many0(preceded(separator, token))))(line)
}

/**
  Reads the argument for `field`. A well formed integer too large for an `i64` can only be
  out of range, so it is reported against the field like any other out of range operand.
*/
fn parse_argument(field: &Field, argument: &str) -> Result<i64, ParseError> {
  argument.parse::<i64>().map_err(|e| {
    match e.kind() {
      IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
        ParseError::Validation(ValidationError {
          field : field.name,
          value : argument.to_string(),
          max   : (1u64 << field.width) - 1,
        })
      }
      _ => ParseError::NotAnInteger(argument.to_string())
    }
  })
}

/**
  Resolves one line of assembly. Blank and comment-only lines give `Ok(None)`.

  Arguments are read as signed integers, so a negative operand is reported as out of range
  for its field rather than as a malformed number.
*/
pub fn parse_line(line: &str) -> Result<Option<Instruction>, ParseError> {
  let code = match line.find(COMMENT) {
    Some(idx) => &line[..idx],
    None      => line
  }.trim();
  if code.is_empty() {
    return Ok(None);
  }

  let (_rest, (mnemonic, arguments)) = tokens(code).map_err(|_| ParseError::Malformed)?;

  let opcode =
    Opcode::from_str(&mnemonic.to_uppercase())
      .map_err(|_| ParseError::UnknownMnemonic(mnemonic.to_string()))?;

  if arguments.len() != opcode.arity() {
    return Err(ParseError::WrongArity {
      opcode,
      expected : opcode.arity(),
      given    : arguments.len()
    });
  }

  let operands =
    opcode.layout()[1..]
      .iter()
      .zip(arguments.iter())
      .map(|(field, argument)| parse_argument(field, argument))
      .collect::<Result<Vec<i64>, ParseError>>()?;

  Ok(Some(Instruction::from_operands(opcode, &operands)?))
}

/// Parses a whole program. The first bad line aborts parsing.
pub fn parse_assembly(text: &str) -> Result<Vec<Instruction>, AssemblyError> {
  let mut instructions = Vec::new();

  for (idx, line) in text.lines().enumerate() {
    match parse_line(line) {
      Ok(Some(instruction)) => instructions.push(instruction),
      Ok(None)              => {}
      Err(source)           => {
        return Err(AssemblyError {
          line : idx + 1,
          text : line.trim().to_string(),
          source
        });
      }
    }
  }
  Ok(instructions)
}

/// Parses and encodes a whole program. Nothing is produced if any line is bad.
pub fn assemble(text: &str) -> Result<Vec<u8>, AssemblyError> {
  parse_assembly(text).map(|instructions| encode_program(&instructions))
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_each_mnemonic() {
    assert_eq!(parse_line("LOAD_CONST 5 0"), Ok(Some(Instruction::load_const(5, 0).unwrap())));
    assert_eq!(parse_line("READ_MEM 2 0 6"), Ok(Some(Instruction::read_mem(2, 0, 6).unwrap())));
    assert_eq!(parse_line("WRITE_MEM 3 4"), Ok(Some(Instruction::write_mem(3, 4).unwrap())));
    assert_eq!(
      parse_line("GTE 0 0 1 2 0"),
      Ok(Some(Instruction::gte(0, 0, 1, 2, 0).unwrap()))
    );
  }

  #[test]
  fn test_mnemonic_is_case_insensitive() {
    assert_eq!(parse_line("load_const 5 0"), parse_line("LOAD_CONST 5 0"));
    assert_eq!(parse_line("Write_Mem 3 4"), parse_line("WRITE_MEM 3 4"));
  }

  #[test]
  fn test_whitespace_and_comments() {
    assert_eq!(parse_line(""), Ok(None));
    assert_eq!(parse_line("   \t "), Ok(None));
    assert_eq!(parse_line("# just a comment"), Ok(None));
    assert_eq!(
      parse_line("  GTE\t0  0 1   2 0   # compare\r"),
      Ok(Some(Instruction::gte(0, 0, 1, 2, 0).unwrap()))
    );
  }

  #[test]
  fn test_unknown_mnemonic() {
    assert_eq!(
      parse_line("JMP 4"),
      Err(ParseError::UnknownMnemonic("JMP".to_string()))
    );
  }

  #[test]
  fn test_wrong_arity() {
    assert_eq!(
      parse_line("WRITE_MEM 1 2 3"),
      Err(ParseError::WrongArity { opcode: Opcode::WriteMem, expected: 2, given: 3 })
    );
    assert_eq!(
      parse_line("GTE"),
      Err(ParseError::WrongArity { opcode: Opcode::Gte, expected: 5, given: 0 })
    );
  }

  #[test]
  fn test_non_integer_argument() {
    assert_eq!(
      parse_line("LOAD_CONST five 0"),
      Err(ParseError::NotAnInteger("five".to_string()))
    );
  }

  #[test]
  fn test_out_of_range_argument() {
    assert_eq!(
      parse_line("LOAD_CONST 2048 0"),
      Err(ParseError::Validation(ValidationError {
        field : "constant",
        value : "2048".to_string(),
        max   : 2047
      }))
    );
    assert_eq!(
      parse_line("READ_MEM -1 0 0"),
      Err(ParseError::Validation(ValidationError {
        field : "offset",
        value : "-1".to_string(),
        max   : 255
      }))
    );
  }

  #[test]
  fn test_argument_beyond_i64_is_out_of_range() {
    assert_eq!(
      parse_line("LOAD_CONST 99999999999999999999 0"),
      Err(ParseError::Validation(ValidationError {
        field : "constant",
        value : "99999999999999999999".to_string(),
        max   : 2047
      }))
    );
    assert_eq!(
      parse_line("GTE 0 0 -99999999999999999999 0 0"),
      Err(ParseError::Validation(ValidationError {
        field : "addr2",
        value : "-99999999999999999999".to_string(),
        max   : (1 << 26) - 1
      }))
    );
    assert_eq!(
      parse_line("LOAD_CONST 9223372036854775807 0"),
      Err(ParseError::Validation(ValidationError {
        field : "constant",
        value : "9223372036854775807".to_string(),
        max   : 2047
      }))
    );
    assert_eq!(
      parse_line("LOAD_CONST 1e30 0"),
      Err(ParseError::NotAnInteger("1e30".to_string()))
    );
  }

  #[test]
  fn test_any_whitespace_separates_tokens() {
    assert_eq!(
      parse_line("WRITE_MEM\u{00A0}3\u{2003}4"),
      Ok(Some(Instruction::write_mem(3, 4).unwrap()))
    );
    assert_eq!(
      parse_line("\u{00A0}LOAD_CONST 5\u{000B}0\u{00A0}"),
      Ok(Some(Instruction::load_const(5, 0).unwrap()))
    );
  }

  #[test]
  fn test_parse_assembly_skips_blank_lines() {
    let text = "
      # scenario D
      LOAD_CONST 42 3

      WRITE_MEM 3 4   # copy
    ";
    assert_eq!(
      parse_assembly(text).unwrap(),
      vec![
        Instruction::load_const(42, 3).unwrap(),
        Instruction::write_mem(3, 4).unwrap(),
      ]
    );
  }

  #[test]
  fn test_error_reports_line() {
    let text = "LOAD_CONST 1 0\n\nREAD_MEM 1 2\n";
    let error = parse_assembly(text).unwrap_err();
    assert_eq!(error.line, 3);
    assert_eq!(error.text, "READ_MEM 1 2");
    assert_eq!(
      error.source,
      ParseError::WrongArity { opcode: Opcode::ReadMem, expected: 3, given: 2 }
    );
    assert_eq!(
      error.to_string(),
      "Error on line 3: READ_MEM requires 3 arguments but was given 2. (READ_MEM 1 2)"
    );
  }

  #[test]
  fn test_assemble_produces_no_partial_output() {
    assert!(assemble("LOAD_CONST 1 0\nLOAD_CONST 4096 0").is_err());
    assert_eq!(assemble("LOAD_CONST 5 0").unwrap(), vec![0xEF, 0x02, 0, 0, 0, 0]);
    assert_eq!(assemble("").unwrap(), Vec::<u8>::new());
  }
}
