//! Translates assembly text into machine instructions.
//!
//! # Syntax
//!
//! ```text
//! PUSH 3      # one instruction per line
//! push 5
//! ADD
//! ```
//!
//! - Mnemonics are case-insensitive: `PUSH <operand>`, `ADD`, `SUB`, `MUL`,
//!   `DIV`, `MOD`, `CMP`
//! - Comments start with `#`; blank lines are ignored
//! - Integer operands wider than the machine's numeric type are wrapped to fit

use crate::vm::op::Op;
use crate::vm::value::Value;
use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

const COMMENT_CHAR: char = '#';

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Failed to read program file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("line {line}: malformed instruction '{text}'")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },
    #[error("line {line}: {mnemonic} requires an operand")]
    MissingOperand { line: usize, mnemonic: String },
    #[error("line {line}: {mnemonic} does not take an operand")]
    UnexpectedOperand { line: usize, mnemonic: String },
    #[error("line {line}: '{operand}' is not a valid {numeric} operand")]
    InvalidOperand {
        line: usize,
        operand: String,
        numeric: &'static str,
    },
}

/// Assembles a whole source text.
pub fn assemble<V: Value>(source: &str) -> Result<Vec<Op<V>>, AssemblyError> {
    let mut program = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        program.push(parse_instruction(idx + 1, text)?);
    }
    debug!("Assembled {} {} instructions", program.len(), V::NAME);
    Ok(program)
}

/// Reads and assembles a program file.
pub fn assemble_file<V: Value>(path: &Path) -> Result<Vec<Op<V>>, AssemblyError> {
    let content = fs::read_to_string(path)?;
    assemble(&content)
}

/// Parses a single instruction such as `PUSH 5` or `add`.
/// `line` is only used for error reporting.
pub fn parse_instruction<V: Value>(line: usize, text: &str) -> Result<Op<V>, AssemblyError> {
    lazy_static::lazy_static! {
        static ref INSTRUCTION_REGEX: Regex =
            Regex::new(r"^(?P<mnemonic>[A-Za-z]+)(?:\s+(?P<operand>\S+))?$").unwrap();
    }

    let caps = INSTRUCTION_REGEX
        .captures(text)
        .ok_or_else(|| AssemblyError::MalformedLine {
            line,
            text: text.to_string(),
        })?;
    let mnemonic = caps["mnemonic"].to_ascii_uppercase();
    let operand = caps.name("operand").map(|m| m.as_str());

    let op = match mnemonic.as_str() {
        "PUSH" => {
            let operand = operand.ok_or_else(|| AssemblyError::MissingOperand {
                line,
                mnemonic: mnemonic.clone(),
            })?;
            return parse_push(line, operand);
        }
        "ADD" => Op::Add,
        "SUB" => Op::Sub,
        "MUL" => Op::Mul,
        "DIV" => Op::Div,
        "MOD" => Op::Mod,
        "CMP" => Op::Cmp,
        _ => return Err(AssemblyError::UnknownMnemonic { line, mnemonic }),
    };

    if operand.is_some() {
        return Err(AssemblyError::UnexpectedOperand { line, mnemonic });
    }
    Ok(op)
}

fn parse_push<V: Value>(line: usize, operand: &str) -> Result<Op<V>, AssemblyError> {
    let (val, wrapped) =
        V::parse_operand(operand).ok_or_else(|| AssemblyError::InvalidOperand {
            line,
            operand: operand.to_string(),
            numeric: V::NAME,
        })?;
    if wrapped {
        warn!(
            "line {}: operand {} does not fit {} and wraps to {}",
            line,
            operand,
            V::NAME,
            val
        );
    }
    Ok(Op::Push(val))
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHAR) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_program() {
        let source = "PUSH 3\nPUSH 5\nPUSH 8\nSUB\nADD\n";
        assert_eq!(
            assemble::<i8>(source).unwrap(),
            vec![Op::Push(3), Op::Push(5), Op::Push(8), Op::Sub, Op::Add]
        );
    }

    #[test]
    fn test_mnemonics_are_case_insensitive() {
        let program = assemble::<i8>("push 1\nPush 2\nmul\nCmp\nmod\nDiv").unwrap();
        assert_eq!(
            program,
            vec![Op::Push(1), Op::Push(2), Op::Mul, Op::Cmp, Op::Mod, Op::Div]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let source = "# header\n\n   PUSH -4   # negative\n\t\nPUSH 2\nDIV # divide\n";
        assert_eq!(
            assemble::<i8>(source).unwrap(),
            vec![Op::Push(-4), Op::Push(2), Op::Div]
        );
        assert!(assemble::<i8>("").unwrap().is_empty());
    }

    #[test]
    fn test_float_operands() {
        assert_eq!(
            assemble::<f64>("PUSH 1.5\nPUSH -2\nMUL").unwrap(),
            vec![Op::Push(1.5), Op::Push(-2.0), Op::Mul]
        );
    }

    #[test]
    fn test_wide_integer_operand_wraps() {
        assert_eq!(assemble::<i8>("PUSH 200").unwrap(), vec![Op::Push(-56)]);
        assert_eq!(assemble::<i16>("PUSH 200").unwrap(), vec![Op::Push(200)]);
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = assemble::<i8>("PUSH 1\nJMP 0").unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::UnknownMnemonic { line: 2, ref mnemonic } if mnemonic == "JMP"
        ));
    }

    #[test]
    fn test_operand_arity() {
        assert!(matches!(
            assemble::<i8>("PUSH"),
            Err(AssemblyError::MissingOperand { line: 1, .. })
        ));
        assert!(matches!(
            assemble::<i8>("PUSH 1\nADD 2"),
            Err(AssemblyError::UnexpectedOperand { line: 2, .. })
        ));
        assert!(matches!(
            assemble::<i8>("PUSH 1 2"),
            Err(AssemblyError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_operand() {
        let err = assemble::<i8>("PUSH 1.5").unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::InvalidOperand { line: 1, numeric: "i8", .. }
        ));
        assert_eq!(
            err.to_string(),
            "line 1: '1.5' is not a valid i8 operand"
        );
    }

    #[test]
    fn test_display_output_assembles_back() {
        let op: Op<i8> = parse_instruction(1, &Op::Push(-7i8).to_string()).unwrap();
        assert_eq!(op, Op::Push(-7));
    }

    #[test]
    fn test_missing_file() {
        let result = assemble_file::<i8>(Path::new("does/not/exist.asm"));
        assert!(matches!(result, Err(AssemblyError::FileReadError(_))));
    }
}
