//! Packed 16-bit instruction words for the `i8` machine.
//!
//! The low byte holds the opcode and the high byte holds the push operand as
//! a two's-complement byte. Zero-operand instructions ignore the high byte.
//! Bytes that are not a known opcode decode to [`Op::Invalid`], which the
//! engine rejects with `InvalidOpcode` when it reaches them.

use crate::vm::op::Op;
use log::warn;

pub const OPCODE_INVALID: u8 = 0x00;
pub const OPCODE_PUSH: u8 = 0x01;
pub const OPCODE_ADD: u8 = 0x02;
pub const OPCODE_SUB: u8 = 0x03;
pub const OPCODE_MUL: u8 = 0x04;
pub const OPCODE_DIV: u8 = 0x05;
pub const OPCODE_MOD: u8 = 0x06;
pub const OPCODE_CMP: u8 = 0x07;

pub fn encode(op: &Op<i8>) -> u16 {
    match op {
        Op::Invalid => OPCODE_INVALID as u16,
        Op::Push(val) => OPCODE_PUSH as u16 | (*val as u8 as u16) << 8,
        Op::Add => OPCODE_ADD as u16,
        Op::Sub => OPCODE_SUB as u16,
        Op::Mul => OPCODE_MUL as u16,
        Op::Div => OPCODE_DIV as u16,
        Op::Mod => OPCODE_MOD as u16,
        Op::Cmp => OPCODE_CMP as u16,
    }
}

pub fn decode(word: u16) -> Op<i8> {
    let opcode = (word & 0xFF) as u8;
    match opcode {
        OPCODE_INVALID => Op::Invalid,
        OPCODE_PUSH => Op::Push((word >> 8) as u8 as i8),
        OPCODE_ADD => Op::Add,
        OPCODE_SUB => Op::Sub,
        OPCODE_MUL => Op::Mul,
        OPCODE_DIV => Op::Div,
        OPCODE_MOD => Op::Mod,
        OPCODE_CMP => Op::Cmp,
        unknown => {
            warn!("Unknown opcode byte {:#04x} in word {:#06x}", unknown, word);
            Op::Invalid
        }
    }
}

pub fn encode_program(program: &[Op<i8>]) -> Vec<u16> {
    program.iter().map(encode).collect()
}

pub fn decode_program(words: &[u16]) -> Vec<Op<i8>> {
    words.iter().map(|&word| decode(word)).collect()
}
