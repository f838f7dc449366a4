use std::fmt;

/// A single instruction, generic over the numeric type the machine runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op<V> {
    /// Reserved tag for a word that did not decode to a real instruction.
    Invalid,

    // --- Data Loading ---
    Push(V),

    // --- Binary Operators ---
    Add,
    Sub,
    Mul,
    Div, // Fails on a zero divisor instead of producing a value.
    Mod,
    Cmp,
}

impl<V> Op<V> {
    /// Assembly mnemonic for this instruction.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Invalid => "INVALID",
            Op::Push(_) => "PUSH",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Mod => "MOD",
            Op::Cmp => "CMP",
        }
    }

    /// Whether the instruction consumes two operands and pushes one.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Op::Invalid | Op::Push(_))
    }
}

impl<V: fmt::Display> fmt::Display for Op<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Push(val) => write!(f, "PUSH {}", val),
            other => f.write_str(other.mnemonic()),
        }
    }
}
