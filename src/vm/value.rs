use crate::vm::engine::VmError;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// Arithmetic policy of a numeric type the virtual machine can run on.
///
/// Fixed-width integers wrap on overflow (two's complement), so e.g. an `i8`
/// machine computes `100 + 100 = -56`. `f64` follows IEEE arithmetic and never
/// wraps, but its `remainder` only accepts whole operands.
pub trait Value: Copy + PartialEq + Debug + Display {
    /// Name used in diagnostics and configuration (`"i8"`, `"f64"`, ...).
    const NAME: &'static str;

    /// Result of a program that halts with an empty stack.
    fn zero() -> Self;

    fn plus(self, rhs: Self) -> Self;
    fn minus(self, rhs: Self) -> Self;
    fn times(self, rhs: Self) -> Self;

    /// `self / rhs`, failing with `DivisionByZero` when `rhs` is zero.
    fn divide(self, rhs: Self) -> Result<Self, VmError>;

    /// Truncated remainder; the sign follows `self`.
    fn remainder(self, rhs: Self) -> Result<Self, VmError>;

    /// Three-way comparison as -1, 0 or 1.
    fn compare(self, rhs: Self) -> Self;

    /// Parses an assembly operand. The flag is set when the literal did not
    /// fit the type and was wrapped.
    fn parse_operand(text: &str) -> Option<(Self, bool)>;
}

macro_rules! impl_wrapping_value {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Value for $t {
                const NAME: &'static str = $name;

                fn zero() -> Self {
                    0
                }

                fn plus(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                fn minus(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                fn times(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                fn divide(self, rhs: Self) -> Result<Self, VmError> {
                    if rhs == 0 {
                        return Err(VmError::DivisionByZero);
                    }
                    // MIN / -1 wraps back to MIN.
                    Ok(self.wrapping_div(rhs))
                }

                fn remainder(self, rhs: Self) -> Result<Self, VmError> {
                    if rhs == 0 {
                        return Err(VmError::DivisionByZero);
                    }
                    Ok(self.wrapping_rem(rhs))
                }

                fn compare(self, rhs: Self) -> Self {
                    match self.cmp(&rhs) {
                        Ordering::Less => -1,
                        Ordering::Equal => 0,
                        Ordering::Greater => 1,
                    }
                }

                fn parse_operand(text: &str) -> Option<(Self, bool)> {
                    let wide = text.parse::<i64>().ok()?;
                    let narrow = wide as $t;
                    Some((narrow, narrow as i64 != wide))
                }
            }
        )*
    };
}

impl_wrapping_value!(i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64");

impl Value for f64 {
    const NAME: &'static str = "f64";

    fn zero() -> Self {
        0.0
    }

    fn plus(self, rhs: Self) -> Self {
        self + rhs
    }

    fn minus(self, rhs: Self) -> Self {
        self - rhs
    }

    fn times(self, rhs: Self) -> Self {
        self * rhs
    }

    fn divide(self, rhs: Self) -> Result<Self, VmError> {
        if rhs == 0.0 {
            return Err(VmError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    fn remainder(self, rhs: Self) -> Result<Self, VmError> {
        if rhs == 0.0 {
            return Err(VmError::DivisionByZero);
        }
        // fract() is NaN for infinities and NaN, so those are rejected too.
        if self.fract() != 0.0 || rhs.fract() != 0.0 {
            return Err(VmError::NonIntegralOperand);
        }
        Ok(self % rhs)
    }

    fn compare(self, rhs: Self) -> Self {
        match self.partial_cmp(&rhs) {
            Some(Ordering::Less) => -1.0,
            Some(Ordering::Greater) => 1.0,
            // Unordered (NaN) compares as equal.
            Some(Ordering::Equal) | None => 0.0,
        }
    }

    fn parse_operand(text: &str) -> Option<(Self, bool)> {
        text.parse::<f64>().ok().map(|val| (val, false))
    }
}
