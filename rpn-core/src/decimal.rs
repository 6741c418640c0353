//! Arbitrary-precision decimal values with the calculator's numeric policy.
//!
//! `Decimal` wraps [`bigdecimal::BigDecimal`] and pins down the behavior the
//! rest of the machine relies on:
//! - every arithmetic result is rounded to [`precision::MAX_DIGITS`]
//!   significant digits, half up on ties
//! - the canonical string form switches to scientific notation outside a
//!   fixed exponent window, so register display stays bounded

use std::fmt;
use std::num::NonZeroU64;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use bigdecimal::rounding::RoundingMode;
use bigdecimal::{BigDecimal, Zero};

use crate::error::RpnError;

/// Numeric limits of the machine.
pub mod precision {
    /// Significant mantissa digits kept by every operation.
    pub const MAX_DIGITS: usize = 8;
    /// Width of the exponent entry field (a shift register of digits).
    pub const EXPONENT_DIGITS: usize = 2;
    /// Smallest exponent accepted during exponent entry.
    pub const MIN_EXPONENT: i32 = -99;
    /// Largest exponent accepted during exponent entry.
    pub const MAX_EXPONENT: i32 = 99;
}

/// Adjusted exponent at and above which display uses `de+N` form.
const TO_EXP_POS: i64 = precision::MAX_DIGITS as i64;
/// Adjusted exponent at and below which display uses `de-N` form.
const TO_EXP_NEG: i64 = -1;

/// An arbitrary-precision decimal register value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn zero() -> Self {
        Decimal(BigDecimal::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Division at the machine's precision. `None` when the divisor is zero;
    /// the engine turns that into its error display state rather than a
    /// numeric exception.
    pub fn checked_div(&self, divisor: &Decimal) -> Option<Decimal> {
        if divisor.is_zero() {
            return None;
        }
        Some(Decimal(rounded(&self.0 / &divisor.0)))
    }
}

/// Round to the significant-digit limit, half up.
fn rounded(value: BigDecimal) -> BigDecimal {
    match NonZeroU64::new(precision::MAX_DIGITS as u64) {
        Some(digits) => value.with_precision_round(digits, RoundingMode::HalfUp),
        None => value,
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(rounded(&self.0 + &rhs.0))
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal(rounded(&self.0 - &rhs.0))
    }
}

impl Mul for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal(rounded(&self.0 * &rhs.0))
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-&self.0)
    }
}

impl FromStr for Decimal {
    type Err = RpnError;

    /// Parse `[sign]digits[.digits][e[sign]digits]`. Input is kept exact;
    /// rounding applies to operation results only.
    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        Ok(Decimal(BigDecimal::from_str(literal)?))
    }
}

impl fmt::Display for Decimal {
    /// Canonical form: plain decimal notation while the adjusted exponent
    /// stays inside the display window, `d[.ddd]e±N` outside it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("0");
        }

        let normalized = self.0.normalized();
        let (unscaled, scale) = normalized.as_bigint_and_exponent();
        let mut digits = unscaled.to_string();
        let negative = digits.starts_with('-');
        if negative {
            digits.remove(0);
        }
        // Exponent of the leading digit: value = 0.digits * 10^(adjusted+1)
        let adjusted = digits.len() as i64 - 1 - scale;

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        if adjusted >= TO_EXP_POS || adjusted <= TO_EXP_NEG {
            out.push_str(&digits[..1]);
            if digits.len() > 1 {
                out.push('.');
                out.push_str(&digits[1..]);
            }
            out.push('e');
            out.push(if adjusted < 0 { '-' } else { '+' });
            out.push_str(&adjusted.abs().to_string());
        } else if scale <= 0 {
            out.push_str(&digits);
            for _ in 0..-scale {
                out.push('0');
            }
        } else {
            let point = digits.len() - scale as usize;
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
        f.write_str(&out)
    }
}
