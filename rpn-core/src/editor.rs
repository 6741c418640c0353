//! Keystroke-level decimal-literal buffer.
//!
//! `NumberEditor` holds the number being typed as five separate strings
//! (mantissa sign, integer digits, fraction digits, exponent sign, exponent
//! digits) rather than as a numeric type, so partial input renders exactly
//! as typed before it is committed to a register.

use crate::decimal::{precision, Decimal};

/// The in-progress textual representation of a number being typed.
#[derive(Debug, Default, Clone)]
pub struct NumberEditor {
    sign: String,
    int_digits: String,
    frac_digits: String,
    exp_sign: String,
    exp_digits: String,
}

impl NumberEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mantissa display text. Always a complete literal: an empty integer
    /// field renders as "0" and the point is always present ("-12.", "0.5").
    pub fn mantissa(&self) -> String {
        let integer = if self.int_digits.is_empty() {
            "0"
        } else {
            &self.int_digits
        };
        format!("{}{}.{}", self.sign, integer, self.frac_digits)
    }

    /// Exponent display text, empty when no exponent has been entered.
    pub fn exponent(&self) -> String {
        format!("{}{}", self.exp_sign, self.exp_digits)
    }

    /// Replace the exponent from free text: an optional sign, then a digit
    /// run. Only `-` is retained as a sign; digits are zero-padded (never
    /// truncated) to the entry-field width.
    pub fn set_exponent(&mut self, text: &str) {
        let (sign, rest) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.strip_prefix('+').unwrap_or(text)),
        };
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        self.exp_sign = sign.to_string();
        self.exp_digits = format!("{:0>width$}", digits, width = precision::EXPONENT_DIGITS);
    }

    /// Reload the buffer from a committed register value.
    pub fn load_decimal(&mut self, value: &Decimal) {
        self.reset();
        let rendered = value.to_string();
        let mut rest = rendered.as_str();
        if let Some(stripped) = rest.strip_prefix('-') {
            self.sign.push('-');
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped;
        }
        let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, Some(exponent)),
            None => (rest, None),
        };
        match mantissa.split_once('.') {
            Some((integer, fraction)) => {
                self.int_digits.push_str(integer);
                self.frac_digits.push_str(fraction);
            }
            None => self.int_digits.push_str(mantissa),
        }
        if let Some(exponent) = exponent {
            let digits = match exponent.strip_prefix('-') {
                Some(stripped) => {
                    self.exp_sign.push('-');
                    stripped
                }
                None => exponent.strip_prefix('+').unwrap_or(exponent),
            };
            self.exp_digits = format!("{:0>width$}", digits, width = precision::EXPONENT_DIGITS);
        }
    }

    /// Reassemble the buffer into a literal and commit it to a decimal.
    pub fn to_decimal(&self) -> Decimal {
        let integer = if self.int_digits.is_empty() {
            "0"
        } else {
            &self.int_digits
        };
        let mut literal = format!("{}{}", self.sign, integer);
        if !self.frac_digits.is_empty() {
            literal.push('.');
            literal.push_str(&self.frac_digits);
        }
        if !self.exp_digits.is_empty() {
            literal.push('e');
            literal.push_str(&self.exp_sign);
            literal.push_str(&self.exp_digits);
        }
        // The fields only ever hold sign and digit characters.
        literal.parse().unwrap_or_else(|_| Decimal::zero())
    }

    /// Clear all five fields.
    pub fn reset(&mut self) {
        self.sign.clear();
        self.int_digits.clear();
        self.frac_digits.clear();
        self.exp_sign.clear();
        self.exp_digits.clear();
    }

    /// Zero-fill the exponent field for the start of exponent entry.
    pub fn pad_exponent(&mut self) {
        self.exp_sign.clear();
        self.exp_digits = "0".repeat(precision::EXPONENT_DIGITS);
    }

    /// Replace the leading integer digit with `1` and drop the fraction,
    /// so exponent entry on a zero register edits `1eNN` instead of `0eNN`.
    pub fn force_leading_one(&mut self) {
        let mut integer = String::from("1");
        integer.extend(self.int_digits.chars().skip(1));
        self.int_digits = integer;
        self.frac_digits.clear();
    }

    pub fn has_integer_part(&self) -> bool {
        !self.int_digits.is_empty()
    }

    pub fn is_mantissa_full(&self) -> bool {
        self.int_digits.len() + self.frac_digits.len() >= precision::MAX_DIGITS
    }

    pub fn push_integer_digit(&mut self, digit: char) {
        self.int_digits.push(digit);
    }

    pub fn push_fraction_digit(&mut self, digit: char) {
        self.frac_digits.push(digit);
    }

    /// Shift-register append: the oldest exponent digit falls out, the new
    /// one enters on the right, and the field keeps its fixed width.
    pub fn push_exponent_digit(&mut self, digit: char) {
        let mut digits: String = self.exp_digits.chars().skip(1).collect();
        digits.push(digit);
        self.exp_digits = digits;
    }

    /// Toggle the exponent sign between empty and `-`.
    pub fn negate_exponent(&mut self) {
        if self.exp_sign == "-" {
            self.exp_sign.clear();
        } else {
            self.exp_sign = "-".to_string();
        }
    }
}
