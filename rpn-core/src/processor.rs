//! The calculator engine: registers, entry state machine, key dispatch.
//!
//! `Processor` owns the decimal registers (X, Y, Z, T plus the X1 and X0
//! recall slots), the in-progress [`NumberEditor`], and the dispatch and
//! prefix-remap tables. The outside world talks to it through exactly two
//! doors: [`Processor::key_pressed`] for input and
//! [`Processor::connect_indicators`] for display output.

use std::str::FromStr;

use crate::decimal::{precision, Decimal};
use crate::editor::NumberEditor;
use crate::error::RpnError;

/// Logical calculator keys, independent of any physical keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Point,
    Sign,
    EnterExponent,
    Push,
    Swap,
    ClearX,
    BackX,
    Plus,
    Minus,
    Multiply,
    Divide,
    ClearF,
    Nop,
    F,
    K,
}

impl FromStr for Key {
    type Err = RpnError;

    /// Parse a batch key token, e.g. `"7"`, `"."`, `"+"`, `"push"`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let key = match token {
            "0" => Key::Zero,
            "1" => Key::One,
            "2" => Key::Two,
            "3" => Key::Three,
            "4" => Key::Four,
            "5" => Key::Five,
            "6" => Key::Six,
            "7" => Key::Seven,
            "8" => Key::Eight,
            "9" => Key::Nine,
            "." | "point" => Key::Point,
            "sign" => Key::Sign,
            "ee" => Key::EnterExponent,
            "push" | "enter" => Key::Push,
            "swap" => Key::Swap,
            "cx" => Key::ClearX,
            "bx" => Key::BackX,
            "+" => Key::Plus,
            "-" => Key::Minus,
            "*" | "x" => Key::Multiply,
            "/" => Key::Divide,
            "cf" => Key::ClearF,
            "nop" => Key::Nop,
            "f" => Key::F,
            "k" => Key::K,
            _ => return Err(RpnError::UnknownKey(token.to_string())),
        };
        Ok(key)
    }
}

/// One named piece of display output, emitted through the indicator
/// callback on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Mantissa text of the number being edited (or "ERROR").
    Mantissa,
    /// Exponent text of the number being edited.
    Exponent,
    RegisterX,
    RegisterY,
    RegisterZ,
    RegisterT,
    RegisterX1,
}

/// Arithmetic-entry state.
///
/// `Error` is a sink: once entered, only CLEAR_F, F, K or NOP leave it.
/// Other keys still run (registers keep mutating underneath) but the
/// state, and with it the error display, stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Result,
    Integer,
    Fraction,
    Exponent,
    Error,
}

/// One-shot prefix layer armed by the F and K keys. The layer survives
/// swallowed presses and is consumed by the first dispatched one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    None,
    F,
    K,
}

/// What a key does once dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Digit(char),
    Point,
    EnterExponent,
    Negate,
    Push,
    Swap,
    BackX,
    Binary(BinaryOp),
    ClearX,
    ClearF,
    PrefixF,
    PrefixK,
    Nop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Key-to-action dispatch table.
fn action_for(key: Key) -> Action {
    match key {
        Key::Zero => Action::Digit('0'),
        Key::One => Action::Digit('1'),
        Key::Two => Action::Digit('2'),
        Key::Three => Action::Digit('3'),
        Key::Four => Action::Digit('4'),
        Key::Five => Action::Digit('5'),
        Key::Six => Action::Digit('6'),
        Key::Seven => Action::Digit('7'),
        Key::Eight => Action::Digit('8'),
        Key::Nine => Action::Digit('9'),
        Key::Point => Action::Point,
        Key::Sign => Action::Negate,
        Key::EnterExponent => Action::EnterExponent,
        Key::Push => Action::Push,
        Key::Swap => Action::Swap,
        Key::ClearX => Action::ClearX,
        Key::BackX => Action::BackX,
        Key::Plus => Action::Binary(BinaryOp::Add),
        Key::Minus => Action::Binary(BinaryOp::Subtract),
        Key::Multiply => Action::Binary(BinaryOp::Multiply),
        Key::Divide => Action::Binary(BinaryOp::Divide),
        Key::ClearF => Action::ClearF,
        Key::Nop => Action::Nop,
        Key::F => Action::PrefixF,
        Key::K => Action::PrefixK,
    }
}

/// F-layer remap. Keys missing here are swallowed while F is armed.
fn remap_f(key: Key) -> Option<Key> {
    match key {
        Key::Push => Some(Key::BackX),
        Key::ClearX => Some(Key::ClearF),
        _ => None,
    }
}

/// K-layer remap. Keys missing here are swallowed while K is armed.
fn remap_k(key: Key) -> Option<Key> {
    match key {
        Key::Zero => Some(Key::Nop),
        _ => None,
    }
}

/// The clearing actions are the only way out of the error state.
fn clears_error(action: Action) -> bool {
    matches!(
        action,
        Action::ClearF | Action::Nop | Action::PrefixF | Action::PrefixK
    )
}

type IndicatorCallback = Box<dyn FnMut(Indicator, &str)>;

/// The calculator core.
pub struct Processor {
    /// Working register, always the displayed/edited number.
    x: Decimal,
    y: Decimal,
    z: Decimal,
    t: Decimal,
    /// X before the most recent operation (back-x recall).
    x1: Decimal,
    /// X before the latest commit; the exponent base during live entry.
    x0: Decimal,
    number: NumberEditor,
    state: State,
    prefix: Prefix,
    indicators: Option<IndicatorCallback>,
    /// Log each dispatched key to stderr.
    pub trace: bool,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    pub fn new() -> Self {
        Self {
            x: Decimal::zero(),
            y: Decimal::zero(),
            z: Decimal::zero(),
            t: Decimal::zero(),
            x1: Decimal::zero(),
            x0: Decimal::zero(),
            number: NumberEditor::new(),
            state: State::Ready,
            prefix: Prefix::None,
            indicators: None,
            trace: false,
        }
    }

    /// Register the display callback and emit the current state right away.
    /// There is a single subscriber slot; connecting again replaces it.
    pub fn connect_indicators(&mut self, callback: impl FnMut(Indicator, &str) + 'static) {
        self.indicators = Some(Box::new(callback));
        self.reload();
        self.display();
    }

    /// Feed one logical key press.
    ///
    /// While a prefix layer is armed the key first goes through that
    /// layer's remap table; a miss swallows the press whole (no state
    /// change, no display refresh) and leaves the layer armed.
    pub fn key_pressed(&mut self, key: Key) {
        let key = match self.prefix {
            Prefix::F => match remap_f(key) {
                Some(remapped) => remapped,
                None => return,
            },
            Prefix::K => match remap_k(key) {
                Some(remapped) => remapped,
                None => return,
            },
            Prefix::None => key,
        };
        self.prefix = Prefix::None;

        let action = action_for(key);
        if self.trace {
            eprintln!("[KEY] {:?} -> {:?}", key, action);
        }

        let sticky_error = self.state == State::Error && !clears_error(action);

        match action {
            Action::Digit(digit) => self.set_digit(digit),
            Action::Point => self.set_point(),
            Action::EnterExponent => self.set_enter_exponent(),
            Action::Negate => self.negate(),
            Action::Push => self.stack_op(|p| {
                p.t = p.z.clone();
                p.z = p.y.clone();
                p.y = p.x.clone();
                State::Ready
            }),
            Action::Swap => self.stack_op(|p| {
                p.x1 = p.x.clone();
                std::mem::swap(&mut p.x, &mut p.y);
                State::Result
            }),
            Action::BackX => self.stack_op(|p| {
                p.t = p.z.clone();
                p.z = p.y.clone();
                p.y = p.x.clone();
                p.x = p.x1.clone();
                State::Result
            }),
            Action::Binary(op) => self.binary_op(op),
            Action::ClearX => self.stack_op(|p| {
                p.x = Decimal::zero();
                State::Ready
            }),
            Action::ClearF | Action::Nop => {
                self.state = State::Ready;
                self.commit();
            }
            Action::PrefixF => self.set_prefix(Prefix::F),
            Action::PrefixK => self.set_prefix(Prefix::K),
        }

        if sticky_error {
            self.state = State::Error;
        }
        self.display();
    }

    fn set_digit(&mut self, digit: char) {
        if self.state == State::Exponent {
            // Live exponent preview: the entered digits combine with the
            // exponent of the value committed when entry started (X0).
            self.number.push_exponent_digit(digit);
            let entered = self.number.exponent().parse::<i32>().unwrap_or(0);
            let mut base = NumberEditor::new();
            base.load_decimal(&self.x0);
            let base_exponent = base.exponent().parse::<i32>().unwrap_or(0);
            let exponent = entered + base_exponent;
            if !(precision::MIN_EXPONENT..=precision::MAX_EXPONENT).contains(&exponent) {
                self.state = State::Error;
            } else {
                base.set_exponent(&exponent.to_string());
                self.x = base.to_decimal();
            }
        } else {
            if self.state == State::Result {
                // A fresh digit after a result starts a new entry: push X
                // down the stack first.
                self.x0 = self.x.clone();
                self.t = self.z.clone();
                self.z = self.y.clone();
                self.y = self.x.clone();
                self.state = State::Ready;
            }
            if self.state == State::Ready {
                self.number.reset();
                self.state = State::Integer;
            }
            if !self.number.is_mantissa_full() {
                match self.state {
                    State::Integer => self.number.push_integer_digit(digit),
                    State::Fraction => self.number.push_fraction_digit(digit),
                    _ => {}
                }
            }
            self.commit();
        }
    }

    fn set_point(&mut self) {
        if self.state == State::Exponent {
            self.state = State::Error;
        } else if self.number.has_integer_part() {
            self.state = State::Fraction;
        }
        self.commit();
    }

    fn set_enter_exponent(&mut self) {
        if self.x.is_zero() {
            self.number.force_leading_one();
        }
        self.number.pad_exponent();
        self.state = State::Exponent;
        self.commit();
        self.x0 = self.x.clone();
    }

    fn negate(&mut self) {
        if self.state == State::Exponent {
            self.number.negate_exponent();
            self.commit();
        } else {
            // Sign flip operates on the committed register, not the buffer.
            self.x1 = self.x.clone();
            self.x = -&self.x;
            self.state = State::Ready;
            self.reload();
        }
    }

    /// Zero-operand stack operation: snapshot X0, mutate, then refresh the
    /// buffer from the registers.
    fn stack_op(&mut self, op: impl FnOnce(&mut Self) -> State) {
        self.x0 = self.x.clone();
        self.state = op(self);
        self.reload();
    }

    fn binary_op(&mut self, op: BinaryOp) {
        self.x0 = self.x.clone();
        self.x1 = self.x.clone();
        self.state = match op {
            BinaryOp::Add => {
                self.x = &self.y + &self.x;
                State::Result
            }
            BinaryOp::Subtract => {
                self.x = &self.y - &self.x;
                State::Result
            }
            BinaryOp::Multiply => {
                self.x = &self.y * &self.x;
                State::Result
            }
            BinaryOp::Divide => match self.y.checked_div(&self.x) {
                Some(quotient) => {
                    self.x = quotient;
                    State::Result
                }
                None => State::Error,
            },
        };
        if self.state == State::Result {
            // The stack drops one level; T keeps its value on the drop.
            self.y = self.z.clone();
            self.z = self.t.clone();
        }
        self.reload();
    }

    fn set_prefix(&mut self, prefix: Prefix) {
        self.prefix = prefix;
        self.state = State::Ready;
        self.commit();
    }

    /// Commit the edit buffer into X.
    fn commit(&mut self) {
        self.x = self.number.to_decimal();
    }

    /// Refresh the edit buffer from X.
    fn reload(&mut self) {
        self.number.load_decimal(&self.x);
    }

    fn display(&mut self) {
        if let Some(callback) = self.indicators.as_mut() {
            callback(Indicator::RegisterX, &self.x.to_string());
            callback(Indicator::RegisterY, &self.y.to_string());
            callback(Indicator::RegisterZ, &self.z.to_string());
            callback(Indicator::RegisterT, &self.t.to_string());
            callback(Indicator::RegisterX1, &self.x1.to_string());
            if self.state == State::Error {
                callback(Indicator::Mantissa, "ERROR");
                callback(Indicator::Exponent, "");
            } else {
                callback(Indicator::Mantissa, &self.number.mantissa());
                callback(Indicator::Exponent, &self.number.exponent());
            }
        }
    }
}
