//! RPN Scientific Calculator Core
//!
//! This crate provides the engine of a classic reverse-Polish scientific
//! calculator:
//! - A decimal register stack (X, Y, Z, T plus the X1 recall register)
//! - Key-driven number entry (digit/point/exponent) buffered as text
//! - One-shot F/K prefix layers remapping the next keypress
//! - Arbitrary-precision arithmetic at a fixed significant-digit limit
//!
//! # Architecture
//!
//! The engine is consumed through a narrow two-way contract:
//! - [`Processor::key_pressed`] feeds logical keys in
//! - [`Processor::connect_indicators`] streams display text out
//!
//! Everything else (rendering, physical key translation) belongs to the
//! front end; `rpn-cli` is the terminal one.

pub mod decimal;
pub mod editor;
pub mod error;
pub mod processor;

pub use decimal::{precision, Decimal};
pub use editor::NumberEditor;
pub use error::{RpnError, RpnResult};
pub use processor::{Indicator, Key, Processor};
