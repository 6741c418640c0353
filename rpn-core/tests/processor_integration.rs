//! Integration tests driving the engine through whole key sequences and
//! observing it the way a front end does: via the indicator callback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rpn_core::{Indicator, Key, Processor};

type Panel = Rc<RefCell<HashMap<Indicator, String>>>;

/// Attach a headless panel recording the latest value of every indicator.
fn attach(processor: &mut Processor) -> Panel {
    let panel: Panel = Rc::new(RefCell::new(HashMap::new()));
    let sink = Rc::clone(&panel);
    processor.connect_indicators(move |indicator, value| {
        sink.borrow_mut().insert(indicator, value.to_string());
    });
    panel
}

fn press(processor: &mut Processor, keys: &[Key]) {
    for &key in keys {
        processor.key_pressed(key);
    }
}

fn shown(panel: &Panel, indicator: Indicator) -> String {
    panel.borrow().get(&indicator).cloned().unwrap_or_default()
}

#[test]
fn test_connect_emits_initial_state() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    assert_eq!(shown(&panel, Indicator::RegisterX), "0");
    assert_eq!(shown(&panel, Indicator::RegisterT), "0");
    assert_eq!(shown(&panel, Indicator::Mantissa), "0.");
    assert_eq!(shown(&panel, Indicator::Exponent), "");
}

#[test]
fn test_digit_entry_shows_mantissa_as_typed() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::One, Key::Two, Key::Point, Key::Three, Key::Four],
    );
    assert_eq!(shown(&panel, Indicator::Mantissa), "12.34");
    assert_eq!(shown(&panel, Indicator::RegisterX), "12.34");
}

#[test]
fn test_mantissa_full_digits_are_dropped() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[
            Key::One,
            Key::Two,
            Key::Three,
            Key::Four,
            Key::Five,
            Key::Six,
            Key::Seven,
            Key::Eight,
            Key::Nine,
        ],
    );
    assert_eq!(shown(&panel, Indicator::Mantissa), "12345678.");
    assert_eq!(shown(&panel, Indicator::RegisterX), "12345678");
}

#[test]
fn test_push_rotates_stack() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[
            Key::Four,
            Key::Push,
            Key::Three,
            Key::Push,
            Key::Two,
            Key::Push,
            Key::One,
        ],
    );
    assert_eq!(shown(&panel, Indicator::RegisterX), "1");
    assert_eq!(shown(&panel, Indicator::RegisterY), "2");
    assert_eq!(shown(&panel, Indicator::RegisterZ), "3");
    assert_eq!(shown(&panel, Indicator::RegisterT), "4");

    processor.key_pressed(Key::Push);
    assert_eq!(shown(&panel, Indicator::RegisterX), "1");
    assert_eq!(shown(&panel, Indicator::RegisterY), "1");
    assert_eq!(shown(&panel, Indicator::RegisterZ), "2");
    assert_eq!(shown(&panel, Indicator::RegisterT), "3");
}

#[test]
fn test_binary_op_drops_stack_keeping_t() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[
            Key::Five,
            Key::Push,
            Key::Six,
            Key::Push,
            Key::Three,
            Key::Push,
            Key::Four,
            Key::Plus,
        ],
    );
    assert_eq!(shown(&panel, Indicator::RegisterX), "7");
    assert_eq!(shown(&panel, Indicator::RegisterY), "6");
    assert_eq!(shown(&panel, Indicator::RegisterZ), "5");
    // T is not cleared by the drop.
    assert_eq!(shown(&panel, Indicator::RegisterT), "5");
    assert_eq!(shown(&panel, Indicator::RegisterX1), "4");
    assert_eq!(shown(&panel, Indicator::Mantissa), "7.");
}

#[test]
fn test_digit_after_result_pushes_first() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::Three, Key::Push, Key::Four, Key::Plus, Key::Two],
    );
    assert_eq!(shown(&panel, Indicator::RegisterX), "2");
    assert_eq!(shown(&panel, Indicator::RegisterY), "7");
}

#[test]
fn test_swap_exchanges_x_and_y() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(&mut processor, &[Key::Three, Key::Push, Key::Four, Key::Swap]);
    assert_eq!(shown(&panel, Indicator::RegisterX), "3");
    assert_eq!(shown(&panel, Indicator::RegisterY), "4");
    assert_eq!(shown(&panel, Indicator::RegisterX1), "4");
}

#[test]
fn test_division_by_zero_sets_error_display() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::One, Key::Zero, Key::Push, Key::ClearX, Key::Divide],
    );
    assert_eq!(shown(&panel, Indicator::Mantissa), "ERROR");
    assert_eq!(shown(&panel, Indicator::Exponent), "");
    // Registers are untouched by the failed divide.
    assert_eq!(shown(&panel, Indicator::RegisterX), "0");
    assert_eq!(shown(&panel, Indicator::RegisterY), "10");
}

#[test]
fn test_clear_f_recovers_from_error() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::One, Key::Push, Key::ClearX, Key::Divide],
    );
    assert_eq!(shown(&panel, Indicator::Mantissa), "ERROR");
    processor.key_pressed(Key::ClearF);
    assert_eq!(shown(&panel, Indicator::Mantissa), "0.");
}

#[test]
fn test_arithmetic_keys_do_not_leave_error() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::One, Key::Push, Key::ClearX, Key::Divide, Key::Plus],
    );
    // Registers keep mutating underneath (1 + 0 ran), but only the
    // clearing keys leave the error display.
    assert_eq!(shown(&panel, Indicator::Mantissa), "ERROR");
    assert_eq!(shown(&panel, Indicator::RegisterX), "1");
}

#[test]
fn test_exponent_entry_from_zero_defaults_to_one() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    processor.key_pressed(Key::EnterExponent);
    assert_eq!(shown(&panel, Indicator::Mantissa), "1.");
    assert_eq!(shown(&panel, Indicator::Exponent), "00");

    processor.key_pressed(Key::Five);
    assert_eq!(shown(&panel, Indicator::Exponent), "05");
    // Live preview: X already holds 1e5.
    assert_eq!(shown(&panel, Indicator::RegisterX), "100000");
}

#[test]
fn test_exponent_sign_toggles_in_entry() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(&mut processor, &[Key::EnterExponent, Key::Sign, Key::Three]);
    assert_eq!(shown(&panel, Indicator::Exponent), "-03");
    assert_eq!(shown(&panel, Indicator::RegisterX), "1e-3");
}

#[test]
fn test_exponent_out_of_range_sets_error() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    // Type 0.0000001 (committed canonical form 1e-7), then pile a -99
    // entry on top of the -7 base: -106 is outside the machine's range.
    press(
        &mut processor,
        &[
            Key::Zero,
            Key::Point,
            Key::Zero,
            Key::Zero,
            Key::Zero,
            Key::Zero,
            Key::Zero,
            Key::Zero,
            Key::One,
            Key::EnterExponent,
            Key::Sign,
            Key::Nine,
        ],
    );
    // -09 entered so far: -9 + -7 = -16, still in range.
    assert_eq!(shown(&panel, Indicator::RegisterX), "1e-16");
    processor.key_pressed(Key::Nine);
    assert_eq!(shown(&panel, Indicator::Mantissa), "ERROR");
}

#[test]
fn test_point_during_exponent_entry_is_an_error() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(&mut processor, &[Key::EnterExponent, Key::Point]);
    assert_eq!(shown(&panel, Indicator::Mantissa), "ERROR");
}

#[test]
fn test_point_before_any_digit_is_ignored() {
    // Before the first display sync the integer field is empty, so a
    // leading point does not start fraction entry.
    let mut processor = Processor::new();
    press(&mut processor, &[Key::Point, Key::Five]);
    let panel = attach(&mut processor);
    assert_eq!(shown(&panel, Indicator::RegisterX), "5");
}

#[test]
fn test_point_after_zero_starts_fraction() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(&mut processor, &[Key::Zero, Key::Point, Key::Five]);
    assert_eq!(shown(&panel, Indicator::Mantissa), "0.5");
    assert_eq!(shown(&panel, Indicator::RegisterX), "5e-1");
}

#[test]
fn test_sign_negates_committed_register() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(&mut processor, &[Key::Seven, Key::Sign]);
    assert_eq!(shown(&panel, Indicator::RegisterX), "-7");
    assert_eq!(shown(&panel, Indicator::Mantissa), "-7.");
    // The pre-negation value is recallable.
    assert_eq!(shown(&panel, Indicator::RegisterX1), "7");
}

#[test]
fn test_f_layer_remaps_push_to_back_x() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::Five, Key::Push, Key::Seven, Key::Sign, Key::F, Key::Push],
    );
    // BACK_X ran, not PUSH: X recalls the pre-negation 7 and -7 moves up.
    assert_eq!(shown(&panel, Indicator::RegisterX), "7");
    assert_eq!(shown(&panel, Indicator::RegisterY), "-7");
    assert_eq!(shown(&panel, Indicator::RegisterZ), "5");
}

#[test]
fn test_f_layer_remaps_clear_x_to_clear_f() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::One, Key::Push, Key::ClearX, Key::Divide, Key::F, Key::ClearX],
    );
    // CLEAR_F ran: the error display is gone and X survives.
    assert_ne!(shown(&panel, Indicator::Mantissa), "ERROR");
}

#[test]
fn test_k_layer_swallows_unmapped_keys() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    processor.key_pressed(Key::Five);
    processor.key_pressed(Key::K);
    panel.borrow_mut().clear();

    // Anything but ZERO is swallowed: no emission, no state change.
    press(&mut processor, &[Key::Plus, Key::Seven, Key::Push]);
    assert!(panel.borrow().is_empty());

    // ZERO remaps to NOP, not to the digit: X stays 5, not 50.
    processor.key_pressed(Key::Zero);
    assert_eq!(shown(&panel, Indicator::RegisterX), "5");
    assert_eq!(shown(&panel, Indicator::Mantissa), "5.");
}

#[test]
fn test_clear_x_is_idempotent() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(&mut processor, &[Key::Seven, Key::ClearX]);
    assert_eq!(shown(&panel, Indicator::RegisterX), "0");
    press(&mut processor, &[Key::ClearX, Key::ClearX]);
    assert_eq!(shown(&panel, Indicator::RegisterX), "0");
    assert_eq!(shown(&panel, Indicator::Mantissa), "0.");
}

#[test]
fn test_back_x_recalls_previous_operand() {
    let mut processor = Processor::new();
    let panel = attach(&mut processor);
    press(
        &mut processor,
        &[Key::Three, Key::Push, Key::Four, Key::Plus, Key::BackX],
    );
    // 3 + 4 left 7 in X and the operand 4 in X1; BACK_X lifts it back.
    assert_eq!(shown(&panel, Indicator::RegisterX), "4");
    assert_eq!(shown(&panel, Indicator::RegisterY), "7");
}

#[test]
fn test_reconnect_replaces_subscriber() {
    let mut processor = Processor::new();
    let first = attach(&mut processor);
    first.borrow_mut().clear();
    let second = attach(&mut processor);
    processor.key_pressed(Key::Nine);
    assert!(first.borrow().is_empty());
    assert_eq!(shown(&second, Indicator::RegisterX), "9");
}
