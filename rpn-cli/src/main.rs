//! RPN calculator CLI - drive the calculator engine from a terminal.
//!
//! Usage:
//!   rpn                               # interactive calculator
//!   rpn --keys "3 push 4 +"           # batch evaluation, print registers
//!   rpn --keys "3 push 4 +" --json    # same, as JSON
//!
//! Interactive keys:
//!   0-9 . + - * /    digits and arithmetic
//!   Enter            push X onto the stack
//!   s                swap X and Y
//!   n                toggle sign
//!   e                start exponent entry
//!   b                recall previous X
//!   Backspace        clear X
//!   f, k             prefix layers
//!   q / Esc          quit

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, ClearType},
};
use serde::Serialize;

use rpn_core::{Indicator, Key, Processor};

/// RPN calculator CLI
#[derive(Parser, Debug)]
#[command(name = "rpn")]
#[command(about = "Reverse-Polish scientific calculator")]
struct Args {
    /// Key tokens to feed instead of running interactively
    /// (e.g. "3 push 4 +")
    #[arg(short, long)]
    keys: Option<String>,

    /// Print the final registers as JSON (with --keys)
    #[arg(long)]
    json: bool,

    /// Enable key dispatch tracing
    #[arg(short, long)]
    trace: bool,
}

/// Latest value of every indicator, as emitted by the engine.
#[derive(Debug, Default, Serialize)]
struct Panel {
    mantissa: String,
    exponent: String,
    x: String,
    y: String,
    z: String,
    t: String,
    x1: String,
}

impl Panel {
    fn set(&mut self, indicator: Indicator, value: &str) {
        let slot = match indicator {
            Indicator::Mantissa => &mut self.mantissa,
            Indicator::Exponent => &mut self.exponent,
            Indicator::RegisterX => &mut self.x,
            Indicator::RegisterY => &mut self.y,
            Indicator::RegisterZ => &mut self.z,
            Indicator::RegisterT => &mut self.t,
            Indicator::RegisterX1 => &mut self.x1,
        };
        slot.clear();
        slot.push_str(value);
    }
}

/// Translate a crossterm key event to a calculator key.
fn translate_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('0') => Some(Key::Zero),
        KeyCode::Char('1') => Some(Key::One),
        KeyCode::Char('2') => Some(Key::Two),
        KeyCode::Char('3') => Some(Key::Three),
        KeyCode::Char('4') => Some(Key::Four),
        KeyCode::Char('5') => Some(Key::Five),
        KeyCode::Char('6') => Some(Key::Six),
        KeyCode::Char('7') => Some(Key::Seven),
        KeyCode::Char('8') => Some(Key::Eight),
        KeyCode::Char('9') => Some(Key::Nine),
        KeyCode::Char('.') | KeyCode::Char(',') => Some(Key::Point),
        KeyCode::Char('+') => Some(Key::Plus),
        KeyCode::Char('-') => Some(Key::Minus),
        KeyCode::Char('*') => Some(Key::Multiply),
        KeyCode::Char('/') => Some(Key::Divide),
        KeyCode::Char('s') => Some(Key::Swap),
        KeyCode::Char('n') => Some(Key::Sign),
        KeyCode::Char('e') => Some(Key::EnterExponent),
        KeyCode::Char('b') => Some(Key::BackX),
        KeyCode::Char('f') => Some(Key::F),
        KeyCode::Char('k') => Some(Key::K),
        KeyCode::Enter => Some(Key::Push),
        KeyCode::Backspace => Some(Key::ClearX),
        KeyCode::Delete => Some(Key::ClearF),
        _ => None,
    }
}

/// Redraw the whole register panel.
fn draw(panel: &Panel) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    write!(stdout, "X\u{2081}: {}\r\n", panel.x1)?;
    write!(stdout, " T: {}\r\n", panel.t)?;
    write!(stdout, " Z: {}\r\n", panel.z)?;
    write!(stdout, " Y: {}\r\n", panel.y)?;
    write!(stdout, " X: {}\r\n\r\n", panel.x)?;
    write!(stdout, " [ {} {} ]\r\n\r\n", panel.mantissa, panel.exponent)?;
    write!(
        stdout,
        "0-9 . + - * /   Enter=push  s=swap  n=sign  e=exp  b=back-x  Bksp=Cx  f/k  q=quit\r\n"
    )?;
    stdout.flush()
}

fn run_interactive(processor: &mut Processor, panel: &Rc<RefCell<Panel>>) -> io::Result<()> {
    // Gracefully handle non-TTY
    let raw_mode_enabled = enable_raw_mode().is_ok();
    draw(&panel.borrow())?;

    loop {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                match key_event.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c')
                        if key_event.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        break;
                    }
                    code => {
                        if let Some(key) = translate_key(code) {
                            processor.key_pressed(key);
                            draw(&panel.borrow())?;
                        }
                    }
                }
            }
            Event::Resize(..) => draw(&panel.borrow())?,
            _ => {}
        }
    }

    if raw_mode_enabled {
        let _ = disable_raw_mode();
    }
    Ok(())
}

fn run_batch(processor: &mut Processor, keys: &str) -> Result<(), Box<dyn std::error::Error>> {
    for token in keys.split_whitespace() {
        let key: Key = token.parse()?;
        processor.key_pressed(key);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let panel = Rc::new(RefCell::new(Panel::default()));
    let mut processor = Processor::new();
    processor.trace = args.trace;

    let sink = Rc::clone(&panel);
    processor.connect_indicators(move |indicator, value| {
        sink.borrow_mut().set(indicator, value);
    });

    match args.keys {
        Some(keys) => {
            run_batch(&mut processor, &keys)?;
            let panel = panel.borrow();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&*panel)?);
            } else {
                println!("X\u{2081}: {}", panel.x1);
                println!(" T: {}", panel.t);
                println!(" Z: {}", panel.z);
                println!(" Y: {}", panel.y);
                println!(" X: {}", panel.x);
            }
        }
        None => run_interactive(&mut processor, &panel)?,
    }

    Ok(())
}
