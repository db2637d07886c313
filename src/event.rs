//! One-byte command alphabet consumed by every `process` call.
//!
//! Printable ASCII passes through as typed text, control meanings live
//! either below the printable range or above 127.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const BACKSPACE: u8 = 8;
pub const ENTER: u8 = 10;
pub const BACK: u8 = 27;
pub const UP: u8 = 128;
pub const DOWN: u8 = 129;
pub const RIGHT: u8 = 130;
pub const LEFT: u8 = 131;
pub const CLEAR: u8 = 132;

/// Whether `command` is literal text input rather than a control code.
pub fn is_printable(command: u8) -> bool {
    (0x20..=0x7e).contains(&command)
}

/// Short name for log lines.
pub fn command_name(command: u8) -> &'static str {
    match command {
        BACKSPACE => "BACKSPACE",
        ENTER => "ENTER",
        BACK => "BACK",
        UP => "UP",
        DOWN => "DOWN",
        RIGHT => "RIGHT",
        LEFT => "LEFT",
        CLEAR => "CLEAR",
        c if is_printable(c) => "CHAR",
        _ => "UNKNOWN",
    }
}

/// Decode a terminal key press into a menu command.
pub fn command_for_key(key_event: KeyEvent) -> Option<u8> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key_event.code {
        KeyCode::Up => Some(UP),
        KeyCode::Down => Some(DOWN),
        KeyCode::Left => Some(LEFT),
        KeyCode::Right => Some(RIGHT),
        KeyCode::Enter => Some(ENTER),
        KeyCode::Esc => Some(BACK),
        KeyCode::Backspace => Some(BACKSPACE),
        KeyCode::Delete => Some(CLEAR),
        KeyCode::Char(ch) if ch.is_ascii() && is_printable(ch as u8) => Some(ch as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_codes_are_not_printable() {
        for code in [BACKSPACE, ENTER, BACK, UP, DOWN, RIGHT, LEFT, CLEAR] {
            assert!(!is_printable(code), "{} collides with text", command_name(code));
        }
        assert!(is_printable(b'a'));
        assert!(is_printable(b' '));
        assert!(!is_printable(0x7f));
    }

    #[test]
    fn maps_terminal_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(command_for_key(key(KeyCode::Up)), Some(UP));
        assert_eq!(command_for_key(key(KeyCode::Esc)), Some(BACK));
        assert_eq!(command_for_key(key(KeyCode::Delete)), Some(CLEAR));
        assert_eq!(command_for_key(key(KeyCode::Char('x'))), Some(b'x'));
        assert_eq!(command_for_key(key(KeyCode::Char('é'))), None);
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }
}
