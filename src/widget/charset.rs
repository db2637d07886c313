use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::{BACKSPACE, DOWN, UP},
    widget::{DrawBuffer, OnChange, ValueWidget, Widget},
};

pub const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

/// Picks one character of a charset with UP/DOWN, BACKSPACE clears it.
///
/// The value is `None` until a character is chosen or after it was cleared.
pub struct WidgetCharset {
    charset: Vec<char>,
    position: Option<usize>,
    cycle: bool,
    cursor_offset: usize,
    format: Box<dyn Fn(char) -> String>,
    on_change: Option<OnChange<Option<char>>>,
}

impl WidgetCharset {
    pub fn new(charset: &str, position: Option<usize>) -> Self {
        let charset: Vec<char> = charset.chars().collect();
        let position = position.filter(|&position| position < charset.len());
        Self {
            charset,
            position,
            cycle: false,
            cursor_offset: 0,
            format: Box::new(|ch| ch.to_string()),
            on_change: None,
        }
    }

    pub fn cycle(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    /// Formats the chosen character, a blank when nothing is chosen.
    pub fn format(mut self, format: impl Fn(char) -> String + 'static) -> Self {
        self.format = Box::new(format);
        self
    }

    pub fn with_cursor_offset(mut self, cursor_offset: usize) -> Self {
        self.cursor_offset = cursor_offset;
        self
    }

    pub fn on_change(mut self, on_change: impl FnMut(Option<char>) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn next_char(&mut self) {
        let last = self.charset.len().checked_sub(1);
        let next = match (self.position, last) {
            (_, None) => None,
            (None, Some(_)) => Some(0),
            (Some(position), Some(last)) if position < last => Some(position + 1),
            (Some(_), Some(_)) if self.cycle => Some(0),
            (Some(_), Some(_)) => return,
        };
        self.select(next);
    }

    pub fn previous_char(&mut self) {
        let previous = match self.position {
            Some(position) if position > 0 => Some(position - 1),
            _ if self.cycle => self.charset.len().checked_sub(1),
            _ => return,
        };
        self.select(previous);
    }

    pub fn clear(&mut self) {
        self.select(None);
    }

    fn select(&mut self, position: Option<usize>) {
        if position == self.position {
            return;
        }
        self.position = position;
        let value = self.value();
        debug!("charset value {:?}", value);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(value);
        }
    }
}

impl Widget for WidgetCharset {
    fn draw(&self, buffer: &mut DrawBuffer) -> usize {
        buffer.push_str(&(self.format)(self.value().unwrap_or(' ')))
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if !ctx.renderer().is_in_edit_mode() {
            return Ok(false);
        }
        match command {
            UP => self.next_char(),
            DOWN => self.previous_char(),
            BACKSPACE => self.clear(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }
}

impl ValueWidget for WidgetCharset {
    type Value = Option<char>;

    fn value(&self) -> Option<char> {
        self.position
            .and_then(|position| self.charset.get(position).copied())
    }

    /// Characters outside the charset clear the value.
    fn set_value(&mut self, value: Option<char>) {
        let position = value.and_then(|ch| self.charset.iter().position(|&c| c == ch));
        self.select(position);
    }
}
