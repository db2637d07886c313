use std::fmt::Display;

use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::{DOWN, UP},
    widget::{DrawBuffer, Format, OnChange, ValueWidget, Widget},
};

/// Picks one of a fixed list of values. The widget value is the index.
pub struct WidgetList<T: Display> {
    values: Vec<T>,
    index: usize,
    cycle: bool,
    cursor_offset: usize,
    format: Format<T>,
    on_change: Option<OnChange<usize>>,
}

impl<T: Display> WidgetList<T> {
    pub fn new(values: Vec<T>, index: usize) -> Self {
        let index = index.min(values.len().saturating_sub(1));
        Self {
            values,
            index,
            cycle: false,
            cursor_offset: 0,
            format: Box::new(|value: &T| value.to_string()),
            on_change: None,
        }
    }

    pub fn cycle(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn format(mut self, format: impl Fn(&T) -> String + 'static) -> Self {
        self.format = Box::new(format);
        self
    }

    pub fn with_cursor_offset(mut self, cursor_offset: usize) -> Self {
        self.cursor_offset = cursor_offset;
        self
    }

    pub fn on_change(mut self, on_change: impl FnMut(usize) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn selected(&self) -> Option<&T> {
        self.values.get(self.index)
    }

    pub fn next_value(&mut self) {
        if self.index + 1 < self.values.len() {
            self.select(self.index + 1);
        } else if self.cycle {
            self.select(0);
        }
    }

    pub fn previous_value(&mut self) {
        if self.index > 0 {
            self.select(self.index - 1);
        } else if self.cycle {
            self.select(self.values.len().saturating_sub(1));
        }
    }

    fn select(&mut self, index: usize) {
        if index == self.index {
            return;
        }
        self.index = index;
        debug!("list index {}", index);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(index);
        }
    }
}

impl<T: Display> Widget for WidgetList<T> {
    fn draw(&self, buffer: &mut DrawBuffer) -> usize {
        match self.selected() {
            Some(value) => buffer.push_str(&(self.format)(value)),
            None => 0,
        }
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if !ctx.renderer().is_in_edit_mode() {
            return Ok(false);
        }
        match command {
            UP => {
                self.next_value();
                Ok(true)
            }
            DOWN => {
                self.previous_value();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }
}

impl<T: Display> ValueWidget for WidgetList<T> {
    type Value = usize;

    fn value(&self) -> usize {
        self.index
    }

    fn set_value(&mut self, index: usize) {
        self.select(index.min(self.values.len().saturating_sub(1)));
    }
}
