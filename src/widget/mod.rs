//! Editable values embedded in a menu entry.
//!
//! A widget renders itself into the entry's [`DrawBuffer`] and may claim
//! commands while its entry is being edited. [`WidgetSet`] groups up to
//! three widgets with their values typed as a tuple.

use std::fmt;

use anyhow::Result;

use crate::context::MenuContext;

pub mod boolean;
pub mod charset;
pub mod list;
pub mod range;

pub use self::boolean::WidgetBool;
pub use self::charset::WidgetCharset;
pub use self::list::WidgetList;
pub use self::range::{Step, WidgetRange};

/// Bytes a whole entry value may take once rendered.
pub const DRAW_BUFFER_SIZE: usize = 20;

pub(crate) type Format<T> = Box<dyn Fn(&T) -> String>;
pub(crate) type OnChange<T> = Box<dyn FnMut(T)>;

/// Fixed capacity text buffer. Writes past the end are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawBuffer {
    text: String,
}

impl DrawBuffer {
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(DRAW_BUFFER_SIZE),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn remaining(&self) -> usize {
        DRAW_BUFFER_SIZE - self.text.len()
    }

    /// Append as much of `text` as fits, returning the bytes written.
    pub fn push_str(&mut self, text: &str) -> usize {
        let start = self.text.len();
        for ch in text.chars() {
            if ch.len_utf8() > self.remaining() {
                break;
            }
            self.text.push(ch);
        }
        self.text.len() - start
    }

    /// Overwrite everything from `start` with spaces.
    pub fn blank_from(&mut self, start: usize) {
        if start >= self.text.len() {
            return;
        }
        let width = self.text[start..].chars().count();
        self.text.truncate(start);
        self.text.extend(std::iter::repeat_n(' ', width));
    }
}

impl fmt::Write for DrawBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Display for DrawBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub trait Widget {
    /// Append the rendered value, returning the bytes written.
    fn draw(&self, buffer: &mut DrawBuffer) -> usize;

    /// Handle a command routed to this widget, `true` when it was consumed.
    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool>;

    /// Characters between the edit caret and the end of the rendered value.
    fn cursor_offset(&self) -> usize {
        0
    }
}

pub trait ValueWidget: Widget {
    type Value;

    fn value(&self) -> Self::Value;

    /// Replace the value, clamped to what the widget accepts.
    fn set_value(&mut self, value: Self::Value);
}

/// Zero to three widgets of one entry, values exposed as a tuple.
pub trait WidgetSet {
    type Values;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn widget(&self, index: usize) -> Option<&dyn Widget>;

    fn widget_mut(&mut self, index: usize) -> Option<&mut dyn Widget>;

    fn values(&self) -> Self::Values;

    fn set_values(&mut self, values: Self::Values);
}

impl WidgetSet for () {
    type Values = ();

    fn len(&self) -> usize {
        0
    }

    fn widget(&self, _index: usize) -> Option<&dyn Widget> {
        None
    }

    fn widget_mut(&mut self, _index: usize) -> Option<&mut dyn Widget> {
        None
    }

    fn values(&self) -> Self::Values {}

    fn set_values(&mut self, _values: Self::Values) {}
}

macro_rules! widget_set {
    ($len:expr; $($index:tt $name:ident),+) => {
        impl<$($name: ValueWidget),+> WidgetSet for ($($name,)+) {
            type Values = ($($name::Value,)+);

            fn len(&self) -> usize {
                $len
            }

            fn widget(&self, index: usize) -> Option<&dyn Widget> {
                match index {
                    $($index => Some(&self.$index),)+
                    _ => None,
                }
            }

            fn widget_mut(&mut self, index: usize) -> Option<&mut dyn Widget> {
                match index {
                    $($index => Some(&mut self.$index),)+
                    _ => None,
                }
            }

            fn values(&self) -> Self::Values {
                ($(self.$index.value(),)+)
            }

            fn set_values(&mut self, values: Self::Values) {
                $(self.$index.set_value(values.$index);)+
            }
        }
    };
}

widget_set!(1; 0 A);
widget_set!(2; 0 A, 1 B);
widget_set!(3; 0 A, 1 B, 2 C);

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    #[test]
    fn buffer_truncates_at_capacity() {
        let mut buffer = DrawBuffer::new();
        assert_eq!(buffer.push_str("0123456789"), 10);
        write!(buffer, "{}", "abcdefghijklmnop").unwrap();
        assert_eq!(buffer.as_str(), "0123456789abcdefghij");
        assert_eq!(buffer.push_str("x"), 0);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn blank_from_keeps_the_width() {
        let mut buffer = DrawBuffer::new();
        buffer.push_str("12:30");
        buffer.blank_from(3);
        assert_eq!(buffer.as_str(), "12:  ");
        buffer.blank_from(9);
        assert_eq!(buffer.as_str(), "12:  ");
    }

    #[test]
    fn tuple_sets_expose_typed_values() {
        let mut set = (WidgetRange::new(3, 1, 0, 10), WidgetBool::new(false));
        assert_eq!(set.len(), 2);
        assert_eq!(set.values(), (3, false));
        set.set_values((42, true));
        assert_eq!(set.values(), (10, true));
        assert!(set.widget(1).is_some());
        assert!(set.widget(2).is_none());
        assert!(().is_empty());
    }
}
