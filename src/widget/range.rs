use std::fmt::{Debug, Display};

use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::{DOWN, UP},
    widget::{DrawBuffer, Format, OnChange, ValueWidget, Widget},
};

/// Numbers a [`WidgetRange`] can step without overflowing.
pub trait Step: Copy + PartialOrd {
    /// `self + step`, or `None` when it overflows `Self`.
    fn step_up(self, step: Self) -> Option<Self>;

    /// `self - step`, or `None` when it overflows `Self`.
    fn step_down(self, step: Self) -> Option<Self>;
}

macro_rules! step_int {
    ($($t:ty)*) => {$(
        impl Step for $t {
            fn step_up(self, step: Self) -> Option<Self> {
                self.checked_add(step)
            }

            fn step_down(self, step: Self) -> Option<Self> {
                self.checked_sub(step)
            }
        }
    )*};
}

macro_rules! step_float {
    ($($t:ty)*) => {$(
        impl Step for $t {
            fn step_up(self, step: Self) -> Option<Self> {
                Some(self + step).filter(|next| next.is_finite())
            }

            fn step_down(self, step: Self) -> Option<Self> {
                Some(self - step).filter(|next| next.is_finite())
            }
        }
    )*};
}

step_int!(u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize);
step_float!(f32 f64);

/// Numeric value stepped between `min` and `max` with UP/DOWN.
pub struct WidgetRange<T> {
    value: T,
    step: T,
    min: T,
    max: T,
    cycle: bool,
    cursor_offset: usize,
    format: Format<T>,
    on_change: Option<OnChange<T>>,
}

impl<T> WidgetRange<T>
where
    T: Step + Display + Debug + 'static,
{
    pub fn new(value: T, step: T, min: T, max: T) -> Self {
        let mut range = Self {
            value: min,
            step,
            min,
            max,
            cycle: false,
            cursor_offset: 0,
            format: Box::new(|value: &T| value.to_string()),
            on_change: None,
        };
        range.value = range.clamp(value);
        range
    }

    /// Wrap around at the bounds instead of stopping.
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

    pub fn on_change(mut self, on_change: impl FnMut(T) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    fn increment(&mut self) -> bool {
        let next = match self.value.step_up(self.step) {
            Some(next) if next <= self.max => next,
            _ if self.cycle => self.min,
            _ => self.max,
        };
        self.replace(next)
    }

    fn decrement(&mut self) -> bool {
        let next = match self.value.step_down(self.step) {
            Some(next) if next >= self.min => next,
            _ if self.cycle => self.max,
            _ => self.min,
        };
        self.replace(next)
    }

    fn replace(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        debug!("range value {:?}", value);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(value);
        }
        true
    }
}

impl<T> Widget for WidgetRange<T>
where
    T: Step + Display + Debug + 'static,
{
    fn draw(&self, buffer: &mut DrawBuffer) -> usize {
        buffer.push_str(&(self.format)(&self.value))
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if !ctx.renderer().is_in_edit_mode() {
            return Ok(false);
        }
        match command {
            UP => {
                self.increment();
                Ok(true)
            }
            DOWN => {
                self.decrement();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }
}

impl<T> ValueWidget for WidgetRange<T>
where
    T: Step + Display + Debug + 'static,
{
    type Value = T;

    fn value(&self) -> T {
        self.value
    }

    fn set_value(&mut self, value: T) {
        let value = self.clamp(value);
        self.replace(value);
    }
}
