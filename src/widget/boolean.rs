use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::{DOWN, UP},
    widget::{DrawBuffer, OnChange, ValueWidget, Widget},
};

/// On/off switch flipped with UP or DOWN while editing.
pub struct WidgetBool {
    value: bool,
    text_on: String,
    text_off: String,
    cursor_offset: usize,
    format: Box<dyn Fn(&str) -> String>,
    on_change: Option<OnChange<bool>>,
}

impl WidgetBool {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            text_on: "ON".to_string(),
            text_off: "OFF".to_string(),
            cursor_offset: 0,
            format: Box::new(|text: &str| text.to_string()),
            on_change: None,
        }
    }

    pub fn texts(mut self, text_on: impl Into<String>, text_off: impl Into<String>) -> Self {
        self.text_on = text_on.into();
        self.text_off = text_off.into();
        self
    }

    /// Wraps the on/off text, e.g. `|text| format!("[{text}]")`.
    pub fn format(mut self, format: impl Fn(&str) -> String + 'static) -> Self {
        self.format = Box::new(format);
        self
    }

    pub fn with_cursor_offset(mut self, cursor_offset: usize) -> Self {
        self.cursor_offset = cursor_offset;
        self
    }

    pub fn on_change(mut self, on_change: impl FnMut(bool) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn text(&self) -> &str {
        match self.value {
            true => &self.text_on,
            false => &self.text_off,
        }
    }

    fn toggle(&mut self) {
        self.value = !self.value;
        debug!("bool value {}", self.value);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(self.value);
        }
    }
}

impl Widget for WidgetBool {
    fn draw(&self, buffer: &mut DrawBuffer) -> usize {
        buffer.push_str(&(self.format)(self.text()))
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if !ctx.renderer().is_in_edit_mode() {
            return Ok(false);
        }
        match command {
            UP | DOWN => {
                self.toggle();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }
}

impl ValueWidget for WidgetBool {
    type Value = bool;

    fn value(&self) -> bool {
        self.value
    }

    fn set_value(&mut self, value: bool) {
        if value != self.value {
            self.toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::ENTER,
        render::{MenuRenderer, testing::RecordingRenderer},
    };

    #[test]
    fn up_and_down_toggle_while_editing() {
        let mut renderer = RecordingRenderer::new(16, 2);
        renderer.set_edit_mode(true);
        let mut ctx = MenuContext::new(&mut renderer, 0);
        let mut widget = WidgetBool::new(false);
        assert!(widget.process(&mut ctx, UP).unwrap());
        assert!(widget.value());
        assert!(widget.process(&mut ctx, DOWN).unwrap());
        assert!(!widget.value());
        assert!(!widget.process(&mut ctx, ENTER).unwrap());
    }

    #[test]
    fn draws_custom_texts() {
        let widget = WidgetBool::new(true)
            .texts("yes", "no")
            .format(|text| format!("[{text}]"));
        let mut buffer = DrawBuffer::new();
        assert_eq!(widget.draw(&mut buffer), 5);
        assert_eq!(buffer.as_str(), "[yes]");
    }
}
