use std::convert::Infallible;

use anyhow::Result;
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use unicode_width::UnicodeWidthStr;

use crate::display::{DisplayInterface, GraphicalDisplay};

/// One bit per pixel, row major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Number of lit pixels inside a rectangle, clipped to the buffer.
    pub fn count_on(&self, x: usize, y: usize, width: usize, height: usize) -> usize {
        let mut count = 0;
        for py in y..(y + height).min(self.height) {
            for px in x..(x + width).min(self.width) {
                if self.pixels[py * self.width + px] {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn fill(&mut self, on: bool) {
        self.pixels.fill(on);
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as usize, point.y as usize);
            if x < self.width && y < self.height {
                self.pixels[y * self.width + x] = color.is_on();
            }
        }
        Ok(())
    }
}

/// Monochrome pixel panel drawn with `embedded-graphics`.
///
/// Drawing goes to a back buffer; `send_buffer` publishes it to the front
/// buffer, which is what the panel shows.
pub struct FrameBufferDisplay {
    back: FrameBuffer,
    front: FrameBuffer,
    font: &'static MonoFont<'static>,
    cursor: Point,
    color: BinaryColor,
    visible: bool,
    backlight: bool,
    frames_sent: usize,
}

impl FrameBufferDisplay {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_font(width, height, &FONT_6X10)
    }

    pub fn with_font(width: usize, height: usize, font: &'static MonoFont<'static>) -> Self {
        Self {
            back: FrameBuffer::new(width, height),
            front: FrameBuffer::new(width, height),
            font,
            cursor: Point::zero(),
            color: BinaryColor::On,
            visible: true,
            backlight: true,
            frames_sent: 0,
        }
    }

    /// What the panel currently shows.
    pub fn front(&self) -> &FrameBuffer {
        &self.front
    }

    pub fn char_width(&self) -> usize {
        self.font.character_size.width as usize
    }

    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_backlight(&self) -> bool {
        self.backlight
    }

    fn publish(&mut self) {
        match self.visible {
            true => self.front.clone_from(&self.back),
            false => self.front.fill(false),
        }
    }
}

impl DisplayInterface for FrameBufferDisplay {
    fn begin(&mut self) -> Result<()> {
        self.back.fill(false);
        self.publish();
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.back.fill(false);
        self.cursor = Point::zero();
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.visible = true;
        self.publish();
        Ok(())
    }

    fn hide(&mut self) -> Result<()> {
        self.visible = false;
        self.publish();
        Ok(())
    }

    fn set_cursor(&mut self, col: usize, row: usize) -> Result<()> {
        self.cursor = Point::new(col as i32, row as i32);
        Ok(())
    }

    fn draw_str(&mut self, text: &str) -> Result<()> {
        let height = self.font.character_size.height as i32;
        let top_left = Point::new(self.cursor.x, self.cursor.y - height);
        let style = MonoTextStyle::new(self.font, self.color);
        let next = Text::with_baseline(text, top_left, style, Baseline::Top).draw(&mut self.back)?;
        self.cursor = Point::new(next.x, self.cursor.y);
        Ok(())
    }

    fn draw_byte(&mut self, byte: u8) -> Result<()> {
        let mut text = [0u8; 4];
        let text = char::from(byte).encode_utf8(&mut text);
        self.draw_str(text)
    }

    fn set_backlight(&mut self, enabled: bool) -> Result<()> {
        self.backlight = enabled;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.send_buffer()
    }
}

impl GraphicalDisplay for FrameBufferDisplay {
    fn display_width(&self) -> usize {
        self.back.width()
    }

    fn display_height(&self) -> usize {
        self.back.height()
    }

    fn font_height(&self) -> usize {
        self.font.character_size.height as usize
    }

    fn text_width(&self, text: &str) -> usize {
        let chars = text.width();
        let spacing = self.font.character_spacing as usize;
        chars * self.char_width() + chars.saturating_sub(1) * spacing
    }

    fn set_draw_color(&mut self, color: u8) {
        self.color = match color {
            0 => BinaryColor::Off,
            _ => BinaryColor::On,
        };
    }

    fn draw_box(&mut self, x: usize, y: usize, width: usize, height: usize) -> Result<()> {
        Rectangle::new(
            Point::new(x as i32, y as i32),
            Size::new(width as u32, height as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(self.color))
        .draw(&mut self.back)?;
        Ok(())
    }

    fn clear_buffer(&mut self) -> Result<()> {
        self.back.fill(false);
        Ok(())
    }

    fn send_buffer(&mut self) -> Result<()> {
        self.publish();
        self.frames_sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_reach_the_panel_only_after_send() {
        let mut display = FrameBufferDisplay::new(32, 16);
        display.draw_box(2, 3, 4, 5).unwrap();
        assert_eq!(display.front().count_on(0, 0, 32, 16), 0);
        display.send_buffer().unwrap();
        assert_eq!(display.front().count_on(0, 0, 32, 16), 20);
        assert!(display.front().is_on(2, 3));
        assert!(!display.front().is_on(6, 3));
    }

    #[test]
    fn text_is_drawn_above_the_cursor_line() {
        let mut display = FrameBufferDisplay::new(64, 24);
        display.set_cursor(0, 10).unwrap();
        display.draw_str("Hi").unwrap();
        display.send_buffer().unwrap();
        assert!(display.front().count_on(0, 0, 12, 10) > 0);
        assert_eq!(display.front().count_on(0, 10, 64, 14), 0);
        assert_eq!(display.text_width("Hi"), 12);
    }

    #[test]
    fn off_color_carves_text_out_of_a_box() {
        let mut display = FrameBufferDisplay::new(32, 12);
        display.draw_box(0, 0, 32, 12).unwrap();
        display.set_draw_color(0);
        display.set_cursor(0, 10).unwrap();
        display.draw_str("W").unwrap();
        display.send_buffer().unwrap();
        assert!(display.front().count_on(0, 0, 6, 10) < 60);
        assert!(display.front().is_on(20, 5));
    }

    #[test]
    fn hidden_panel_shows_nothing() {
        let mut display = FrameBufferDisplay::new(8, 8);
        display.draw_box(0, 0, 8, 8).unwrap();
        display.hide().unwrap();
        display.send_buffer().unwrap();
        assert_eq!(display.front().count_on(0, 0, 8, 8), 0);
        display.show().unwrap();
        assert_eq!(display.front().count_on(0, 0, 8, 8), 64);
    }
}
