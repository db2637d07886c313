//! Display adapter contracts consumed by the renderers.
//!
//! Adapters are thin: they position, print and toggle hardware features.
//! Truncation, padding and indicator placement belong to the renderers.

use anyhow::Result;

pub mod cell_buffer;
pub mod frame_buffer;
pub mod terminal;

pub use cell_buffer::CellBuffer;
pub use frame_buffer::{FrameBuffer, FrameBufferDisplay};
pub use terminal::TerminalDisplay;

/// A 5x8 custom glyph, one byte per pixel row (low five bits used).
pub type Glyph = [u8; 8];

/// Base operations shared by every panel.
pub trait DisplayInterface {
    fn begin(&mut self) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    /// Turn the panel contents on or off. The backlight is separate.
    fn show(&mut self) -> Result<()>;
    fn hide(&mut self) -> Result<()>;
    fn set_cursor(&mut self, col: usize, row: usize) -> Result<()>;
    fn draw_str(&mut self, text: &str) -> Result<()>;
    fn draw_byte(&mut self, byte: u8) -> Result<()>;
    fn set_backlight(&mut self, enabled: bool) -> Result<()>;

    /// Push pending output to the panel.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Fixed-cell character panel (HD44780 style).
pub trait CharacterDisplay: DisplayInterface {
    /// Store a custom glyph in one of the eight CGRAM slots.
    fn create_char(&mut self, slot: u8, glyph: &Glyph) -> Result<()>;
    /// Start the native blinking caret at the current cursor position.
    fn draw_blinker(&mut self) -> Result<()>;
    fn clear_blinker(&mut self) -> Result<()>;
}

/// Pixel-addressable monochrome panel with a double-buffered frame.
///
/// `set_cursor` takes pixel coordinates; `y` is the text baseline.
pub trait GraphicalDisplay: DisplayInterface {
    fn display_width(&self) -> usize;
    fn display_height(&self) -> usize;
    fn font_height(&self) -> usize;
    fn text_width(&self, text: &str) -> usize;
    /// `0` clears pixels, anything else sets them.
    fn set_draw_color(&mut self, color: u8);
    fn draw_box(&mut self, x: usize, y: usize, width: usize, height: usize) -> Result<()>;
    fn clear_buffer(&mut self) -> Result<()>;
    fn send_buffer(&mut self) -> Result<()>;
}
