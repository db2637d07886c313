use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor::{self, MoveTo, SetCursorStyle},
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use tracing::debug;

use crate::{
    color::{PanelColors, color_level},
    display::{CellBuffer, CharacterDisplay, DisplayInterface, Glyph},
};

/// Emulates a character LCD inside a terminal.
///
/// Drawing goes into a [`CellBuffer`]; `flush` composites the whole panel
/// at `origin` and places the native terminal cursor where the LCD would
/// blink.
pub struct TerminalDisplay<W: Write> {
    out: W,
    cells: CellBuffer,
    origin: (u16, u16),
    colors: Option<PanelColors>,
    dirty: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, cols: usize, rows: usize, origin: (u16, u16)) -> Self {
        Self {
            out,
            cells: CellBuffer::new(cols, rows),
            origin,
            colors: PanelColors::for_level(color_level()),
            dirty: true,
        }
    }

    pub fn with_colors(mut self, colors: Option<PanelColors>) -> Self {
        self.colors = colors;
        self
    }

    pub fn cells(&self) -> &CellBuffer {
        &self.cells
    }

    fn glyph_char(byte: u8) -> char {
        match byte {
            0 => '↑',
            1 => '↓',
            b if b.is_ascii_graphic() || b == b' ' => b as char,
            _ => '?',
        }
    }

    fn composite(&mut self) -> Result<()> {
        let (x, y) = self.origin;
        let colors = self.colors.map(|colors| match self.cells.has_backlight() {
            true => colors,
            false => colors.unlit(),
        });

        queue!(self.out, cursor::Hide)?;
        if let Some(colors) = colors {
            queue!(
                self.out,
                SetForegroundColor(colors.foreground),
                SetBackgroundColor(colors.background)
            )?;
        }
        for row in 0..self.cells.rows() {
            let line: String = match self.cells.is_visible() {
                true => self
                    .cells
                    .row_bytes(row)
                    .iter()
                    .map(|byte| Self::glyph_char(*byte))
                    .collect(),
                false => " ".repeat(self.cells.cols()),
            };
            queue!(self.out, MoveTo(x, y + row as u16), Print(line))?;
        }
        queue!(self.out, ResetColor)?;

        if self.cells.is_blinking() && self.cells.is_visible() {
            let (col, row) = self.cells.cursor();
            let col = col.min(self.cells.cols().saturating_sub(1)) as u16;
            queue!(
                self.out,
                MoveTo(x + col, y + row as u16),
                SetCursorStyle::BlinkingBlock,
                cursor::Show
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> DisplayInterface for TerminalDisplay<W> {
    fn begin(&mut self) -> Result<()> {
        debug!(
            "terminal display {}x{} at {:?}",
            self.cells.cols(),
            self.cells.rows(),
            self.origin
        );
        self.cells.begin()?;
        self.dirty = true;
        self.flush()
    }

    fn clear(&mut self) -> Result<()> {
        self.dirty = true;
        self.cells.clear()
    }

    fn show(&mut self) -> Result<()> {
        self.dirty = true;
        self.cells.show()?;
        self.flush()
    }

    fn hide(&mut self) -> Result<()> {
        self.dirty = true;
        self.cells.hide()?;
        self.flush()
    }

    fn set_cursor(&mut self, col: usize, row: usize) -> Result<()> {
        self.dirty = true;
        self.cells.set_cursor(col, row)
    }

    fn draw_str(&mut self, text: &str) -> Result<()> {
        self.dirty = true;
        self.cells.draw_str(text)
    }

    fn draw_byte(&mut self, byte: u8) -> Result<()> {
        self.dirty = true;
        self.cells.draw_byte(byte)
    }

    fn set_backlight(&mut self, enabled: bool) -> Result<()> {
        self.dirty = true;
        self.cells.set_backlight(enabled)
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;
        self.composite()
    }
}

impl<W: Write> CharacterDisplay for TerminalDisplay<W> {
    fn create_char(&mut self, slot: u8, glyph: &Glyph) -> Result<()> {
        self.cells.create_char(slot, glyph)
    }

    fn draw_blinker(&mut self) -> Result<()> {
        self.dirty = true;
        self.cells.draw_blinker()
    }

    fn clear_blinker(&mut self) -> Result<()> {
        self.dirty = true;
        self.cells.clear_blinker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_writes_panel_once_until_dirty_again() {
        let mut display = TerminalDisplay::new(Vec::new(), 4, 1, (0, 0)).with_colors(None);
        display.draw_str("ab").unwrap();
        display.flush().unwrap();
        let written = display.out.len();
        assert!(written > 0);
        let text = String::from_utf8_lossy(&display.out).to_string();
        assert!(text.contains("ab  "));

        display.flush().unwrap();
        assert_eq!(display.out.len(), written);
    }

    #[test]
    fn arrows_are_drawn_as_unicode() {
        let mut display = TerminalDisplay::new(Vec::new(), 2, 1, (0, 0)).with_colors(None);
        display.draw_byte(0).unwrap();
        display.draw_byte(1).unwrap();
        display.flush().unwrap();
        let text = String::from_utf8_lossy(&display.out).to_string();
        assert!(text.contains("↑↓"));
    }
}
