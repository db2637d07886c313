use anyhow::Result;

use crate::display::{CharacterDisplay, DisplayInterface, Glyph};

/// A virtual character panel backed by a grid of bytes.
/// Renderers draw into this instead of real hardware; tests and the
/// terminal display read the cells back.
#[derive(Clone, Debug)]
pub struct CellBuffer {
    cells: Vec<u8>,
    cols: usize,
    rows: usize,
    cursor_col: usize,
    cursor_row: usize,
    glyphs: [Option<Glyph>; 8],
    blinking: bool,
    visible: bool,
    backlight: bool,
    started: bool,
}

impl CellBuffer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![b' '; cols * rows],
            cols,
            rows,
            cursor_col: 0,
            cursor_row: 0,
            glyphs: [None; 8],
            blinking: false,
            visible: true,
            backlight: true,
            started: false,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Raw bytes of one row, custom glyph slots included.
    pub fn row_bytes(&self, row: usize) -> &[u8] {
        let start = row.min(self.rows) * self.cols;
        let end = (start + self.cols).min(self.cells.len());
        &self.cells[start..end]
    }

    /// One row as text; custom glyph slots show as `^` (slot 0) and `v` (slot 1).
    pub fn line(&self, row: usize) -> String {
        self.row_bytes(row)
            .iter()
            .map(|byte| match byte {
                0 => '^',
                1 => 'v',
                b if b.is_ascii_graphic() || *b == b' ' => *b as char,
                _ => '?',
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.rows).map(|row| self.line(row)).collect()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_col, self.cursor_row)
    }

    pub fn glyph(&self, slot: u8) -> Option<&Glyph> {
        self.glyphs.get(slot as usize).and_then(Option::as_ref)
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_backlight(&self) -> bool {
        self.backlight
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    fn put(&mut self, byte: u8) {
        // Writes outside the panel are dropped, the cursor still advances.
        if self.cursor_col < self.cols && self.cursor_row < self.rows {
            self.cells[self.cursor_row * self.cols + self.cursor_col] = byte;
        }
        self.cursor_col = self.cursor_col.saturating_add(1);
    }
}

impl DisplayInterface for CellBuffer {
    fn begin(&mut self) -> Result<()> {
        self.started = true;
        self.clear()
    }

    fn clear(&mut self) -> Result<()> {
        self.cells.fill(b' ');
        self.cursor_col = 0;
        self.cursor_row = 0;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> Result<()> {
        self.visible = false;
        Ok(())
    }

    fn set_cursor(&mut self, col: usize, row: usize) -> Result<()> {
        self.cursor_col = col;
        self.cursor_row = row;
        Ok(())
    }

    fn draw_str(&mut self, text: &str) -> Result<()> {
        for byte in text.bytes() {
            self.put(byte);
        }
        Ok(())
    }

    fn draw_byte(&mut self, byte: u8) -> Result<()> {
        self.put(byte);
        Ok(())
    }

    fn set_backlight(&mut self, enabled: bool) -> Result<()> {
        self.backlight = enabled;
        Ok(())
    }
}

impl CharacterDisplay for CellBuffer {
    fn create_char(&mut self, slot: u8, glyph: &Glyph) -> Result<()> {
        if let Some(entry) = self.glyphs.get_mut(slot as usize) {
            *entry = Some(*glyph);
        }
        Ok(())
    }

    fn draw_blinker(&mut self) -> Result<()> {
        self.blinking = true;
        Ok(())
    }

    fn clear_blinker(&mut self) -> Result<()> {
        self.blinking = false;
        Ok(())
    }
}
