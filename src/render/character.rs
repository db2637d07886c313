use anyhow::Result;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::{
    display::{CharacterDisplay, Glyph},
    render::{DEFAULT_DISPLAY_TIMEOUT_MS, MenuRenderer, RendererState},
};

pub const UP_ARROW_SLOT: u8 = 0;
pub const DOWN_ARROW_SLOT: u8 = 1;

pub const UP_ARROW: Glyph = [
    0b00100, //   *
    0b01110, //  ***
    0b10101, // * * *
    0b00100, //   *
    0b00100, //   *
    0b00100, //   *
    0b00100, //   *
    0b00100, //   *
];

pub const DOWN_ARROW: Glyph = [
    0b00100, //   *
    0b00100, //   *
    0b00100, //   *
    0b00100, //   *
    0b00100, //   *
    0b10101, // * * *
    0b01110, //  ***
    0b00100, //   *
];

#[derive(Clone, Debug)]
pub struct CharacterRendererConfig {
    /// Drawn before the focused row. Empty icons drop the cursor column.
    pub cursor_icon: String,
    /// Replaces `cursor_icon` while editing.
    pub edit_cursor_icon: String,
    /// Both arrows are needed for the indicator column to exist.
    pub up_arrow: Option<Glyph>,
    pub down_arrow: Option<Glyph>,
    pub display_timeout_ms: u64,
}

impl Default for CharacterRendererConfig {
    fn default() -> Self {
        Self {
            cursor_icon: ">".to_string(),
            edit_cursor_icon: "*".to_string(),
            up_arrow: Some(UP_ARROW),
            down_arrow: Some(DOWN_ARROW),
            display_timeout_ms: DEFAULT_DISPLAY_TIMEOUT_MS,
        }
    }
}

/// Fixed-cell renderer: every row is exactly `max_cols` cells of
/// `[cursor][text:value][padding][indicator]`.
pub struct CharacterRenderer<D: CharacterDisplay> {
    display: D,
    state: RendererState,
    config: CharacterRendererConfig,
    icon_width: usize,
    /// Columns left of the indicator column.
    available_cols: usize,
}

impl<D: CharacterDisplay> CharacterRenderer<D> {
    pub fn new(display: D, max_cols: usize, max_rows: usize) -> Self {
        Self::with_config(display, max_cols, max_rows, CharacterRendererConfig::default())
    }

    pub fn with_config(
        display: D,
        max_cols: usize,
        max_rows: usize,
        config: CharacterRendererConfig,
    ) -> Self {
        let icon_width = config
            .cursor_icon
            .width()
            .max(config.edit_cursor_icon.width());
        let has_indicators = config.up_arrow.is_some() && config.down_arrow.is_some();
        let available_cols = max_cols.saturating_sub(usize::from(has_indicators));
        let state = RendererState::new(max_cols, max_rows)
            .with_display_timeout(config.display_timeout_ms);
        Self {
            display,
            state,
            config,
            icon_width,
            available_cols,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn has_indicators(&self) -> bool {
        self.available_cols < self.state.max_cols
    }

    fn icon(&self) -> &str {
        match (self.state.has_focus, self.state.edit_mode) {
            (false, _) => "",
            (true, false) => &self.config.cursor_icon,
            (true, true) => &self.config.edit_cursor_icon,
        }
    }

    /// Icon padded to the cursor column width.
    fn draw_icon(&mut self, icon: &str) -> Result<()> {
        let icon = icon.to_string();
        self.display.draw_str(&icon)?;
        for _ in icon.width()..self.icon_width {
            self.display.draw_byte(b' ')?;
        }
        Ok(())
    }
}

impl<D: CharacterDisplay> MenuRenderer for CharacterRenderer<D> {
    fn state(&self) -> &RendererState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RendererState {
        &mut self.state
    }

    fn begin(&mut self, now: u64) -> Result<()> {
        self.display.begin()?;
        if let (Some(up), Some(down)) = (self.config.up_arrow, self.config.down_arrow) {
            self.display.create_char(UP_ARROW_SLOT, &up)?;
            self.display.create_char(DOWN_ARROW_SLOT, &down)?;
        }
        self.state.timer_start = now;
        self.state.display_asleep = false;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.display.clear()
    }

    fn draw_item(&mut self, text: &str, value: Option<&str>, pad_with_blanks: bool) -> Result<()> {
        let row = self.state.cursor_row;
        self.display.set_cursor(0, row)?;

        let mut col = 0;
        if self.icon_width > 0 {
            let icon = self.icon().to_string();
            self.draw_icon(&icon)?;
            col = self.icon_width;
        }

        let mut line = String::from(text);
        if let Some(value) = value {
            line.push(':');
            line.push_str(value);
        }
        let shift = match self.state.has_focus {
            true => self.state.view_shift,
            false => 0,
        };
        let visible: String = line
            .chars()
            .skip(shift)
            .take(self.available_cols.saturating_sub(col))
            .collect();
        self.display.draw_str(&visible)?;
        col += visible.chars().count();
        let content_end = col;

        if pad_with_blanks {
            for _ in col..self.available_cols {
                self.display.draw_byte(b' ')?;
            }
        }

        if self.has_indicators() {
            let indicator = match (self.state.has_hidden_above, self.state.has_hidden_below) {
                (true, _) => UP_ARROW_SLOT,
                (false, true) => DOWN_ARROW_SLOT,
                (false, false) => b' ',
            };
            self.display.set_cursor(self.state.max_cols - 1, row)?;
            self.display.draw_byte(indicator)?;
        }

        if self.state.has_focus {
            self.move_cursor(content_end, row)?;
        }
        Ok(())
    }

    fn clear_row(&mut self, row: usize) -> Result<()> {
        self.display.set_cursor(0, row)?;
        for _ in 0..self.state.max_cols {
            self.display.draw_byte(b' ')?;
        }
        Ok(())
    }

    fn draw_cursor(&mut self) -> Result<()> {
        if self.icon_width == 0 {
            return Ok(());
        }
        let icon = match self.state.edit_mode {
            true => self.config.edit_cursor_icon.clone(),
            false => self.config.cursor_icon.clone(),
        };
        self.display.set_cursor(0, self.state.cursor_row)?;
        self.draw_icon(&icon)?;
        self.display
            .set_cursor(self.state.cursor_col, self.state.cursor_row)
    }

    fn clear_cursor(&mut self) -> Result<()> {
        if self.icon_width == 0 {
            return Ok(());
        }
        self.display.set_cursor(0, self.state.cursor_row)?;
        self.draw_icon("")?;
        self.display
            .set_cursor(self.state.cursor_col, self.state.cursor_row)
    }

    fn draw_blinker(&mut self) -> Result<()> {
        self.display.draw_blinker()
    }

    fn clear_blinker(&mut self) -> Result<()> {
        self.display.clear_blinker()
    }

    fn effective_cols(&self) -> usize {
        self.available_cols.saturating_sub(self.icon_width)
    }

    fn move_cursor(&mut self, col: usize, row: usize) -> Result<()> {
        self.state.cursor_col = col;
        self.state.cursor_row = row;
        self.display.set_cursor(col, row)
    }

    fn flush(&mut self) -> Result<()> {
        self.display.flush()
    }

    fn restart_timer(&mut self, now: u64) -> Result<()> {
        self.state.timer_start = now;
        if self.state.display_asleep {
            debug!("display wake");
            self.state.display_asleep = false;
            self.display.set_backlight(true)?;
            self.display.show()?;
        }
        Ok(())
    }

    fn update_timer(&mut self, now: u64) -> Result<()> {
        if self.state.timed_out(now) {
            debug!("display timeout after {}ms", self.state.display_timeout);
            self.state.display_asleep = true;
            self.display.hide()?;
            self.display.set_backlight(false)?;
        }
        Ok(())
    }
}
