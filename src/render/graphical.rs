use anyhow::Result;
use tracing::{debug, trace};

use crate::{
    display::GraphicalDisplay,
    render::{DEFAULT_DISPLAY_TIMEOUT_MS, MenuRenderer, RendererState},
};

#[derive(Clone, Debug)]
pub struct GraphicalRendererConfig {
    pub scrollbar_width: usize,
    /// Extra pixels between rows on top of the font height.
    pub row_padding: usize,
    /// Pixels kept free between a label and the value column.
    pub gutter: usize,
    pub blink_interval_ms: u64,
    pub display_timeout_ms: u64,
}

impl Default for GraphicalRendererConfig {
    fn default() -> Self {
        Self {
            scrollbar_width: 4,
            row_padding: 2,
            gutter: 2,
            blink_interval_ms: 500,
            display_timeout_ms: DEFAULT_DISPLAY_TIMEOUT_MS,
        }
    }
}

/// Pixel renderer: focus is an inverted row, long labels scroll in place,
/// values share a column sized by the widest visible value, and a
/// proportional scrollbar runs down the right edge.
pub struct GraphicalRenderer<G: GraphicalDisplay> {
    display: G,
    state: RendererState,
    config: GraphicalRendererConfig,
    char_width: usize,
    font_height: usize,
    row_height: usize,
}

impl<G: GraphicalDisplay> GraphicalRenderer<G> {
    pub fn new(display: G) -> Self {
        Self::with_config(display, GraphicalRendererConfig::default())
    }

    pub fn with_config(display: G, config: GraphicalRendererConfig) -> Self {
        let char_width = display.text_width("W").max(1);
        let font_height = display.font_height();
        let row_height = (font_height + config.row_padding).max(1);
        let max_cols = display
            .display_width()
            .saturating_sub(config.scrollbar_width)
            / char_width;
        let max_rows = display.display_height() / row_height;
        let state = RendererState::new(max_cols, max_rows)
            .with_display_timeout(config.display_timeout_ms);
        Self {
            display,
            state,
            config,
            char_width,
            font_height,
            row_height,
        }
    }

    pub fn display(&self) -> &G {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut G {
        &mut self.display
    }

    pub fn row_height(&self) -> usize {
        self.row_height
    }

    /// Width left of the scrollbar, minus a one pixel separator.
    pub fn text_area_width(&self) -> usize {
        self.display
            .display_width()
            .saturating_sub(self.config.scrollbar_width + 1)
    }

    /// Longest prefix of `chars` that fits in `max_width` pixels.
    fn clip<I: Iterator<Item = char>>(&self, chars: I, max_width: usize) -> String {
        let mut clipped = String::new();
        let mut buf = [0u8; 4];
        let mut width = 0;
        for ch in chars {
            let ch_width = self.display.text_width(ch.encode_utf8(&mut buf));
            if width + ch_width > max_width {
                break;
            }
            width += ch_width;
            clipped.push(ch);
        }
        clipped
    }

    fn draw_scrollbar(&mut self) -> Result<()> {
        let x = self
            .display
            .display_width()
            .saturating_sub(self.config.scrollbar_width);
        let height = self.display.display_height();
        self.display.set_draw_color(0);
        self.display
            .draw_box(x, 0, self.config.scrollbar_width, height)?;
        self.display.set_draw_color(1);

        let (rows, total) = (self.state.max_rows, self.state.total_items);
        if total <= rows {
            return Ok(());
        }
        let bar_height = (rows * height / total).max(2).min(height);
        let hidden = total - rows;
        let view_start = self.state.view_start.min(hidden);
        let y = view_start * (height - bar_height) / hidden;
        trace!("scrollbar y={} h={} ({}/{})", y, bar_height, view_start, total);
        self.display
            .draw_box(x, y, self.config.scrollbar_width, bar_height)
    }
}

impl<G: GraphicalDisplay> MenuRenderer for GraphicalRenderer<G> {
    fn state(&self) -> &RendererState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RendererState {
        &mut self.state
    }

    fn begin(&mut self, now: u64) -> Result<()> {
        self.display.begin()?;
        self.display.clear_buffer()?;
        self.state.timer_start = now;
        self.state.blinker_since = now;
        self.state.display_asleep = false;
        self.draw_scrollbar()?;
        self.display.send_buffer()
    }

    fn clear(&mut self) -> Result<()> {
        self.display.clear()?;
        self.display.clear_buffer()
    }

    fn draw_item(&mut self, text: &str, value: Option<&str>, _pad_with_blanks: bool) -> Result<()> {
        let row = self.state.cursor_row;
        let top = row * self.row_height;
        let baseline = top + self.font_height;
        let area = self.text_area_width();
        let focused = self.state.has_focus;

        // Rows are always fully repainted, padding is implicit.
        self.display.set_draw_color(u8::from(focused));
        self.display.draw_box(0, top, area, self.row_height)?;
        self.display.set_draw_color(u8::from(!focused));

        let shift = match focused {
            true => self.state.view_shift,
            false => 0,
        };

        let value_x = value.map(|value| {
            let column = (self.state.value_width * self.char_width)
                .max(self.display.text_width(value));
            area.saturating_sub(column + 1)
        });
        let colon_width = self.display.text_width(":");
        let label_width = match value_x {
            Some(x) => x.saturating_sub(colon_width + self.config.gutter),
            None => area,
        };

        let label = self.clip(text.chars().skip(shift), label_width);
        self.display.set_cursor(0, baseline)?;
        self.display.draw_str(&label)?;

        if let (Some(value), Some(value_x)) = (value, value_x) {
            self.display
                .set_cursor(value_x.saturating_sub(colon_width), baseline)?;
            self.display.draw_str(":")?;
            let value_shift = shift.saturating_sub(text.chars().count());
            let visible = self.clip(value.chars().skip(value_shift), area - value_x);
            self.display.set_cursor(value_x, baseline)?;
            self.display.draw_str(&visible)?;
        }

        self.display.set_draw_color(1);
        if focused {
            let end = self.effective_cols();
            self.move_cursor(end, row)?;
        }
        Ok(())
    }

    fn clear_row(&mut self, row: usize) -> Result<()> {
        let area = self.text_area_width();
        self.display.set_draw_color(0);
        self.display
            .draw_box(0, row * self.row_height, area, self.row_height)?;
        self.display.set_draw_color(1);
        Ok(())
    }

    fn draw_cursor(&mut self) -> Result<()> {
        Ok(())
    }

    fn clear_cursor(&mut self) -> Result<()> {
        Ok(())
    }

    fn draw_blinker(&mut self) -> Result<()> {
        self.display.send_buffer()
    }

    fn clear_blinker(&mut self) -> Result<()> {
        self.state.blinker_on = true;
        self.display.send_buffer()
    }

    fn effective_cols(&self) -> usize {
        self.state.max_cols
    }

    fn move_cursor(&mut self, col: usize, row: usize) -> Result<()> {
        self.state.cursor_col = col;
        self.state.cursor_row = row;
        self.display
            .set_cursor(col * self.char_width, row * self.row_height + self.font_height)
    }

    fn flush(&mut self) -> Result<()> {
        self.draw_scrollbar()?;
        self.display.send_buffer()
    }

    fn restart_timer(&mut self, now: u64) -> Result<()> {
        self.state.timer_start = now;
        self.state.blinker_since = now;
        if self.state.display_asleep {
            debug!("display wake");
            self.state.display_asleep = false;
            self.display.set_backlight(true)?;
            self.display.show()?;
        }
        Ok(())
    }

    fn update_timer(&mut self, now: u64) -> Result<()> {
        if !self.state.edit_mode {
            self.state.blinker_on = true;
        } else if now.saturating_sub(self.state.blinker_since) >= self.config.blink_interval_ms {
            self.state.blinker_on = !self.state.blinker_on;
            self.state.blinker_since = now;
        }
        if self.state.timed_out(now) {
            debug!("display timeout after {}ms", self.state.display_timeout);
            self.state.display_asleep = true;
            self.display.hide()?;
            self.display.set_backlight(false)?;
        }
        Ok(())
    }
}
