//! Renderer contract shared by character and pixel panels.
//!
//! A renderer draws one entry row at a time at `cursor_row`. The screen
//! sets the row, focus and indicator flags through [`RendererState`]
//! before asking an entry to draw, and entries only ever call
//! [`MenuRenderer::draw_item`].

use anyhow::Result;
use tracing::debug;

pub mod character;
pub mod graphical;

pub use character::{CharacterRenderer, CharacterRendererConfig};
pub use graphical::{GraphicalRenderer, GraphicalRendererConfig};

pub const DEFAULT_DISPLAY_TIMEOUT_MS: u64 = 10_000;

/// Cursor, edit and viewport bookkeeping common to every renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererState {
    pub max_cols: usize,
    pub max_rows: usize,
    pub cursor_col: usize,
    pub cursor_row: usize,
    pub edit_mode: bool,
    /// Rows exist above the viewport (set on the first visible row only).
    pub has_hidden_above: bool,
    /// Rows exist below the viewport (set on the last visible row only).
    pub has_hidden_below: bool,
    /// The row being drawn is the one under the screen cursor.
    pub has_focus: bool,
    /// Index of the first visible entry.
    pub view_start: usize,
    pub total_items: usize,
    /// Horizontal scroll applied to the focused row.
    pub view_shift: usize,
    /// Widest value among the visible rows, in characters.
    pub value_width: usize,
    pub blinker_on: bool,
    pub blinker_since: u64,
    pub timer_start: u64,
    pub display_timeout: u64,
    pub display_asleep: bool,
}

impl RendererState {
    pub fn new(max_cols: usize, max_rows: usize) -> Self {
        Self {
            max_cols,
            max_rows,
            cursor_col: 0,
            cursor_row: 0,
            edit_mode: false,
            has_hidden_above: false,
            has_hidden_below: false,
            has_focus: false,
            view_start: 0,
            total_items: 0,
            view_shift: 0,
            value_width: 0,
            blinker_on: true,
            blinker_since: 0,
            timer_start: 0,
            display_timeout: DEFAULT_DISPLAY_TIMEOUT_MS,
            display_asleep: false,
        }
    }

    pub fn with_display_timeout(mut self, timeout: u64) -> Self {
        self.display_timeout = timeout;
        self
    }

    /// The inactivity timeout elapsed and the display should go dark.
    fn timed_out(&self, now: u64) -> bool {
        !self.display_asleep && now.saturating_sub(self.timer_start) >= self.display_timeout
    }
}

pub trait MenuRenderer {
    fn state(&self) -> &RendererState;
    fn state_mut(&mut self) -> &mut RendererState;

    /// Initialise the display and start the inactivity timer.
    fn begin(&mut self, now: u64) -> Result<()>;

    /// Wipe the whole panel.
    fn clear(&mut self) -> Result<()>;

    /// Draw an entry on `cursor_row`: its text and, optionally, a value.
    /// `pad_with_blanks` fills the rest of the row so stale glyphs vanish.
    fn draw_item(&mut self, text: &str, value: Option<&str>, pad_with_blanks: bool)
    -> Result<()>;

    /// Blank a row that has no entry in the viewport.
    fn clear_row(&mut self, row: usize) -> Result<()>;

    /// Focus marker on `cursor_row`, for panels that use a glyph.
    fn draw_cursor(&mut self) -> Result<()>;
    fn clear_cursor(&mut self) -> Result<()>;

    /// Edit caret at (`cursor_col`, `cursor_row`).
    fn draw_blinker(&mut self) -> Result<()>;
    fn clear_blinker(&mut self) -> Result<()>;

    /// Columns usable by entry text once cursor and indicator columns are taken.
    fn effective_cols(&self) -> usize;

    fn move_cursor(&mut self, col: usize, row: usize) -> Result<()> {
        let state = self.state_mut();
        state.cursor_col = col;
        state.cursor_row = row;
        Ok(())
    }

    /// Finish a frame: draw decorations and push the buffer to the panel.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Wake the display after input.
    fn restart_timer(&mut self, now: u64) -> Result<()>;

    /// Put the display to sleep once it sat idle past the timeout.
    fn update_timer(&mut self, now: u64) -> Result<()>;

    fn max_rows(&self) -> usize {
        self.state().max_rows
    }

    fn max_cols(&self) -> usize {
        self.state().max_cols
    }

    fn cursor_col(&self) -> usize {
        self.state().cursor_col
    }

    fn cursor_row(&self) -> usize {
        self.state().cursor_row
    }

    fn set_edit_mode(&mut self, edit_mode: bool) {
        let state = self.state_mut();
        if state.edit_mode != edit_mode {
            debug!("edit mode {}", edit_mode);
            state.edit_mode = edit_mode;
            state.cursor_col = 0;
        }
    }

    fn is_in_edit_mode(&self) -> bool {
        self.state().edit_mode
    }

    fn view_shift(&self) -> usize {
        self.state().view_shift
    }

    fn set_view_shift(&mut self, view_shift: usize) {
        self.state_mut().view_shift = view_shift;
    }

    fn draw_up_indicator(&mut self) {
        self.state_mut().has_hidden_above = true;
    }

    fn clear_up_indicator(&mut self) {
        self.state_mut().has_hidden_above = false;
    }

    fn draw_down_indicator(&mut self) {
        self.state_mut().has_hidden_below = true;
    }

    fn clear_down_indicator(&mut self) {
        self.state_mut().has_hidden_below = false;
    }

    fn set_focus(&mut self, has_focus: bool) {
        self.state_mut().has_focus = has_focus;
    }

    fn has_focus(&self) -> bool {
        self.state().has_focus
    }

    /// Viewport position, for scrollbars.
    fn set_viewport(&mut self, view_start: usize, total_items: usize) {
        let state = self.state_mut();
        state.view_start = view_start;
        state.total_items = total_items;
    }

    fn set_value_width(&mut self, value_width: usize) {
        self.state_mut().value_width = value_width;
    }

    /// Whether an emulated blinker is in its visible phase.
    fn is_blinker_on(&self) -> bool {
        self.state().blinker_on
    }

    /// Restart the blink cycle in its visible phase.
    fn reset_blinker_on(&mut self) {
        self.state_mut().blinker_on = true;
    }
}
