//! One page of the menu: an ordered list of entries, a cursor and a
//! viewport.
//!
//! The cursor only ever rests on selectable entries. `view` is the index
//! of the first visible entry and follows the cursor with the smallest
//! scroll that keeps it on screen.

use anyhow::Result;
use tracing::{debug, trace};

use crate::{
    context::MenuContext,
    controller::ScreenId,
    event::{BACK, DOWN, LEFT, RIGHT, UP},
    item::MenuItem,
    render::MenuRenderer,
};

#[derive(Default)]
pub struct MenuScreen {
    items: Vec<Box<dyn MenuItem>>,
    cursor: usize,
    view: usize,
    parent: Option<ScreenId>,
    last_poll: Option<u64>,
}

impl MenuScreen {
    pub fn new(items: Vec<Box<dyn MenuItem>>) -> Self {
        let mut screen = Self {
            items,
            ..Default::default()
        };
        screen.settle_cursor();
        screen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn view(&self) -> usize {
        self.view
    }

    pub fn parent(&self) -> Option<ScreenId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<ScreenId>) {
        self.parent = parent;
    }

    pub fn item(&self, index: usize) -> Option<&(dyn MenuItem + 'static)> {
        self.items.get(index).map(|item| item.as_ref())
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut (dyn MenuItem + 'static)> {
        self.items.get_mut(index).map(|item| item.as_mut())
    }

    fn is_selectable(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|item| item.is_selectable())
    }

    /// First selectable entry at or after `target`, else the last one before it.
    fn nearest_selectable(&self, target: usize) -> Option<usize> {
        (target..self.items.len())
            .find(|&index| self.is_selectable(index))
            .or_else(|| (0..target).rev().find(|&index| self.is_selectable(index)))
    }

    /// Clamp the cursor after the entries changed.
    fn settle_cursor(&mut self) {
        if self.items.is_empty() {
            self.cursor = 0;
            return;
        }
        let clamped = self.cursor.min(self.items.len() - 1);
        self.cursor = self.nearest_selectable(clamped).unwrap_or(clamped);
    }

    /// Scroll as little as possible so `target` is visible.
    fn follow(&mut self, target: usize, rows: usize) {
        let rows = rows.max(1);
        if target < self.view {
            self.view = target;
        } else if target >= self.view + rows {
            self.view = target + 1 - rows;
        }
    }

    pub fn set_cursor(&mut self, renderer: &mut dyn MenuRenderer, position: usize) -> Result<()> {
        if self.items.is_empty() {
            self.cursor = 0;
            return self.draw(renderer);
        }
        let clamped = position.min(self.items.len() - 1);
        let target = self.nearest_selectable(clamped).unwrap_or(clamped);
        if target == self.cursor {
            // Entries may have been removed under the view since the last draw.
            if self.is_visible(self.cursor, renderer.max_rows()) {
                return Ok(());
            }
            self.follow(self.cursor, renderer.max_rows());
            return self.draw(renderer);
        }
        self.follow(target, renderer.max_rows());
        self.cursor = target;
        debug!("cursor {} view {}", self.cursor, self.view);
        self.draw(renderer)
    }

    pub fn up(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        let previous = (0..self.cursor.min(self.items.len()))
            .rev()
            .find(|&index| self.is_selectable(index));
        if let Some(previous) = previous {
            self.cursor = previous;
            trace!("cursor up {}", self.cursor);
        }
        self.follow(self.cursor, renderer.max_rows());
        self.draw(renderer)
    }

    pub fn down(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        let next = (self.cursor + 1..self.items.len()).find(|&index| self.is_selectable(index));
        if let Some(next) = next {
            self.cursor = next;
            trace!("cursor down {}", self.cursor);
        }
        self.follow(self.cursor, renderer.max_rows());
        self.draw(renderer)
    }

    /// Set focus and indicator flags for the entry at `index` and put the
    /// renderer on its row without touching the display cursor.
    fn sync_row(&self, renderer: &mut dyn MenuRenderer, index: usize) -> usize {
        let rows = renderer.max_rows();
        let row = index.saturating_sub(self.view);
        renderer.set_focus(index == self.cursor);
        if row == 0 && self.view > 0 {
            renderer.draw_up_indicator();
        } else {
            renderer.clear_up_indicator();
        }
        if row + 1 == rows && self.view + rows < self.items.len() {
            renderer.draw_down_indicator();
        } else {
            renderer.clear_down_indicator();
        }
        renderer.state_mut().cursor_row = row;
        row
    }

    fn draw_row(&self, renderer: &mut dyn MenuRenderer, index: usize) -> Result<()> {
        let Some(item) = self.items.get(index) else {
            return Ok(());
        };
        let row = self.sync_row(renderer, index);
        renderer.move_cursor(0, row)?;
        item.draw(renderer)
    }

    fn is_visible(&self, index: usize, rows: usize) -> bool {
        index >= self.view && index < self.view + rows && index < self.items.len()
    }

    pub fn draw(&self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        let rows = renderer.max_rows();
        renderer.set_viewport(self.view, self.items.len());
        let value_width = self
            .items
            .iter()
            .skip(self.view)
            .take(rows)
            .filter_map(|item| item.value())
            .map(|value| value.chars().count())
            .max()
            .unwrap_or(0);
        renderer.set_value_width(value_width);

        let mut caret = None;
        for row in 0..rows {
            let index = self.view + row;
            if index >= self.items.len() {
                renderer.clear_row(row)?;
                continue;
            }
            self.draw_row(renderer, index)?;
            if index == self.cursor {
                caret = Some((renderer.cursor_col(), renderer.cursor_row()));
            }
        }

        if let Some((col, row)) = caret {
            self.sync_row(renderer, self.cursor);
            renderer.move_cursor(col, row)?;
            renderer.draw_cursor()?;
        }
        Ok(())
    }

    /// Redraw visible polling entries once `interval` elapsed since the
    /// last poll. Returns whether anything was drawn.
    pub fn poll(&mut self, renderer: &mut dyn MenuRenderer, interval: u64, now: u64) -> Result<bool> {
        if let Some(last) = self.last_poll
            && now.saturating_sub(last) < interval
        {
            return Ok(false);
        }
        self.last_poll = Some(now);

        let rows = renderer.max_rows();
        let mut polling: Vec<usize> = (self.view..self.view + rows)
            .filter(|&index| self.is_visible(index, rows) && self.items[index].is_polling())
            .collect();
        if polling.is_empty() {
            return Ok(false);
        }
        // The cursor row goes last so the caret ends up where it belongs.
        polling.sort_by_key(|&index| index == self.cursor);

        let saved = (renderer.cursor_col(), renderer.cursor_row());
        for &index in &polling {
            self.draw_row(renderer, index)?;
        }
        if polling.last() != Some(&self.cursor) && self.is_visible(self.cursor, rows) {
            self.sync_row(renderer, self.cursor);
            renderer.move_cursor(saved.0, saved.1)?;
        }
        trace!("polled {} entries", polling.len());
        Ok(true)
    }

    pub fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if self.cursor < self.items.len() {
            self.sync_row(ctx.renderer(), self.cursor);
            if self.items[self.cursor].process(ctx, command)? {
                return Ok(true);
            }
        }
        if ctx.renderer().is_in_edit_mode() {
            return Ok(false);
        }

        match command {
            UP => {
                ctx.renderer().set_view_shift(0);
                self.up(ctx.renderer())?;
                Ok(true)
            }
            DOWN => {
                ctx.renderer().set_view_shift(0);
                self.down(ctx.renderer())?;
                Ok(true)
            }
            BACK if self.parent.is_some() => {
                ctx.request_back();
                Ok(true)
            }
            RIGHT => self.shift_right(ctx.renderer()),
            LEFT => self.shift_left(ctx.renderer()),
            _ => Ok(false),
        }
    }

    /// Scroll the focused row left by one column while text remains hidden.
    fn shift_right(&self, renderer: &mut dyn MenuRenderer) -> Result<bool> {
        let Some(item) = self.items.get(self.cursor) else {
            return Ok(false);
        };
        let shift = renderer.view_shift();
        if item.display_len().saturating_sub(shift) <= renderer.effective_cols() {
            return Ok(false);
        }
        renderer.set_view_shift(shift + 1);
        self.redraw_cursor_row(renderer)?;
        Ok(true)
    }

    fn shift_left(&self, renderer: &mut dyn MenuRenderer) -> Result<bool> {
        let shift = renderer.view_shift();
        if shift == 0 {
            return Ok(false);
        }
        renderer.set_view_shift(shift - 1);
        self.redraw_cursor_row(renderer)?;
        Ok(true)
    }

    fn redraw_cursor_row(&self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        self.draw_row(renderer, self.cursor)?;
        renderer.draw_cursor()
    }

    pub fn add_item(&mut self, item: Box<dyn MenuItem>) {
        self.items.push(item);
        self.settle_cursor();
    }

    /// Insert before `index`, clamped to the end. The focused entry stays focused.
    pub fn add_item_at(&mut self, index: usize, item: Box<dyn MenuItem>) {
        let index = index.min(self.items.len());
        let had_items = !self.items.is_empty();
        self.items.insert(index, item);
        if had_items && index <= self.cursor {
            self.cursor += 1;
        }
        self.settle_cursor();
    }

    /// Detach the entry at `index`. The viewport is left alone; the next
    /// cursor move scrolls it back over the entries.
    pub fn remove_item_at(&mut self, index: usize) -> Option<Box<dyn MenuItem>> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        self.settle_cursor();
        Some(item)
    }

    pub fn remove_last_item(&mut self) -> Option<Box<dyn MenuItem>> {
        let last = self.items.len().checked_sub(1)?;
        self.remove_item_at(last)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
        self.view = 0;
    }
}
