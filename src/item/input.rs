use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::{BACK, BACKSPACE, CLEAR, DOWN, ENTER, LEFT, RIGHT, UP, is_printable},
    item::{ItemKind, MenuItem},
    render::MenuRenderer,
};

/// Free text entry edited in place.
///
/// While editing only a window of the value is shown, starting at `view`,
/// wide enough to fit next to the entry text. `cursor` is the caret
/// position inside the value and always stays inside the window.
///
/// With a charset, UP/DOWN preview charset characters under the caret and
/// ENTER writes the previewed one, so text can be entered without a
/// keyboard. Typed printable codes are still accepted.
pub struct ItemInput {
    text: String,
    value: String,
    cursor: usize,
    view: usize,
    charset: Option<Vec<char>>,
    /// Charset position previewed under the caret.
    pending: Option<usize>,
    on_commit: Option<Box<dyn FnMut(&str)>>,
}

impl ItemInput {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            cursor: 0,
            view: 0,
            charset: None,
            pending: None,
            on_commit: None,
        }
    }

    pub fn with_charset(mut self, charset: &str) -> Self {
        let charset: Vec<char> = charset.chars().collect();
        self.charset = (!charset.is_empty()).then_some(charset);
        self
    }

    pub fn on_commit(mut self, on_commit: impl FnMut(&str) + 'static) -> Self {
        self.on_commit = Some(Box::new(on_commit));
        self
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(self.len());
        self.view = self.view.min(self.cursor);
        self.pending = None;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Character previewed under the caret, if a charset pick is under way.
    pub fn pending_char(&self) -> Option<char> {
        let charset = self.charset.as_ref()?;
        charset.get(self.pending?).copied()
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, index: usize) -> usize {
        self.value
            .char_indices()
            .nth(index)
            .map_or(self.value.len(), |(byte, _)| byte)
    }

    /// Value columns left once the text and separator are drawn.
    fn view_size(&self, renderer: &dyn MenuRenderer) -> usize {
        renderer
            .effective_cols()
            .saturating_sub(self.text.chars().count() + 1)
            .max(1)
    }

    fn fit_view(&mut self, view_size: usize) {
        if self.cursor < self.view {
            self.view = self.cursor;
        } else if self.cursor >= self.view + view_size {
            self.view = self.cursor + 1 - view_size;
        }
    }

    /// The value as shown, with a previewed charset character in place.
    fn shown(&self) -> Vec<char> {
        let mut shown: Vec<char> = self.value.chars().collect();
        if let Some(ch) = self.pending_char() {
            match shown.get_mut(self.cursor) {
                Some(slot) => *slot = ch,
                None => shown.push(ch),
            }
        }
        shown
    }

    fn window(&self, view_size: usize) -> String {
        self.shown().into_iter().skip(self.view).take(view_size).collect()
    }

    /// Redraw the row and put the caret back under `cursor`.
    fn redraw(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        let view_size = self.view_size(renderer);
        self.fit_view(view_size);
        let window = self.window(view_size);
        renderer.draw_item(&self.text, Some(&window), true)?;

        let after_caret = window.chars().count() - (self.cursor - self.view).min(window.chars().count());
        let col = renderer.cursor_col().saturating_sub(after_caret);
        let row = renderer.cursor_row();
        renderer.move_cursor(col, row)?;
        renderer.draw_blinker()
    }

    fn enter(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        renderer.set_edit_mode(true);
        renderer.set_view_shift(0);
        self.cursor = self.len();
        self.pending = None;
        debug!("input edit {:?}", self.value);
        self.redraw(renderer)
    }

    fn exit(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        renderer.clear_blinker()?;
        renderer.set_edit_mode(false);
        self.cursor = 0;
        self.view = 0;
        self.pending = None;
        self.draw(renderer)?;
        debug!("input commit {:?}", self.value);
        if let Some(on_commit) = self.on_commit.as_mut() {
            on_commit(&self.value);
        }
        Ok(())
    }

    fn type_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        self.view = self.view.saturating_sub(1);
    }

    /// Charset position of the character under the caret, where a pick starts.
    fn pick_start(&self, charset: &[char]) -> Option<usize> {
        let current = self.value.chars().nth(self.cursor)?;
        charset.iter().position(|&ch| ch == current)
    }

    /// Step the previewed charset character. Returns `false` without a charset.
    fn pick(&mut self, forward: bool) -> bool {
        let Some(charset) = self.charset.as_ref() else {
            return false;
        };
        let last = charset.len() - 1;
        let start = self.pending.or_else(|| self.pick_start(charset));
        self.pending = Some(match (start, forward) {
            (None, _) => 0,
            (Some(position), true) if position < last => position + 1,
            (Some(_), true) => 0,
            (Some(position), false) => position.saturating_sub(1),
        });
        debug!("input pick {:?}", self.pending_char());
        true
    }

    /// Write the previewed character under the caret and move past it.
    fn commit_pick(&mut self) {
        let Some(ch) = self.pending_char() else {
            return;
        };
        self.pending = None;
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
            self.value.insert(at, ch);
        } else {
            self.value.push(ch);
        }
        self.cursor += 1;
    }
}

impl MenuItem for ItemInput {
    fn text(&self) -> &str {
        &self.text
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Input
    }

    fn value(&self) -> Option<String> {
        Some(self.value.clone())
    }

    fn draw(&self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        let window = self.window(self.view_size(renderer));
        renderer.draw_item(&self.text, Some(&window), true)
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        let renderer = ctx.renderer();
        if !renderer.is_in_edit_mode() {
            if command == ENTER {
                self.enter(renderer)?;
                return Ok(true);
            }
            return Ok(false);
        }

        if is_printable(command) {
            self.pending = None;
            self.type_char(char::from(command));
            self.redraw(renderer)?;
            return Ok(true);
        }
        match command {
            ENTER => {
                self.commit_pick();
                self.redraw(renderer)?;
            }
            BACK if self.pending.is_some() => {
                self.pending = None;
                self.redraw(renderer)?;
            }
            BACK => self.exit(renderer)?,
            UP | DOWN => {
                if self.pick(command == UP) {
                    self.redraw(renderer)?;
                }
            }
            LEFT => {
                self.pending = None;
                self.cursor = self.cursor.saturating_sub(1);
                self.redraw(renderer)?;
            }
            RIGHT => {
                self.pending = None;
                self.cursor = (self.cursor + 1).min(self.len());
                self.redraw(renderer)?;
            }
            BACKSPACE => {
                self.pending = None;
                self.backspace();
                self.redraw(renderer)?;
            }
            CLEAR => {
                self.value.clear();
                self.cursor = 0;
                self.view = 0;
                self.pending = None;
                self.redraw(renderer)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::render::testing::RecordingRenderer;

    fn focused(cols: usize) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::new(cols, 2);
        renderer.set_focus(true);
        renderer
    }

    fn send(item: &mut ItemInput, renderer: &mut RecordingRenderer, commands: &[u8]) {
        let mut ctx = MenuContext::new(renderer, 0);
        for command in commands {
            item.process(&mut ctx, *command).unwrap();
        }
    }

    #[test]
    fn enter_puts_the_caret_after_the_value() {
        let mut renderer = focused(16);
        let mut item = ItemInput::new("Name", "Bob");
        send(&mut item, &mut renderer, &[ENTER]);
        assert!(renderer.is_in_edit_mode());
        assert_eq!(item.cursor(), 3);
        // "Name:Bob" ends at column 8, the caret sits right after it.
        assert_eq!(renderer.cursor_col(), 8);
        assert!(renderer.blinker_visible);
    }

    #[test]
    fn typing_inserts_at_the_caret() {
        let mut renderer = focused(16);
        let mut item = ItemInput::new("Name", "Bb");
        send(&mut item, &mut renderer, &[ENTER, LEFT, b'o', RIGHT, b'!']);
        assert_eq!(item.get_value(), "Bob!");
        send(&mut item, &mut renderer, &[BACKSPACE, BACKSPACE]);
        assert_eq!(item.get_value(), "Bo");
        send(&mut item, &mut renderer, &[CLEAR]);
        assert_eq!(item.get_value(), "");
    }

    #[test]
    fn up_and_down_are_swallowed_while_editing() {
        let mut renderer = focused(16);
        let mut item = ItemInput::new("Name", "");
        let mut ctx = MenuContext::new(&mut renderer, 0);
        assert!(!item.process(&mut ctx, UP).unwrap());
        item.process(&mut ctx, ENTER).unwrap();
        assert!(item.process(&mut ctx, UP).unwrap());
        assert!(item.process(&mut ctx, DOWN).unwrap());
    }

    #[test]
    fn long_values_scroll_inside_the_row() {
        let mut renderer = focused(10);
        let mut item = ItemInput::new("Id", "");
        send(&mut item, &mut renderer, &[ENTER]);
        send(&mut item, &mut renderer, b"abcdefghij");
        let drawn = renderer.last().unwrap().value.clone();
        // Seven columns are left next to "Id:".
        assert_eq!(drawn.as_deref(), Some("efghij"));
        assert_eq!(renderer.cursor_col(), 9);
        send(&mut item, &mut renderer, &[LEFT; 10]);
        assert_eq!(item.cursor(), 0);
        assert_eq!(renderer.last().unwrap().value.as_deref(), Some("abcdefg"));
    }

    #[test]
    fn back_commits_once_and_leaves_edit_mode() {
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        let mut renderer = focused(16);
        let mut item =
            ItemInput::new("Name", "Al").on_commit(move |value| sink.borrow_mut().push(value.to_string()));
        send(&mut item, &mut renderer, &[ENTER, b'f', BACK]);
        assert!(!renderer.is_in_edit_mode());
        assert!(!renderer.blinker_visible);
        assert_eq!(*commits.borrow(), vec!["Alf".to_string()]);

        let mut ctx = MenuContext::new(&mut renderer, 0);
        assert!(!item.process(&mut ctx, BACK).unwrap());
        assert_eq!(commits.borrow().len(), 1);
    }

    #[test]
    fn charset_picks_preview_then_write_under_the_caret() {
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        let mut renderer = focused(16);
        let mut item = ItemInput::new("Id", "")
            .with_charset("ABC")
            .on_commit(move |value| sink.borrow_mut().push(value.to_string()));

        send(&mut item, &mut renderer, &[ENTER, DOWN, UP]);
        assert_eq!(item.pending_char(), Some('B'));
        assert_eq!(item.get_value(), "");
        assert_eq!(renderer.last().unwrap().value.as_deref(), Some("B"));
        // Caret sits on the previewed character, right after "Id:".
        assert_eq!(renderer.cursor_col(), 3);

        send(&mut item, &mut renderer, &[ENTER]);
        assert_eq!((item.get_value(), item.cursor()), ("B", 1));

        send(&mut item, &mut renderer, &[UP, UP, UP, UP]);
        assert_eq!(item.pending_char(), Some('A'));
        send(&mut item, &mut renderer, &[BACK]);
        assert!(renderer.is_in_edit_mode());
        assert_eq!(item.pending_char(), None);
        assert_eq!(renderer.last().unwrap().value.as_deref(), Some("B"));

        send(&mut item, &mut renderer, &[LEFT, UP, ENTER, BACK]);
        assert_eq!(*commits.borrow(), vec!["C".to_string()]);
        assert!(!renderer.is_in_edit_mode());
    }

    #[test]
    fn charset_input_still_accepts_typed_text() {
        let mut renderer = focused(16);
        let mut item = ItemInput::new("Id", "x").with_charset("0123456789");
        send(&mut item, &mut renderer, &[ENTER, UP, b'y']);
        assert_eq!(item.get_value(), "xy");
        assert_eq!(item.pending_char(), None);
    }
}
