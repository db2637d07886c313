use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::{BACK, ENTER, LEFT, RIGHT},
    item::{ItemKind, MenuItem},
    render::MenuRenderer,
    widget::{DrawBuffer, WidgetSet},
};

/// Entry made of zero to three widgets drawn side by side after its text.
///
/// ENTER starts editing with the first widget active. While editing the
/// active widget sees every command first; LEFT/RIGHT switch widgets,
/// ENTER moves on or, on the last widget, commits. BACK always commits.
/// Without widgets ENTER runs the callback straight away.
pub struct ItemWidget<W: WidgetSet> {
    text: String,
    widgets: W,
    active: Option<usize>,
    on_commit: Option<Box<dyn FnMut(W::Values)>>,
}

impl<W: WidgetSet> ItemWidget<W> {
    pub fn new(text: impl Into<String>, widgets: W) -> Self {
        Self {
            text: text.into(),
            widgets,
            active: None,
            on_commit: None,
        }
    }

    pub fn on_commit(mut self, on_commit: impl FnMut(W::Values) + 'static) -> Self {
        self.on_commit = Some(Box::new(on_commit));
        self
    }

    pub fn widgets(&self) -> &W {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut W {
        &mut self.widgets
    }

    pub fn values(&self) -> W::Values {
        self.widgets.values()
    }

    pub fn set_values(&mut self, values: W::Values) {
        self.widgets.set_values(values);
    }

    /// Widget receiving input, `None` unless the entry is being edited.
    pub fn active_widget(&self) -> Option<usize> {
        self.active
    }

    pub fn set_active_widget(&mut self, index: usize) {
        if index < self.widgets.len() {
            self.active = Some(index);
        }
    }

    fn commit(&mut self) {
        let values = self.widgets.values();
        if let Some(on_commit) = self.on_commit.as_mut() {
            on_commit(values);
        }
    }

    fn render(&self, blank_active: bool) -> (DrawBuffer, Option<(usize, usize)>) {
        let mut buffer = DrawBuffer::new();
        let mut active = None;
        for index in 0..self.widgets.len() {
            let Some(widget) = self.widgets.widget(index) else {
                break;
            };
            let start = buffer.len();
            widget.draw(&mut buffer);
            if self.active == Some(index) {
                if blank_active {
                    buffer.blank_from(start);
                }
                active = Some((index, buffer.len()));
            }
        }
        (buffer, active)
    }

    fn enter(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        renderer.set_edit_mode(true);
        renderer.reset_blinker_on();
        self.active = Some(0);
        debug!("edit {:?}", self.text);
        self.draw(renderer)?;
        renderer.draw_blinker()
    }

    fn exit(&mut self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        renderer.set_edit_mode(false);
        renderer.set_view_shift(0);
        self.active = None;
        debug!("commit {:?}", self.text);
        self.commit();
        renderer.clear_blinker()?;
        self.draw(renderer)
    }

    fn select(&mut self, renderer: &mut dyn MenuRenderer, index: usize) -> Result<()> {
        self.active = Some(index);
        debug!("active widget {}", index);
        self.draw(renderer)
    }
}

impl<W: WidgetSet> MenuItem for ItemWidget<W> {
    fn text(&self) -> &str {
        &self.text
    }

    fn kind(&self) -> ItemKind {
        match self.widgets.is_empty() {
            true => ItemKind::Command,
            false => ItemKind::Widgets,
        }
    }

    fn is_polling(&self) -> bool {
        !self.widgets.is_empty()
    }

    fn value(&self) -> Option<String> {
        if self.widgets.is_empty() {
            return None;
        }
        Some(self.render(false).0.as_str().to_string())
    }

    fn draw(&self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        if self.widgets.is_empty() {
            return renderer.draw_item(&self.text, None, true);
        }

        let editing = renderer.is_in_edit_mode() && self.active.is_some();
        let (full, active) = self.render(editing && !renderer.is_blinker_on());
        let mut caret = None;

        if let (true, Some((index, end))) = (editing, active) {
            // Scroll so the active widget ends inside the row, then draw
            // up to it to learn where its last character lands.
            let room = renderer
                .effective_cols()
                .saturating_sub(self.text.chars().count() + 1);
            renderer.set_view_shift(end.saturating_sub(room));
            let last = index + 1 == self.widgets.len();
            let partial = full.as_str().get(..end).unwrap_or(full.as_str());
            renderer.draw_item(&self.text, Some(partial), last)?;
            let offset = self
                .widgets
                .widget(index)
                .map_or(0, |widget| widget.cursor_offset());
            caret = Some(renderer.cursor_col().saturating_sub(1 + offset));
        }

        renderer.draw_item(&self.text, Some(full.as_str()), true)?;

        if let Some(col) = caret {
            let row = renderer.cursor_row();
            renderer.move_cursor(col, row)?;
        }
        Ok(())
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        let count = self.widgets.len();

        if ctx.renderer().is_in_edit_mode() {
            let Some(active) = self.active else {
                return Ok(false);
            };
            ctx.renderer().reset_blinker_on();
            if let Some(widget) = self.widgets.widget_mut(active)
                && widget.process(ctx, command)?
            {
                self.draw(ctx.renderer())?;
                return Ok(true);
            }
            let renderer = ctx.renderer();
            match command {
                ENTER if active + 1 < count => self.select(renderer, active + 1)?,
                ENTER | BACK => self.exit(renderer)?,
                RIGHT => self.select(renderer, (active + 1) % count)?,
                LEFT => self.select(renderer, active.checked_sub(1).unwrap_or(count - 1))?,
                _ => return Ok(false),
            }
            return Ok(true);
        }

        if command != ENTER {
            return Ok(false);
        }
        if count == 0 {
            debug!("command {:?}", self.text);
            self.commit();
            return Ok(true);
        }
        self.enter(ctx.renderer())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        event::{DOWN, UP},
        render::testing::RecordingRenderer,
        widget::{WidgetBool, WidgetList, WidgetRange},
    };

    type Clock = (WidgetRange<u8>, WidgetRange<u8>);

    fn clock(commits: &Rc<RefCell<Vec<(u8, u8)>>>) -> ItemWidget<Clock> {
        let sink = Rc::clone(commits);
        let widgets = (
            WidgetRange::new(9u8, 1, 0, 23).format(|hour| format!("{hour:02}")),
            WidgetRange::new(30u8, 5, 0, 55).format(|minute| format!(":{minute:02}")),
        );
        ItemWidget::new("Alarm", widgets).on_commit(move |values| sink.borrow_mut().push(values))
    }

    fn focused() -> RecordingRenderer {
        let mut renderer = RecordingRenderer::new(16, 2);
        renderer.set_focus(true);
        renderer
    }

    fn send<W: WidgetSet>(item: &mut ItemWidget<W>, renderer: &mut RecordingRenderer, commands: &[u8]) -> Vec<bool> {
        let mut ctx = MenuContext::new(renderer, 0);
        commands
            .iter()
            .map(|command| item.process(&mut ctx, *command).unwrap())
            .collect()
    }

    #[test]
    fn widgets_are_concatenated_after_the_text() {
        let commits = Rc::default();
        let item = clock(&commits);
        let mut renderer = focused();
        item.draw(&mut renderer).unwrap();
        assert_eq!(renderer.last().unwrap().value.as_deref(), Some("09:30"));
        assert_eq!(item.kind(), ItemKind::Widgets);
        assert!(item.is_polling());
    }

    #[test]
    fn right_then_enter_on_last_widget_commits_both_values() {
        let commits = Rc::default();
        let mut item = clock(&commits);
        let mut renderer = focused();

        send(&mut item, &mut renderer, &[ENTER]);
        assert!(renderer.is_in_edit_mode());
        assert_eq!(item.active_widget(), Some(0));

        send(&mut item, &mut renderer, &[RIGHT]);
        assert_eq!(item.active_widget(), Some(1));

        send(&mut item, &mut renderer, &[ENTER]);
        assert!(!renderer.is_in_edit_mode());
        assert_eq!(item.active_widget(), None);
        assert_eq!(*commits.borrow(), vec![(9, 30)]);
    }

    #[test]
    fn active_widget_claims_up_and_down() {
        let commits = Rc::default();
        let mut item = clock(&commits);
        let mut renderer = focused();
        let handled = send(&mut item, &mut renderer, &[ENTER, UP, UP, ENTER, DOWN, BACK]);
        assert_eq!(handled, vec![true; 6]);
        assert_eq!(*commits.borrow(), vec![(11, 25)]);
        assert_eq!(renderer.last().unwrap().value.as_deref(), Some("11:25"));
    }

    #[test]
    fn left_and_right_wrap_around() {
        let commits = Rc::default();
        let mut item = clock(&commits);
        let mut renderer = focused();
        send(&mut item, &mut renderer, &[ENTER, LEFT]);
        assert_eq!(item.active_widget(), Some(1));
        send(&mut item, &mut renderer, &[RIGHT]);
        assert_eq!(item.active_widget(), Some(0));
        assert!(renderer.is_in_edit_mode());
        assert!(commits.borrow().is_empty());
    }

    #[test]
    fn caret_sits_on_the_active_widget() {
        let commits = Rc::default();
        let mut item = clock(&commits);
        let mut renderer = focused();
        send(&mut item, &mut renderer, &[ENTER]);
        // "Alarm:09" ends at column 8, the caret rests on its last digit.
        assert_eq!(renderer.cursor_col(), 7);
        send(&mut item, &mut renderer, &[RIGHT]);
        assert_eq!(renderer.cursor_col(), 10);
    }

    #[test]
    fn active_widget_is_blanked_when_the_blinker_is_off() {
        let commits = Rc::default();
        let mut item = clock(&commits);
        let mut renderer = focused();
        send(&mut item, &mut renderer, &[ENTER, RIGHT]);
        renderer.state.blinker_on = false;
        item.draw(&mut renderer).unwrap();
        assert_eq!(renderer.last().unwrap().value.as_deref(), Some("09   "));
        assert_eq!(item.value().as_deref(), Some("09:30"));
    }

    #[test]
    fn narrow_rows_shift_to_the_active_widget() {
        let commits = Rc::default();
        let mut item = clock(&commits);
        let mut renderer = RecordingRenderer::new(8, 2);
        renderer.set_focus(true);
        send(&mut item, &mut renderer, &[ENTER, RIGHT]);
        // Two columns are left after "Alarm:", "09:30" needs three more.
        assert_eq!(renderer.view_shift(), 3);
        send(&mut item, &mut renderer, &[BACK]);
        assert_eq!(renderer.view_shift(), 0);
    }

    #[test]
    fn zero_widgets_run_the_command_on_enter() {
        let runs = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&runs);
        let mut item = ItemWidget::new("Reboot", ()).on_commit(move |()| *counter.borrow_mut() += 1);
        let mut renderer = focused();
        assert_eq!(send(&mut item, &mut renderer, &[UP, ENTER, ENTER]), vec![false, true, true]);
        assert_eq!(*runs.borrow(), 2);
        assert!(!renderer.is_in_edit_mode());
        assert_eq!(item.kind(), ItemKind::Command);
        assert_eq!(item.value(), None);
    }

    #[test]
    fn three_widgets_commit_a_triple() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let widgets = (
            WidgetList::new(vec!["Mon", "Tue"], 0),
            WidgetBool::new(false),
            WidgetRange::new(1.5f32, 0.5, 0.0, 2.0),
        );
        let mut item = ItemWidget::new("Plan", widgets).on_commit(move |values| *sink.borrow_mut() = Some(values));
        item.set_values((1, true, 2.0));
        let mut renderer = focused();
        send(&mut item, &mut renderer, &[ENTER, RIGHT, DOWN, BACK]);
        assert_eq!(*seen.borrow(), Some((1, false, 2.0)));
    }
}
