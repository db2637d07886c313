//! Menu entries.
//!
//! Every row of a screen is a [`MenuItem`]. The screen hands commands to
//! the entry under the cursor first and only acts itself when the entry
//! reports them unhandled.

use anyhow::Result;

use crate::{context::MenuContext, controller::ScreenId, render::MenuRenderer, widget::WidgetBool};

mod basic;
mod input;
mod submenu;
mod value;
mod widget;

pub use basic::{ItemBack, ItemBasic};
pub use input::ItemInput;
pub use submenu::ItemSubMenu;
pub use value::ItemValue;
pub use widget::ItemWidget;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Plain,
    Label,
    Command,
    SubMenu,
    Back,
    Value,
    Input,
    Widgets,
}

pub trait MenuItem {
    fn text(&self) -> &str;

    fn kind(&self) -> ItemKind;

    /// Whether the screen cursor may rest on this entry.
    fn is_selectable(&self) -> bool {
        self.kind() != ItemKind::Label
    }

    /// Redrawn on a timer even without input.
    fn is_polling(&self) -> bool {
        false
    }

    /// Text drawn in the value column, if any.
    fn value(&self) -> Option<String> {
        None
    }

    /// Characters the entry occupies on its row.
    fn display_len(&self) -> usize {
        let text = self.text().chars().count();
        match self.value() {
            Some(value) => text + 1 + value.chars().count(),
            None => text,
        }
    }

    fn draw(&self, renderer: &mut dyn MenuRenderer) -> Result<()> {
        let value = self.value();
        renderer.draw_item(self.text(), value.as_deref(), true)
    }

    fn process(&mut self, _ctx: &mut MenuContext<'_>, _command: u8) -> Result<bool> {
        Ok(false)
    }
}

pub fn basic(text: impl Into<String>) -> Box<dyn MenuItem> {
    Box::new(ItemBasic::new(text))
}

pub fn label(text: impl Into<String>) -> Box<dyn MenuItem> {
    Box::new(ItemBasic::label(text))
}

pub fn back(text: impl Into<String>) -> Box<dyn MenuItem> {
    Box::new(ItemBack::new(text))
}

pub fn submenu(text: impl Into<String>, target: ScreenId) -> Box<dyn MenuItem> {
    Box::new(ItemSubMenu::new(text, target))
}

pub fn value(text: impl Into<String>, read: impl Fn() -> String + 'static) -> Box<dyn MenuItem> {
    Box::new(ItemValue::new(text, read))
}

pub fn input(
    text: impl Into<String>,
    initial: impl Into<String>,
    on_commit: impl FnMut(&str) + 'static,
) -> Box<dyn MenuItem> {
    Box::new(ItemInput::new(text, initial).on_commit(on_commit))
}

/// Text entry whose characters are picked from `charset` with UP/DOWN.
pub fn input_charset(
    text: impl Into<String>,
    initial: impl Into<String>,
    charset: &str,
    on_commit: impl FnMut(&str) + 'static,
) -> Box<dyn MenuItem> {
    Box::new(ItemInput::new(text, initial).with_charset(charset).on_commit(on_commit))
}

/// Entry that runs `action` on ENTER.
pub fn command(text: impl Into<String>, mut action: impl FnMut() + 'static) -> Box<dyn MenuItem> {
    Box::new(ItemWidget::new(text, ()).on_commit(move |()| action()))
}

/// Entry holding one on/off switch, `on_commit` gets the value when editing ends.
pub fn toggle(
    text: impl Into<String>,
    value: bool,
    mut on_commit: impl FnMut(bool) + 'static,
) -> Box<dyn MenuItem> {
    let widgets = (WidgetBool::new(value),);
    Box::new(ItemWidget::new(text, widgets).on_commit(move |(value,)| on_commit(value)))
}
