use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    event::ENTER,
    item::{ItemKind, MenuItem},
};

/// Plain entry, or a label when it may not take the cursor.
pub struct ItemBasic {
    text: String,
    kind: ItemKind,
}

impl ItemBasic {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ItemKind::Plain,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ItemKind::Label,
        }
    }
}

impl MenuItem for ItemBasic {
    fn text(&self) -> &str {
        &self.text
    }

    fn kind(&self) -> ItemKind {
        self.kind
    }
}

/// Returns to the parent screen on ENTER.
pub struct ItemBack {
    text: String,
}

impl ItemBack {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl MenuItem for ItemBack {
    fn text(&self) -> &str {
        &self.text
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Back
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if command != ENTER {
            return Ok(false);
        }
        debug!("back from screen {}", ctx.screen());
        ctx.request_back();
        Ok(true)
    }
}
