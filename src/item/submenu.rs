use anyhow::Result;
use tracing::debug;

use crate::{
    context::MenuContext,
    controller::ScreenId,
    event::ENTER,
    item::{ItemKind, MenuItem},
};

/// Opens another screen on ENTER.
pub struct ItemSubMenu {
    text: String,
    target: ScreenId,
}

impl ItemSubMenu {
    pub fn new(text: impl Into<String>, target: ScreenId) -> Self {
        Self {
            text: text.into(),
            target,
        }
    }

    pub fn target(&self) -> ScreenId {
        self.target
    }
}

impl MenuItem for ItemSubMenu {
    fn text(&self) -> &str {
        &self.text
    }

    fn kind(&self) -> ItemKind {
        ItemKind::SubMenu
    }

    fn process(&mut self, ctx: &mut MenuContext<'_>, command: u8) -> Result<bool> {
        if command != ENTER {
            return Ok(false);
        }
        debug!("open screen {} from {}", self.target, ctx.screen());
        ctx.open_screen(self.target);
        Ok(true)
    }
}
