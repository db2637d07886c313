use crate::{controller::ScreenId, render::MenuRenderer};

/// Screen switch asked for by an entry while it handled a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenRequest {
    Open(ScreenId),
    Back,
}

/// Everything an entry or widget may touch while processing a command.
///
/// Screen switches are only recorded here. The controller applies them
/// once dispatch has returned, so no draw pass ever starts inside another.
pub struct MenuContext<'a> {
    renderer: &'a mut dyn MenuRenderer,
    screen: ScreenId,
    request: Option<ScreenRequest>,
}

impl<'a> MenuContext<'a> {
    pub fn new(renderer: &'a mut dyn MenuRenderer, screen: ScreenId) -> Self {
        Self {
            renderer,
            screen,
            request: None,
        }
    }

    pub fn renderer(&mut self) -> &mut dyn MenuRenderer {
        &mut *self.renderer
    }

    /// The screen the command was dispatched to.
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    pub fn open_screen(&mut self, screen: ScreenId) {
        self.request = Some(ScreenRequest::Open(screen));
    }

    pub fn request_back(&mut self) {
        self.request = Some(ScreenRequest::Back);
    }

    pub fn request(&self) -> Option<ScreenRequest> {
        self.request
    }

    pub fn take_request(&mut self) -> Option<ScreenRequest> {
        self.request.take()
    }
}
