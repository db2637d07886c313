use anyhow::Result;
use tracing::{debug, info, trace, warn};

use crate::{
    clock::{Clock, SystemClock},
    context::{MenuContext, ScreenRequest},
    event::command_name,
    render::MenuRenderer,
    screen::MenuScreen,
};

/// Index of a screen inside its controller.
pub type ScreenId = usize;

/// Owns every screen, the renderer and the clock, and feeds commands to
/// the active screen.
///
/// Screens are never dropped while navigating. Opening a screen records
/// the current one as its parent, BACK returns to it.
pub struct MenuController<R: MenuRenderer, C: Clock = SystemClock> {
    screens: Vec<MenuScreen>,
    active: ScreenId,
    renderer: R,
    clock: C,
    enabled: bool,
}

impl<R: MenuRenderer> MenuController<R, SystemClock> {
    pub fn new(renderer: R) -> Self {
        Self::with_clock(renderer, SystemClock::default())
    }
}

impl<R: MenuRenderer, C: Clock> MenuController<R, C> {
    pub fn with_clock(renderer: R, clock: C) -> Self {
        Self {
            screens: Vec::new(),
            active: 0,
            renderer,
            clock,
            enabled: true,
        }
    }

    pub fn add_screen(&mut self, screen: MenuScreen) -> ScreenId {
        self.screens.push(screen);
        self.screens.len() - 1
    }

    /// Start the display and draw the active screen.
    pub fn begin(&mut self) -> Result<()> {
        let now = self.clock.millis();
        self.renderer.begin(now)?;
        info!("menu started with {} screens", self.screens.len());
        self.redraw()
    }

    fn redraw(&mut self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let Some(screen) = self.screens.get(self.active) else {
            return Ok(());
        };
        self.renderer.clear()?;
        screen.draw(&mut self.renderer)?;
        self.renderer.flush()
    }

    pub fn set_screen(&mut self, screen: ScreenId) -> Result<()> {
        if screen >= self.screens.len() {
            warn!("no screen {}", screen);
            return Ok(());
        }
        debug!("screen {} -> {}", self.active, screen);
        self.active = screen;
        self.renderer.set_view_shift(0);
        self.redraw()
    }

    pub fn active_screen(&self) -> ScreenId {
        self.active
    }

    pub fn screen(&self, screen: ScreenId) -> Option<&MenuScreen> {
        self.screens.get(screen)
    }

    pub fn screen_mut(&mut self, screen: ScreenId) -> Option<&mut MenuScreen> {
        self.screens.get_mut(screen)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Dispatch one command. Returns whether anything along the chain
    /// handled it; always `false` while hidden.
    pub fn process(&mut self, command: u8) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        let now = self.clock.millis();
        self.renderer.restart_timer(now)?;

        let Some(screen) = self.screens.get_mut(self.active) else {
            return Ok(false);
        };
        trace!("process {} on screen {}", command_name(command), self.active);
        let mut ctx = MenuContext::new(&mut self.renderer, self.active);
        let handled = screen.process(&mut ctx, command)?;
        let request = ctx.take_request();

        match request {
            Some(ScreenRequest::Open(target)) if target < self.screens.len() => {
                self.screens[target].set_parent(Some(self.active));
                self.set_screen(target)?;
            }
            Some(ScreenRequest::Open(target)) => warn!("no screen {}", target),
            Some(ScreenRequest::Back) => {
                if let Some(parent) = self.screens[self.active].parent() {
                    self.set_screen(parent)?;
                }
            }
            None => {}
        }
        self.renderer.flush()?;
        Ok(handled)
    }

    /// Run timers and redraw polling entries at most every `interval` ms.
    pub fn poll(&mut self, interval: u64) -> Result<bool> {
        let now = self.clock.millis();
        self.renderer.update_timer(now)?;
        if !self.enabled {
            return Ok(false);
        }
        let Some(screen) = self.screens.get_mut(self.active) else {
            return Ok(false);
        };
        let drawn = screen.poll(&mut self.renderer, interval, now)?;
        if drawn {
            self.renderer.flush()?;
        }
        Ok(drawn)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.redraw()
    }

    /// Move the cursor back to the first entry.
    pub fn reset(&mut self) -> Result<()> {
        self.set_cursor(0)
    }

    pub fn cursor(&self) -> usize {
        self.screens
            .get(self.active)
            .map_or(0, |screen| screen.cursor())
    }

    pub fn set_cursor(&mut self, position: usize) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let Some(screen) = self.screens.get_mut(self.active) else {
            return Ok(());
        };
        screen.set_cursor(&mut self.renderer, position)?;
        self.renderer.flush()
    }

    /// Resume drawing after [`hide`](Self::hide).
    pub fn show(&mut self) -> Result<()> {
        if self.enabled {
            return Ok(());
        }
        debug!("menu shown");
        self.enabled = true;
        self.redraw()
    }

    /// Blank the display and ignore commands until [`show`](Self::show).
    pub fn hide(&mut self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        debug!("menu hidden");
        self.enabled = false;
        self.renderer.clear()?;
        self.renderer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        display::CellBuffer,
        event::{BACK, DOWN, ENTER, UP},
        item::{back, basic, label, submenu},
        render::{CharacterRenderer, testing::RecordingRenderer},
    };

    fn two_screens() -> MenuController<CharacterRenderer<CellBuffer>, ManualClock> {
        let renderer = CharacterRenderer::new(CellBuffer::new(16, 2), 16, 2);
        let mut menu = MenuController::with_clock(renderer, ManualClock::new(0));
        menu.add_screen(MenuScreen::new(vec![submenu("Settings", 1), basic("About")]));
        menu.add_screen(MenuScreen::new(vec![back("Back"), basic("Volume")]));
        menu.begin().unwrap();
        menu
    }

    fn line(menu: &MenuController<CharacterRenderer<CellBuffer>, ManualClock>, row: usize) -> String {
        menu.renderer().display().line(row).trim_end().to_string()
    }

    #[test]
    fn begin_draws_the_first_screen() {
        let menu = two_screens();
        assert_eq!(line(&menu, 0), ">Settings");
        assert_eq!(line(&menu, 1), " About");
        assert!(menu.renderer().display().is_started());
    }

    #[test]
    fn submenu_and_back_switch_screens() {
        let mut menu = two_screens();
        assert!(menu.process(ENTER).unwrap());
        assert_eq!(menu.active_screen(), 1);
        assert_eq!(menu.screen(1).and_then(|screen| screen.parent()), Some(0));
        assert_eq!(line(&menu, 0), ">Back");

        assert!(menu.process(DOWN).unwrap());
        assert!(menu.process(BACK).unwrap());
        assert_eq!(menu.active_screen(), 0);
        assert_eq!(line(&menu, 0), ">Settings");

        menu.process(ENTER).unwrap();
        assert_eq!(menu.cursor(), 1);
        menu.process(UP).unwrap();
        assert!(menu.process(ENTER).unwrap());
        assert_eq!(menu.active_screen(), 0);
    }

    #[test]
    fn back_on_the_root_screen_is_unhandled() {
        let mut menu = two_screens();
        assert!(!menu.process(BACK).unwrap());
        assert_eq!(menu.active_screen(), 0);
    }

    #[test]
    fn hidden_menu_ignores_commands() {
        let mut menu = two_screens();
        menu.hide().unwrap();
        assert!(!menu.is_enabled());
        assert_eq!(line(&menu, 0), "");
        assert!(!menu.process(DOWN).unwrap());
        assert_eq!(menu.cursor(), 0);

        menu.show().unwrap();
        assert_eq!(line(&menu, 0), ">Settings");
    }

    #[test]
    fn cursor_can_be_set_and_reset() {
        let mut menu = two_screens();
        menu.set_cursor(1).unwrap();
        assert_eq!(menu.cursor(), 1);
        assert_eq!(line(&menu, 1), ">About");
        menu.reset().unwrap();
        assert_eq!(menu.cursor(), 0);
    }

    #[test]
    fn display_sleeps_until_the_next_command() {
        let clock = ManualClock::new(0);
        let renderer = CharacterRenderer::new(CellBuffer::new(16, 2), 16, 2);
        let mut menu = MenuController::with_clock(renderer, clock.clone());
        menu.add_screen(MenuScreen::new(vec![basic("A"), basic("B")]));
        menu.begin().unwrap();

        clock.set(10_000);
        menu.poll(100).unwrap();
        assert!(!menu.renderer().display().is_visible());

        clock.advance(5);
        assert!(menu.process(DOWN).unwrap());
        assert!(menu.renderer().display().is_visible());
        assert_eq!(menu.cursor(), 1);
    }

    #[test]
    fn unknown_screens_are_ignored() {
        let mut menu = MenuController::with_clock(RecordingRenderer::new(16, 2), ManualClock::new(0));
        menu.add_screen(MenuScreen::new(vec![label("Only")]));
        menu.set_screen(5).unwrap();
        assert_eq!(menu.active_screen(), 0);
        menu.process(UP).unwrap();
        assert_eq!(menu.cursor(), 0);
    }

    #[test]
    fn empty_controller_does_nothing() {
        let mut menu = MenuController::with_clock(RecordingRenderer::new(16, 2), ManualClock::new(0));
        menu.begin().unwrap();
        assert!(!menu.process(ENTER).unwrap());
        assert!(!menu.poll(10).unwrap());
        assert_eq!(menu.cursor(), 0);
    }
}
