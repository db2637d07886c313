//! Hierarchical menus for small character and pixel displays.
//!
//! A [`MenuController`] owns every [`MenuScreen`] and forwards one-byte
//! commands (see [`event`]) to the active one. Screens own their entries,
//! entries own their widgets, and a [`MenuRenderer`] turns entries into
//! rows on a character LCD or a monochrome pixel panel.

pub mod clock;
pub mod color;
pub mod context;
pub mod controller;
pub mod display;
pub mod event;
pub mod item;
pub mod render;
pub mod screen;
pub mod widget;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{MenuContext, ScreenRequest};
pub use controller::{MenuController, ScreenId};
pub use item::{ItemKind, MenuItem};
pub use render::{MenuRenderer, RendererState};
pub use screen::MenuScreen;
pub use widget::{ValueWidget, Widget, WidgetSet};
