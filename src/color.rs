use crossterm::style::Color;
use supports_color::Stream;

/// Detect the level of color support
pub fn color_level() -> ColorLevel {
    match supports_color::on(Stream::Stdout) {
        Some(level) => match level.has_16m {
            true => ColorLevel::TrueColor,
            false => match level.has_256 {
                true => ColorLevel::Color256,
                false => ColorLevel::Color16,
            },
        },
        None => ColorLevel::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// No color support
    None,
    /// 16 basic colors
    Color16,
    /// 256 ANSI colors
    Color256,
    /// True color (24-bit RGB)
    TrueColor,
}

/// Foreground/background pair used to paint an emulated panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelColors {
    pub foreground: Color,
    pub background: Color,
}

impl PanelColors {
    /// Classic blue-backlit LCD look, degraded to the terminal defaults when
    /// colors are not available.
    pub fn for_level(level: ColorLevel) -> Option<Self> {
        match level {
            ColorLevel::None => None,
            ColorLevel::Color16 => Some(Self {
                foreground: Color::White,
                background: Color::DarkBlue,
            }),
            ColorLevel::Color256 => Some(Self {
                foreground: Color::AnsiValue(231),
                background: Color::AnsiValue(19),
            }),
            ColorLevel::TrueColor => Some(Self {
                foreground: Color::Rgb {
                    r: 235,
                    g: 240,
                    b: 255,
                },
                background: Color::Rgb {
                    r: 20,
                    g: 40,
                    b: 160,
                },
            }),
        }
    }

    /// Colors with the backlight switched off: the same hue, much darker.
    pub fn unlit(self) -> Self {
        Self {
            foreground: dim(self.foreground, Color::DarkGrey),
            background: dim(self.background, Color::Black),
        }
    }
}

/// Quarter brightness for RGB colors, `fallback` for palette colors.
fn dim(color: Color, fallback: Color) -> Color {
    match color {
        Color::Rgb { r, g, b } => Color::Rgb {
            r: r / 4,
            g: g / 4,
            b: b / 4,
        },
        _ => fallback,
    }
}
