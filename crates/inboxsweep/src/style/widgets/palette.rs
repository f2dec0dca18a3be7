//! Color palette with light and dark variants.
//!
//! Styles read the active palette through [`current`], so switching the
//! theme takes effect on the next redraw without threading the mode through
//! every view function.

use iced::Color;

/// Application theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    /// Light theme.
    Light,
    /// Dark theme (default).
    #[default]
    Dark,
}

impl ThemeMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Colors used by the widget styles.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub primary: Color,
    pub primary_light: Color,
    pub primary_dark: Color,

    pub background: Color,
    pub surface: Color,
    pub surface_sunken: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_on_primary: Color,

    /// Kept messages.
    pub success: Color,
    /// Previewed clutter.
    pub warning: Color,
    /// Trashed messages and failures.
    pub danger: Color,

    pub hover: Color,
    pub selected: Color,

    pub border_subtle: Color,
    pub border_medium: Color,

    pub shadow: Color,
}

impl Palette {
    /// Light palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::from_rgb(0.10, 0.45, 0.91),
            primary_light: Color::from_rgb(0.36, 0.62, 0.98),
            primary_dark: Color::from_rgb(0.05, 0.34, 0.76),

            background: Color::from_rgb(0.965, 0.97, 0.98),
            surface: Color::WHITE,
            surface_sunken: Color::from_rgb(0.95, 0.955, 0.97),

            text_primary: Color::from_rgb(0.09, 0.11, 0.15),
            text_secondary: Color::from_rgb(0.40, 0.44, 0.52),
            text_muted: Color::from_rgb(0.60, 0.63, 0.69),
            text_on_primary: Color::WHITE,

            success: Color::from_rgb(0.16, 0.66, 0.38),
            warning: Color::from_rgb(0.90, 0.62, 0.0),
            danger: Color::from_rgb(0.86, 0.22, 0.27),

            hover: Color::from_rgb(0.95, 0.96, 0.98),
            selected: Color::from_rgb(0.91, 0.95, 1.0),

            border_subtle: Color::from_rgb(0.90, 0.91, 0.94),
            border_medium: Color::from_rgb(0.83, 0.85, 0.89),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.06),
        }
    }

    /// Dark palette.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::from_rgb(0.0, 0.86, 0.70),
            primary_light: Color::from_rgb(0.25, 0.95, 0.80),
            primary_dark: Color::from_rgb(0.0, 0.68, 0.56),

            background: Color::from_rgb(0.08, 0.09, 0.11),
            surface: Color::from_rgb(0.12, 0.13, 0.15),
            surface_sunken: Color::from_rgb(0.10, 0.11, 0.13),

            text_primary: Color::from_rgb(0.92, 0.93, 0.95),
            text_secondary: Color::from_rgb(0.66, 0.69, 0.73),
            text_muted: Color::from_rgb(0.50, 0.53, 0.58),
            text_on_primary: Color::from_rgb(0.06, 0.07, 0.09),

            success: Color::from_rgb(0.25, 0.85, 0.50),
            warning: Color::from_rgb(1.0, 0.80, 0.25),
            danger: Color::from_rgb(1.0, 0.38, 0.42),

            hover: Color::from_rgb(0.15, 0.16, 0.18),
            selected: Color::from_rgb(0.10, 0.19, 0.20),

            border_subtle: Color::from_rgb(0.20, 0.21, 0.24),
            border_medium: Color::from_rgb(0.29, 0.30, 0.33),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.25),
        }
    }

    /// Palette for a theme mode.
    #[must_use]
    pub const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}

/// Active palette.
static CURRENT: std::sync::LazyLock<std::sync::RwLock<Palette>> =
    std::sync::LazyLock::new(|| std::sync::RwLock::new(Palette::dark()));

/// Switches the active palette.
pub fn set_theme(mode: ThemeMode) {
    if let Ok(mut palette) = CURRENT.write() {
        *palette = Palette::for_mode(mode);
    }
}

/// Copy of the active palette.
#[must_use]
pub fn current() -> Palette {
    CURRENT.read().map_or_else(|_| Palette::dark(), |p| *p)
}

/// Translucent version of `color`, for banner backgrounds.
#[must_use]
pub const fn tint(color: Color, alpha: f32) -> Color {
    Color::from_rgba(color.r, color.g, color.b, alpha)
}
