//! Shadow presets and corner radii.

use iced::{Color, Shadow, Vector};

use super::palette;

/// Corner radii.
pub mod radius {
    pub const NONE: f32 = 0.0;
    pub const SMALL: f32 = 4.0;
    pub const MEDIUM: f32 = 6.0;
    pub const LARGE: f32 = 8.0;
}

pub fn none() -> Shadow {
    Shadow::default()
}

/// Soft drop shadow for cards.
pub fn card() -> Shadow {
    Shadow {
        color: palette::current().shadow,
        offset: Vector::new(0.0, 2.0),
        blur_radius: 8.0,
    }
}

/// Colored halo around the primary action.
pub const fn glow(color: Color, strength: f32) -> Shadow {
    Shadow {
        color: Color::from_rgba(color.r, color.g, color.b, strength),
        offset: Vector::new(0.0, 2.0),
        blur_radius: 14.0,
    }
}
