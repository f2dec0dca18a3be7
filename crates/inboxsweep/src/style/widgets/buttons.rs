//! Button styles.

use iced::widget::button::{Status, Style};
use iced::{Background, Border, Color};

use super::palette::{self, Palette};
use super::shadows;
use super::shadows::radius;

/// Main call to action ("Scan Inbox Now").
pub fn primary_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();

    let (fill, glow) = match status {
        Status::Active => (p.primary, Some(0.3)),
        Status::Hovered => (p.primary_light, Some(0.5)),
        Status::Pressed => (p.primary_dark, None),
        Status::Disabled => {
            return Style {
                background: Some(Background::Color(p.text_muted)),
                text_color: p.surface,
                border: pill(p.text_muted, radius::MEDIUM),
                shadow: shadows::none(),
                snap: false,
            };
        }
    };

    Style {
        background: Some(Background::Color(fill)),
        text_color: p.text_on_primary,
        border: pill(p.primary_light, radius::MEDIUM),
        shadow: glow.map_or_else(shadows::none, |strength| shadows::glow(p.primary, strength)),
        snap: false,
    }
}

/// Outlined button for secondary actions.
pub fn secondary_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let fill = match status {
        Status::Hovered => p.hover,
        Status::Pressed => p.selected,
        Status::Active | Status::Disabled => Color::TRANSPARENT,
    };
    outlined(&p, p.text_primary, p.border_medium, fill, status)
}

/// Outlined red button for destructive actions ("Revoke Session").
pub fn danger_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let fill = match status {
        Status::Hovered => palette::tint(p.danger, 0.12),
        Status::Pressed => palette::tint(p.danger, 0.22),
        Status::Active | Status::Disabled => Color::TRANSPARENT,
    };
    outlined(&p, p.danger, p.danger, fill, status)
}

/// Transparent button with a colored outline; disabled buttons go grey.
fn outlined(p: &Palette, accent: Color, outline: Color, fill: Color, status: Status) -> Style {
    let disabled = status == Status::Disabled;
    Style {
        background: Some(Background::Color(fill)),
        text_color: if disabled { p.text_muted } else { accent },
        border: pill(if disabled { p.border_medium } else { outline }, radius::LARGE),
        shadow: shadows::none(),
        snap: false,
    }
}

fn pill(color: Color, radius: f32) -> Border {
    Border {
        color,
        width: 1.0,
        radius: radius.into(),
    }
}
