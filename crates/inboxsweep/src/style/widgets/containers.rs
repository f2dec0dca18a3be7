//! Container styles.

use iced::widget::container;
use iced::{Background, Border, Color};

use inboxsweep_core::Outcome;

use super::palette;
use super::shadows;
use super::shadows::radius;

/// Window background.
pub fn app_background_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.background)),
        text_color: Some(p.text_primary),
        ..Default::default()
    }
}

/// Header bar with a bottom border.
pub fn header_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        ..Default::default()
    }
}

/// Control sidebar.
pub fn sidebar_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        ..Default::default()
    }
}

/// Recessed panel inside the sidebar (preflight facts).
pub fn panel_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface_sunken)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        ..Default::default()
    }
}

/// One result card.
pub fn card_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::LARGE.into(),
        },
        shadow: shadows::card(),
        ..Default::default()
    }
}

/// Accent color for an outcome.
pub fn outcome_color(outcome: &Outcome) -> Color {
    let p = palette::current();
    match outcome {
        Outcome::Kept => p.success,
        Outcome::Previewed => p.warning,
        Outcome::Deleted | Outcome::DeleteFailed { .. } | Outcome::FetchFailed { .. } => p.danger,
    }
}

/// Colored strip at the bottom of a result card.
pub fn outcome_banner_style(
    outcome: &Outcome,
) -> impl Fn(&iced::Theme) -> container::Style + use<> {
    let accent = outcome_color(outcome);
    move |_theme| container::Style {
        background: Some(Background::Color(palette::tint(accent, 0.14))),
        text_color: Some(accent),
        border: Border {
            color: palette::tint(accent, 0.5),
            width: 1.0,
            radius: radius::SMALL.into(),
        },
        ..Default::default()
    }
}

/// Banner for run-level errors.
pub fn error_banner_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();

    container::Style {
        background: Some(Background::Color(palette::tint(p.danger, 0.14))),
        text_color: Some(p.danger),
        border: Border {
            color: p.danger,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        ..Default::default()
    }
}
