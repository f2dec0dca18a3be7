//! Header bar: title, active scorer and theme switch.

use iced::widget::{Space, button, container, row, text};
use iced::{Alignment, Element, Length};

use super::BOLD;
use crate::message::Message;
use crate::style::widgets::palette::{self, ThemeMode};
use crate::style::widgets::{header_style, secondary_button_style};

/// Renders the header bar.
pub fn view_header(scorer_mode: &str, theme_mode: ThemeMode) -> Element<'static, Message> {
    let p = palette::current();

    let title = row![
        text("InboxSweep").size(22).font(BOLD).color(p.primary),
        text("Gmail clutter cleaner").size(13).color(p.text_muted),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let scorer_badge = text(format!("Scoring: {scorer_mode}"))
        .size(12)
        .color(p.text_secondary);

    let theme_icon = match theme_mode {
        ThemeMode::Dark => "\u{2600}",
        ThemeMode::Light => "\u{263E}",
    };
    let theme_btn = button(text(theme_icon).size(16).color(p.text_secondary))
        .padding([6, 12])
        .style(secondary_button_style)
        .on_press(Message::ToggleTheme);

    container(
        row![
            title,
            Space::new().width(Length::Fill),
            scorer_badge,
            theme_btn,
        ]
        .spacing(16)
        .align_y(Alignment::Center),
    )
    .padding([12, 20])
    .width(Length::Fill)
    .style(header_style)
    .into()
}
