//! Sidebar: scan controls and the preflight panel.

use iced::alignment::Horizontal;
use iced::widget::{
    Column, Space, button, column, container, row, scrollable, slider, text, text_input, toggler,
};
use iced::{Element, Length};

use inboxsweep_core::{Preflight, ScanConfig};

use super::BOLD;
use crate::message::Message;
use crate::model::Controls;
use crate::style::widgets::{
    danger_button_style, label_input_style, palette, panel_style, primary_button_style,
    scrollable_style, sidebar_style,
};

/// Renders the sidebar.
pub fn view_sidebar(
    controls: &Controls,
    preflight: &Preflight,
    config_error: Option<&str>,
    running: bool,
) -> Element<'static, Message> {
    let p = palette::current();

    let mut preview = toggler(controls.preview)
        .label("Preview mode (don't delete)")
        .text_size(14);
    if !running {
        preview = preview.on_toggle(Message::PreviewToggled);
    }

    let limit = column![
        text(format!("Messages to scan: {}", controls.limit))
            .size(13)
            .color(p.text_secondary),
        slider(
            ScanConfig::MIN_LIMIT..=ScanConfig::MAX_LIMIT,
            controls.limit,
            Message::LimitChanged,
        )
        .step(1u32),
    ]
    .spacing(6);

    let label = column![
        text("Label filter (blank = default view)")
            .size(13)
            .color(p.text_secondary),
        text_input("INBOX", &controls.label)
            .padding([8, 12])
            .style(label_input_style)
            .on_input(Message::LabelChanged)
            .on_submit(Message::StartScan),
    ]
    .spacing(6);

    let threshold = column![
        text(format!("Clutter threshold: {:.2}", controls.threshold))
            .size(13)
            .color(p.text_secondary),
        slider(0.0..=1.0, controls.threshold, Message::ThresholdChanged)
            .step(Controls::THRESHOLD_STEP),
    ]
    .spacing(6);

    let can_scan = preflight.is_ready() && !running;
    let scan_btn = button(
        text(if running { "Scanning..." } else { "Scan Inbox Now" })
            .font(BOLD)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    )
    .width(Length::Fill)
    .padding([10, 16])
    .style(primary_button_style)
    .on_press_maybe(can_scan.then_some(Message::StartScan));

    let revoke_btn = button(
        text("Revoke Session")
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    )
    .width(Length::Fill)
    .padding([8, 16])
    .style(danger_button_style)
    .on_press_maybe((!running).then_some(Message::RevokeSession));

    let mut content = column![
        section_title("SCAN"),
        preview,
        limit,
        label,
        threshold,
        Space::new().height(Length::Fixed(4.0)),
        scan_btn,
        revoke_btn,
        Space::new().height(Length::Fixed(12.0)),
        section_title("PREFLIGHT"),
        view_preflight(preflight),
    ]
    .spacing(14)
    .padding(16);

    if let Some(error) = config_error {
        content = content.push(
            text(format!("Configuration error: {error}"))
                .size(12)
                .color(p.danger),
        );
    }

    container(scrollable(content).height(Length::Fill).style(scrollable_style))
        .width(Length::Fixed(320.0))
        .height(Length::Fill)
        .style(sidebar_style)
        .into()
}

fn section_title(title: &'static str) -> Element<'static, Message> {
    text(title)
        .size(11)
        .font(BOLD)
        .color(palette::current().text_muted)
        .into()
}

fn view_preflight(preflight: &Preflight) -> Element<'static, Message> {
    let p = palette::current();

    let working_dir = preflight
        .working_dir
        .as_ref()
        .map_or_else(|| "(unknown)".to_string(), |d| d.display().to_string());
    let (status, status_color) = if preflight.credentials_found {
        ("found", p.success)
    } else {
        ("missing", p.danger)
    };

    let mut facts = Column::new()
        .spacing(8)
        .push(fact("Working directory", working_dir))
        .push(fact(
            "OAuth client file",
            preflight.credentials_path.display().to_string(),
        ))
        .push(
            row![
                text("Status").size(12).color(p.text_muted),
                text(status).size(12).font(BOLD).color(status_color),
            ]
            .spacing(8),
        )
        .push(fact("Scoring", preflight.scorer_mode.clone()))
        .push(fact("Token cache", preflight.token_store.clone()));

    if let Some(instructions) = preflight.instructions() {
        facts = facts.push(text(instructions).size(12).color(p.danger));
    }

    container(facts)
        .padding(12)
        .width(Length::Fill)
        .style(panel_style)
        .into()
}

fn fact(name: &'static str, value: String) -> Element<'static, Message> {
    let p = palette::current();
    column![
        text(name).size(12).color(p.text_muted),
        text(value).size(12).color(p.text_primary),
    ]
    .spacing(2)
    .into()
}
