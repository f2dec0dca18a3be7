//! Results pane: run status, progress bar and one card per message.

use iced::widget::{Column, column, container, progress_bar, row, scrollable, text};
use iced::{Alignment, Element, Length};

use inboxsweep_core::{MessageReport, ScanReport};

use super::BOLD;
use crate::message::Message;
use crate::model::{ScanPhase, ScanState};
use crate::style::widgets::{
    card_style, error_banner_style, outcome_banner_style, palette, scrollable_style,
};

/// Renders the results pane.
pub fn view_results<'a>(
    scan: &'a ScanState,
    notice: Option<&'a str>,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    let p = palette::current();
    let progress = scan.progress();

    let status: Element<'a, Message> = match &scan.phase {
        ScanPhase::Idle => text("Press \"Scan Inbox Now\" (F5) to begin.")
            .color(p.text_secondary)
            .into(),
        ScanPhase::Authenticating => {
            text("Signing in... finish the Google consent in your browser if it opened.")
                .color(p.text_secondary)
                .into()
        }
        ScanPhase::Listing => text("Listing messages...").color(p.text_secondary).into(),
        ScanPhase::Processing => text(format!(
            "Processing message {} of {}...",
            (progress.processed + 1).min(progress.total),
            progress.total
        ))
        .color(p.text_secondary)
        .into(),
        ScanPhase::Finished => match scan.report() {
            Some(ScanReport::Completed(_)) | None => text(format!(
                "Done. {}",
                scan.report().map(ScanReport::summary).unwrap_or_default()
            ))
            .font(BOLD)
            .color(p.text_primary)
            .into(),
            Some(ScanReport::Empty) => text(ScanReport::EMPTY_MESSAGE)
                .color(p.text_secondary)
                .into(),
        },
        ScanPhase::Failed(e) => banner(format!("Scan failed: {e}")),
    };

    let mut content = Column::new().spacing(12).push(status);

    if matches!(scan.phase, ScanPhase::Processing | ScanPhase::Finished) && progress.total > 0 {
        content = content.push(progress_bar(0.0..=1.0, progress.fraction()));
    }
    if let Some(error) = error {
        content = content.push(banner(error.to_string()));
    }
    if let Some(notice) = notice {
        content = content.push(text(notice).size(13).color(p.text_secondary));
    }

    let threshold = scan.config().map(inboxsweep_core::ScanConfig::threshold);
    let cards = scan
        .reports()
        .iter()
        .map(|report| view_card(report, threshold));
    content = content.push(Column::with_children(cards).spacing(10));

    container(
        scrollable(content.padding(20))
            .height(Length::Fill)
            .style(scrollable_style),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn banner(message: String) -> Element<'static, Message> {
    container(text(message).size(13))
        .padding([8, 12])
        .width(Length::Fill)
        .style(error_banner_style)
        .into()
}

fn view_card(report: &MessageReport, threshold: Option<f64>) -> Element<'_, Message> {
    let p = palette::current();

    let heading = row![
        text(format!("#{}", report.index))
            .size(13)
            .font(BOLD)
            .color(p.primary),
        text(&report.id).size(12).color(p.text_muted),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let excerpt = match report.excerpt.as_deref() {
        Some("") => text("(empty snippet)").size(14).color(p.text_muted),
        Some(excerpt) => text(excerpt).size(14).color(p.text_primary),
        None => text("(snippet unavailable)").size(14).color(p.text_muted),
    };

    let mut body = column![heading, excerpt].spacing(8);

    if let Some(scored) = report.scored {
        let line = threshold.map_or_else(
            || format!("Score: {} ({})", scored.score, scored.source.label()),
            |t| {
                format!(
                    "Score: {} ({})  \u{00B7}  Threshold: {t:.2}",
                    scored.score,
                    scored.source.label()
                )
            },
        );
        body = body.push(text(line).size(12).color(p.text_secondary));
    }

    body = body.push(
        container(text(report.headline()).size(13).font(BOLD))
            .padding([6, 10])
            .width(Length::Fill)
            .style(outcome_banner_style(&report.outcome)),
    );

    container(body)
        .padding(14)
        .width(Length::Fill)
        .style(card_style)
        .into()
}
