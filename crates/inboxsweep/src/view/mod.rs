//! View components for the application.

mod header;
mod results;
mod sidebar;

pub use header::view_header;
pub use results::view_results;
pub use sidebar::view_sidebar;

/// Bold variant of the default font.
const BOLD: iced::Font = iced::Font {
    weight: iced::font::Weight::Bold,
    ..iced::Font::DEFAULT
};
