//! Widget styles that read from the active palette.

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use buttons::{danger_button_style, primary_button_style, secondary_button_style};
pub use containers::{
    app_background_style, card_style, error_banner_style, header_style, outcome_banner_style,
    panel_style, sidebar_style,
};
pub use inputs::{label_input_style, scrollable_style};
