//! UI state models.

mod controls;
mod scan;
mod settings;

pub use controls::Controls;
pub use scan::{NextMessage, ScanPhase, ScanState};
pub use settings::AppSettings;
