//! The scan, score and act loop.
//!
//! Messages are handled strictly one at a time: fetch the excerpt, score it,
//! then keep, preview or trash it depending on the threshold and preview
//! flag. Per-message failures are recorded and the loop moves on; only a
//! failed listing aborts a run.

mod model;
mod scanner;

pub use model::{MessageReport, Outcome, ScanConfig, ScanProgress, ScanReport, ScanSummary};
pub use scanner::Scanner;
