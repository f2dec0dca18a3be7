//! Scan controls as edited in the sidebar.

use inboxsweep_core::ScanConfig;

/// Current values of the sidebar controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    /// Report clutter without trashing it.
    pub preview: bool,
    /// Messages to scan.
    pub limit: u32,
    /// Label filter text; blank scans the default view.
    pub label: String,
    /// Clutter threshold.
    pub threshold: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            preview: true,
            limit: ScanConfig::DEFAULT_LIMIT,
            label: ScanConfig::DEFAULT_LABEL.to_string(),
            threshold: ScanConfig::DEFAULT_THRESHOLD,
        }
    }
}

impl Controls {
    /// Slider step for the threshold.
    pub const THRESHOLD_STEP: f64 = 0.01;

    /// Threshold steps per unit.
    const THRESHOLD_STEPS: f64 = 100.0;

    /// Stores a slider value, snapped to the slider step.
    ///
    /// The stored value is the double nearest to the two-decimal number
    /// shown in the sidebar, so a score that reads the same compares equal.
    pub fn set_threshold(&mut self, value: f64) {
        self.threshold =
            ((value * Self::THRESHOLD_STEPS).round() / Self::THRESHOLD_STEPS).clamp(0.0, 1.0);
    }

    /// Stores a slider value, kept within the accepted range.
    pub fn set_limit(&mut self, value: u32) {
        self.limit = value.clamp(ScanConfig::MIN_LIMIT, ScanConfig::MAX_LIMIT);
    }

    /// Validated configuration for a run.
    ///
    /// # Errors
    ///
    /// Returns the validation message if a value is out of range.
    pub fn to_config(&self) -> Result<ScanConfig, String> {
        ScanConfig::new(self.preview, self.limit, self.label.as_str(), self.threshold)
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use inboxsweep_core::scoring::parse_reply;

    use super::*;

    #[test]
    fn test_defaults_match_scan_defaults() {
        let config = Controls::default().to_config().unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_threshold_snaps_to_step() {
        let mut controls = Controls::default();
        controls.set_threshold(0.456_789);
        assert!((controls.threshold - 0.46).abs() < 1e-9);
        controls.set_threshold(1.2);
        assert_eq!(controls.threshold, 1.0);
    }

    #[test]
    fn test_threshold_matches_displayed_value() {
        let mut controls = Controls::default();
        for step in 0..=100_u32 {
            controls.set_threshold(f64::from(step) / 100.0);
            let shown: f64 = format!("{:.2}", controls.threshold).parse().unwrap();
            assert_eq!(controls.threshold, shown, "slider step {step}");
        }
    }

    #[test]
    fn test_reply_equal_to_threshold_is_clutter() {
        let mut controls = Controls::default();
        for (slider, reply) in [(0.70, "0.70"), (0.35, "0.35"), (0.95, "0.95"), (0.83, "0.83")] {
            controls.set_threshold(slider);
            let score = parse_reply(reply).unwrap();
            assert!(score.is_clutter(controls.threshold), "reply {reply}");
        }
    }

    #[test]
    fn test_limit_is_clamped() {
        let mut controls = Controls::default();
        controls.set_limit(0);
        assert_eq!(controls.limit, 1);
        controls.set_limit(500);
        assert_eq!(controls.limit, 100);
    }

    #[test]
    fn test_blank_label_scans_default_view() {
        let controls = Controls {
            label: "  ".to_string(),
            ..Controls::default()
        };
        assert_eq!(controls.to_config().unwrap().label().label(), None);
    }
}
