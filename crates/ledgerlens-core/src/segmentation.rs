use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::records::Segment;

pub const DEFAULT_LOW_THRESHOLD: f64 = 1000.0;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 5000.0;

/// Upper bounds of the Low and Medium bins. Each bin is closed on the right, so a value equal
/// to a threshold falls into the lower bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentThresholds {
    #[serde(default = "default_low")]
    pub low: f64,
    #[serde(default = "default_high")]
    pub high: f64,
}

fn default_low() -> f64 {
    DEFAULT_LOW_THRESHOLD
}

fn default_high() -> f64 {
    DEFAULT_HIGH_THRESHOLD
}

impl Default for SegmentThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl SegmentThresholds {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let thresholds = Self { low, high };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(PipelineError::Config(format!(
                "segment thresholds must be finite (low={}, high={})",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(PipelineError::Config(format!(
                "low segment threshold {} exceeds high threshold {}",
                self.low, self.high
            )));
        }
        Ok(())
    }

    pub fn classify(&self, lifetime_value: f64) -> Segment {
        if lifetime_value <= self.low {
            Segment::Low
        } else if lifetime_value <= self.high {
            Segment::Medium
        } else {
            Segment::High
        }
    }
}
