//! Contribution Factor
//!
//! Maps a contribution ratio (eggs shipped over fair share) onto the
//! contribution factor: a steep power curve up to the breakpoint, then a
//! shallow line that saturates.

use crate::params::ContributionCurve;

/// Contribution scorer
#[derive(Clone, Debug, Default)]
pub struct ContributionScorer {
    curve: ContributionCurve,
}

impl ContributionScorer {
    /// Create scorer with a curve
    pub fn new(curve: ContributionCurve) -> Self {
        Self { curve }
    }

    /// Contribution factor for a ratio
    ///
    /// Negative or non-finite ratios score as zero.
    pub fn factor(&self, ratio: f64) -> f64 {
        let ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
        if ratio <= self.curve.breakpoint {
            self.low_branch(ratio)
        } else {
            self.high_branch(ratio)
        }
    }

    /// Power branch, valid up to the breakpoint
    pub fn low_branch(&self, ratio: f64) -> f64 {
        self.curve.low_scale * ratio.powf(self.curve.low_exponent) + self.curve.low_offset
    }

    /// Linear branch, valid above the breakpoint
    pub fn high_branch(&self, ratio: f64) -> f64 {
        self.curve.high_slope * ratio.min(self.curve.saturation) + self.curve.high_offset
    }
}
