//! Average transmitted-power tracker
//!
//! Exponential moving average of |ideal|² over the demapped symbol stream.
//! The first observation seeds the average directly so the estimate is
//! usable from the first sample.

use num_complex::Complex64;

use crate::domain::{check_alpha, ProbeResult};

pub struct PowerTracker {
    alpha: f64,
    avg_power: f64,
    seeded: bool,
}

impl PowerTracker {
    pub fn new(alpha: f64) -> ProbeResult<Self> {
        Ok(Self {
            alpha: check_alpha(alpha)?,
            avg_power: 0.0,
            seeded: false,
        })
    }

    /// Fold one ideal symbol into the average and return the new average
    pub fn update_avg_power(&mut self, ideal: Complex64) -> f64 {
        let power = ideal.norm_sqr();
        if self.seeded {
            self.avg_power = self.alpha * power + (1.0 - self.alpha) * self.avg_power;
        } else {
            self.avg_power = power;
            self.seeded = true;
        }
        self.avg_power
    }

    /// Current average; 0 before the first sample
    pub fn avg_power(&self) -> f64 {
        self.avg_power
    }
}
