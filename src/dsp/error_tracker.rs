//! Per-symbol error tracker
//!
//! Keeps one exponential moving average of the error vector
//! (received − ideal) for every constellation index. Under I/Q imbalance
//! each point is displaced differently, so a single global average would
//! cancel the bias out; per-point averages preserve it.
//!
//! Storage is a fixed slot per index, allocated once at construction. A slot
//! is seeded with the first error seen for its index.

use num_complex::Complex64;

use crate::domain::{check_alpha, ProbeError, ProbeResult};

pub struct ErrorTracker {
    alpha: f64,
    averages: Vec<Option<Complex64>>,
}

impl ErrorTracker {
    /// Tracker for a constellation of `dimension` points
    pub fn new(dimension: usize, alpha: f64) -> ProbeResult<Self> {
        if dimension == 0 {
            return Err(ProbeError::InvalidParameter(
                "constellation dimension must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            alpha: check_alpha(alpha)?,
            averages: vec![None; dimension],
        })
    }

    /// Fold the error of one classified sample into its symbol's average and
    /// return that average.
    ///
    /// `index` must come from a demapper over the same constellation.
    pub fn update_error(&mut self, received: Complex64, ideal: Complex64, index: usize) -> Complex64 {
        let err = received - ideal;
        let slot = &mut self.averages[index];
        let updated = match *slot {
            Some(avg) => err * self.alpha + avg * (1.0 - self.alpha),
            None => err,
        };
        *slot = Some(updated);
        updated
    }

    /// Current average for `index`; `None` until that symbol has been seen
    pub fn average(&self, index: usize) -> ProbeResult<Option<Complex64>> {
        self.averages.get(index).copied().ok_or_else(|| {
            ProbeError::InvalidParameter(format!(
                "symbol index {index} out of range for {} points",
                self.averages.len()
            ))
        })
    }

    /// Number of symbols observed at least once
    pub fn observed_symbols(&self) -> usize {
        self.averages.iter().filter(|a| a.is_some()).count()
    }
}
