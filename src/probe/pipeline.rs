//! Numeric core of the probe
//!
//! One call to [`QeCore::update`] per sample. Work per sample is a scan of
//! the constellation plus a handful of arithmetic operations; nothing is
//! allocated after construction.

use num_complex::Complex64;

use crate::domain::{AngleEstimate, DemapResult, ProbeConfig, ProbeResult};
use crate::dsp::{ConstellationTable, Demapper, ErrorTracker, PowerTracker, QuadratureEstimator};

/// Everything the pipeline derived from one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOutput {
    pub demap: DemapResult,
    pub avg_power: f64,
    /// Running error average of the sample's symbol
    pub error: Complex64,
    pub angles: AngleEstimate,
    /// Average power was at or below the floor; `angles` are forced to zero
    pub degenerate: bool,
}

/// Demapper, trackers and estimator, run in a fixed order per sample
pub struct QeCore {
    demapper: Demapper,
    power: PowerTracker,
    errors: ErrorTracker,
    estimator: QuadratureEstimator,
}

impl QeCore {
    pub fn new(config: &ProbeConfig) -> ProbeResult<Self> {
        config.validate()?;
        let table = ConstellationTable::from_config(config)?;
        Self::from_parts(table, config.alpha, config.power_floor)
    }

    pub fn from_parts(table: ConstellationTable, alpha: f64, power_floor: f64) -> ProbeResult<Self> {
        let dimension = table.len();
        Ok(Self {
            demapper: Demapper::new(table),
            power: PowerTracker::new(alpha)?,
            errors: ErrorTracker::new(dimension, alpha)?,
            estimator: QuadratureEstimator::new(power_floor)?,
        })
    }

    /// Run one sample through the pipeline.
    ///
    /// Both trackers observe the same demap result. A non-finite sample
    /// returns `None` and leaves every tracker untouched.
    pub fn update(&mut self, sample: Complex64) -> Option<PipelineOutput> {
        if !sample.re.is_finite() || !sample.im.is_finite() {
            return None;
        }
        let demap = self.demapper.demap(sample);
        let avg_power = self.power.update_avg_power(demap.ideal);
        let error = self.errors.update_error(sample, demap.ideal, demap.index);
        let (angles, degenerate) = match self.estimator.try_estimate(avg_power, error) {
            Some(angles) => (angles, false),
            None => (AngleEstimate::ZERO, true),
        };

        Some(PipelineOutput {
            demap,
            avg_power,
            error,
            angles,
            degenerate,
        })
    }

    pub fn demapper(&self) -> &Demapper {
        &self.demapper
    }

    pub fn error_tracker(&self) -> &ErrorTracker {
        &self.errors
    }

    pub fn avg_power(&self) -> f64 {
        self.power.avg_power()
    }
}
