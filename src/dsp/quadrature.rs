//! Quadrature-error estimator
//!
//! Turns the averaged symbol error into the apparent rotation of each
//! constellation axis. The error is normalized by the RMS amplitude of the
//! ideal symbols, `sqrt(avg_power)`:
//!
//! ```text
//! angle_real = atan2(err.im, sqrt(P))   // off-axis displacement of I
//! angle_imag = atan2(err.re, sqrt(P))   // off-axis displacement of Q
//! ```
//!
//! Both mappings are odd and zero-preserving in their error component, so a
//! balanced signal reads 0 on each axis. `atan2` keeps the result finite for
//! any error magnitude.
//!
//! Below the power floor there is no meaningful amplitude to normalize
//! against (start of stream, dropout, all-zero constellation point), and both
//! angles are reported as 0.

use num_complex::Complex64;

use crate::domain::{AngleEstimate, ProbeError, ProbeResult};

pub struct QuadratureEstimator {
    power_floor: f64,
}

impl QuadratureEstimator {
    pub fn new(power_floor: f64) -> ProbeResult<Self> {
        if !power_floor.is_finite() || power_floor < 0.0 {
            return Err(ProbeError::InvalidParameter(format!(
                "power floor must be finite and non-negative, got {power_floor}"
            )));
        }
        Ok(Self { power_floor })
    }

    /// Angle estimate for the current averages, or zero when the power is
    /// degenerate
    pub fn estimate(&self, avg_power: f64, error: Complex64) -> AngleEstimate {
        self.try_estimate(avg_power, error)
            .unwrap_or(AngleEstimate::ZERO)
    }

    /// Like [`estimate`](Self::estimate), but `None` when the power is at or
    /// below the floor
    pub fn try_estimate(&self, avg_power: f64, error: Complex64) -> Option<AngleEstimate> {
        if !avg_power.is_finite() || avg_power <= self.power_floor {
            return None;
        }
        let amplitude = avg_power.sqrt();
        Some(AngleEstimate {
            angle_real: error.im.atan2(amplitude),
            angle_imag: error.re.atan2(amplitude),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_error_gives_zero_angles() {
        let qe = QuadratureEstimator::new(1e-12).unwrap();
        assert_eq!(qe.estimate(1.0, Complex64::new(0.0, 0.0)), AngleEstimate::ZERO);
    }

    #[test]
    fn normalizes_by_rms_amplitude() {
        let qe = QuadratureEstimator::new(1e-12).unwrap();
        let est = qe.estimate(4.0, Complex64::new(0.2, 0.1));
        assert!((est.angle_real - (0.1f64 / 2.0).atan()).abs() < 1e-15);
        assert!((est.angle_imag - (0.2f64 / 2.0).atan()).abs() < 1e-15);
    }

    #[test]
    fn mapping_is_odd() {
        let qe = QuadratureEstimator::new(1e-12).unwrap();
        let e = Complex64::new(0.07, -0.03);
        let pos = qe.estimate(0.5, e);
        let neg = qe.estimate(0.5, -e);
        assert!((pos.angle_real + neg.angle_real).abs() < 1e-15);
        assert!((pos.angle_imag + neg.angle_imag).abs() < 1e-15);
        assert!(pos.angle_real < 0.0 && pos.angle_imag > 0.0);
    }

    #[test]
    fn degenerate_power_is_absorbed() {
        let qe = QuadratureEstimator::new(1e-6).unwrap();
        let e = Complex64::new(0.5, 0.5);
        assert_eq!(qe.estimate(0.0, e), AngleEstimate::ZERO);
        assert_eq!(qe.estimate(1e-6, e), AngleEstimate::ZERO);
        assert_eq!(qe.estimate(f64::NAN, e), AngleEstimate::ZERO);
        assert!(qe.try_estimate(1e-7, e).is_none());
        assert!(qe.try_estimate(1e-5, e).is_some());
    }

    #[test]
    fn rejects_invalid_floor() {
        assert!(QuadratureEstimator::new(-1.0).is_err());
        assert!(QuadratureEstimator::new(f64::INFINITY).is_err());
        assert!(QuadratureEstimator::new(0.0).is_ok());
    }
}
