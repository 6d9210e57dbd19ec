//! Core domain types

use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

/// Received complex baseband sample (single precision, as delivered by SDR front ends)
pub type IqSample = Complex32;

/// One ideal point of a constellation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationPoint {
    pub value: Complex64,
    pub index: usize,
}

/// Outcome of classifying one sample: the nearest ideal point and its index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemapResult {
    pub ideal: Complex64,
    pub index: usize,
}

/// Apparent rotation of the real and imaginary axes, in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleEstimate {
    pub angle_real: f64,
    pub angle_imag: f64,
}

impl AngleEstimate {
    pub const ZERO: AngleEstimate = AngleEstimate {
        angle_real: 0.0,
        angle_imag: 0.0,
    };

    /// Both angles converted to degrees, (real axis, imaginary axis)
    pub fn to_degrees(self) -> (f64, f64) {
        (self.angle_real.to_degrees(), self.angle_imag.to_degrees())
    }
}

/// Constellation axis a quadrature-error value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// In-phase (real) axis, reported as "angleh"
    Real,
    /// Quadrature (imaginary) axis, reported as "anglev"
    Imag,
}

impl Axis {
    /// Name of the notification topic carrying this axis
    pub fn topic(self) -> &'static str {
        match self {
            Axis::Real => "angleh_msg",
            Axis::Imag => "anglev_msg",
        }
    }
}

/// Periodic notification: the latest angle for one axis, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QeReport {
    pub axis: Axis,
    pub degrees: f64,
    /// Zero-based position of the triggering sample in the stream
    pub sample_index: u64,
}

/// Running counters for a probe instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeStatus {
    pub samples_processed: u64,
    /// Report pairs that reached the publish step
    pub reports_emitted: u64,
    /// Individual notifications the sink refused
    pub reports_dropped: u64,
    /// Non-finite input samples skipped by the input guard
    pub rejected_samples: u64,
    /// Samples whose average power sat at or below the floor
    pub degenerate_samples: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_topics_match_message_ports() {
        assert_eq!(Axis::Real.topic(), "angleh_msg");
        assert_eq!(Axis::Imag.topic(), "anglev_msg");
    }

    #[test]
    fn report_serializes_axis_lowercase() {
        let report = QeReport {
            axis: Axis::Imag,
            degrees: 1.5,
            sample_index: 1000,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"axis\":\"imag\""));
        assert!(json.contains("\"sample_index\":1000"));
    }

    #[test]
    fn angle_estimate_converts_to_degrees() {
        let est = AngleEstimate {
            angle_real: std::f64::consts::FRAC_PI_2,
            angle_imag: -std::f64::consts::PI,
        };
        let (h, v) = est.to_degrees();
        assert!((h - 90.0).abs() < 1e-12);
        assert!((v + 180.0).abs() < 1e-12);
    }
}
