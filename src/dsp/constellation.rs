//! Constellation table
//!
//! Immutable, ordered set of ideal symbol values. A point's index is its
//! position in the table.

use num_complex::{Complex32, Complex64};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::domain::{ConstellationPoint, ProbeConfig, ProbeError, ProbeResult};

/// Ordered, non-empty set of ideal constellation points
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationTable {
    points: Vec<Complex64>,
}

impl ConstellationTable {
    /// Build a table from single-precision points, as found in configs.
    pub fn new(symbols: &[Complex32]) -> ProbeResult<Self> {
        Self::from_points(
            symbols
                .iter()
                .map(|s| Complex64::new(s.re as f64, s.im as f64))
                .collect(),
        )
    }

    pub fn from_points(points: Vec<Complex64>) -> ProbeResult<Self> {
        if points.is_empty() {
            return Err(ProbeError::InvalidParameter(
                "symbol table is empty".to_string(),
            ));
        }
        if points.iter().any(|p| !p.re.is_finite() || !p.im.is_finite()) {
            return Err(ProbeError::InvalidParameter(
                "symbol table contains a non-finite point".to_string(),
            ));
        }
        Ok(Self { points })
    }

    /// Resolve the table a config asks for. An explicit table wins over a preset.
    pub fn from_config(config: &ProbeConfig) -> ProbeResult<Self> {
        if !config.symbol_table.is_empty() {
            return Self::new(&config.symbol_table);
        }
        match config.preset.as_deref() {
            Some(name) => Self::preset(name),
            None => Err(ProbeError::InvalidParameter(
                "symbol table is empty".to_string(),
            )),
        }
    }

    /// Look up a named constellation
    pub fn preset(name: &str) -> ProbeResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bpsk" => Ok(Self::bpsk()),
            "qpsk" => Ok(Self::qpsk()),
            "psk8" | "8psk" => Ok(Self::psk8()),
            "qam16" | "16qam" => Ok(Self::qam16()),
            other => Err(ProbeError::InvalidParameter(format!(
                "unknown constellation preset '{other}'"
            ))),
        }
    }

    /// BPSK: {+1, -1}
    pub fn bpsk() -> Self {
        Self {
            points: vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)],
        }
    }

    /// QPSK: {±1 ± j}/√2
    pub fn qpsk() -> Self {
        let s = FRAC_1_SQRT_2;
        Self {
            points: vec![
                Complex64::new(s, s),
                Complex64::new(-s, s),
                Complex64::new(-s, -s),
                Complex64::new(s, -s),
            ],
        }
    }

    /// 8-PSK on the unit circle, point 0 at 0°
    pub fn psk8() -> Self {
        Self {
            points: (0..8)
                .map(|k| Complex64::from_polar(1.0, 2.0 * PI * k as f64 / 8.0))
                .collect(),
        }
    }

    /// 16-QAM, 4×4 grid normalized to unit average power
    pub fn qam16() -> Self {
        let levels = [-3.0, -1.0, 1.0, 3.0];
        let norm = 1.0 / 10.0_f64.sqrt();
        let mut points = Vec::with_capacity(16);
        for &re in &levels {
            for &im in &levels {
                points.push(Complex64::new(re * norm, im * norm));
            }
        }
        Self { points }
    }

    /// Number of points (N)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a constructed table
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> &[Complex64] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<ConstellationPoint> {
        self.points
            .get(index)
            .map(|&value| ConstellationPoint { value, index })
    }

    pub fn points(&self) -> impl Iterator<Item = ConstellationPoint> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(index, &value)| ConstellationPoint { value, index })
    }

    /// Mean of |point|² over the table
    pub fn average_power(&self) -> f64 {
        self.points.iter().map(|p| p.norm_sqr()).sum::<f64>() / self.points.len() as f64
    }
}
