//! Probe configuration
//!
//! A `ProbeConfig` holds everything needed to construct a probe: the symbol
//! table (explicit or by preset name), the smoothing factor shared by both
//! trackers, the reporting period and the power floor below which angle
//! estimates are forced to zero.

use std::path::Path;

use num_complex::Complex32;
use serde::{Deserialize, Serialize};

use super::error::{ProbeError, ProbeResult};

fn default_name() -> String {
    "default".to_string()
}

fn default_alpha() -> f64 {
    0.1
}

fn default_period() -> u64 {
    1000
}

fn default_power_floor() -> f64 {
    1e-12
}

/// Construction-time configuration of a QE probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Profile name, only used for logging
    #[serde(default = "default_name")]
    pub name: String,
    /// Ideal constellation points as `[re, im]` pairs, in index order
    #[serde(default)]
    pub symbol_table: Vec<Complex32>,
    /// Named constellation ("bpsk", "qpsk", "psk8", "qam16"), used when
    /// `symbol_table` is empty
    #[serde(default)]
    pub preset: Option<String>,
    /// EMA smoothing factor in (0, 1]
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Samples between periodic reports
    #[serde(default = "default_period")]
    pub period: u64,
    /// Average power at or below which both angles are reported as zero
    #[serde(default = "default_power_floor")]
    pub power_floor: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol_table: Vec::new(),
            preset: None,
            alpha: default_alpha(),
            period: default_period(),
            power_floor: default_power_floor(),
        }
    }
}

impl ProbeConfig {
    /// Config with an explicit symbol table and the given smoothing factor
    pub fn new(symbol_table: Vec<Complex32>, alpha: f64) -> Self {
        Self {
            symbol_table,
            alpha,
            ..Self::default()
        }
    }

    /// Config using a named constellation
    pub fn with_preset(preset: &str, alpha: f64) -> Self {
        Self {
            preset: Some(preset.to_string()),
            alpha,
            ..Self::default()
        }
    }

    pub fn period(mut self, period: u64) -> Self {
        self.period = period;
        self
    }

    pub fn power_floor(mut self, power_floor: f64) -> Self {
        self.power_floor = power_floor;
        self
    }

    /// Check every scalar parameter and that some constellation is given.
    ///
    /// Preset names are resolved (and checked) when the constellation table
    /// is built. Values JSON cannot represent in these fields, such as a
    /// negative or fractional `period`, never reach this check: [`load`]
    /// rejects them while parsing and returns [`ProbeError::Config`].
    ///
    /// [`load`]: Self::load
    pub fn validate(&self) -> ProbeResult<()> {
        check_alpha(self.alpha)?;
        if self.period == 0 {
            return Err(ProbeError::InvalidParameter(
                "period must be greater than zero".to_string(),
            ));
        }
        if !self.power_floor.is_finite() || self.power_floor < 0.0 {
            return Err(ProbeError::InvalidParameter(format!(
                "power floor must be finite and non-negative, got {}",
                self.power_floor
            )));
        }
        if self.symbol_table.is_empty() && self.preset.is_none() {
            return Err(ProbeError::InvalidParameter(
                "symbol table is empty".to_string(),
            ));
        }
        if let Some(p) = self.symbol_table.iter().find(|p| !p.re.is_finite() || !p.im.is_finite()) {
            return Err(ProbeError::InvalidParameter(format!(
                "symbol table contains a non-finite point {p}"
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("Failed to read '{}': {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| ProbeError::Config(format!("Failed to parse '{}': {e}", path.display())))
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> ProbeResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ProbeError::Config(format!("Serialization error: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| ProbeError::Config(format!("Failed to write '{}': {e}", path.display())))
    }
}

/// Validate an EMA smoothing factor: must lie in (0, 1]
pub fn check_alpha(alpha: f64) -> ProbeResult<f64> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(alpha)
    } else {
        Err(ProbeError::InvalidParameter(format!(
            "alpha must be in (0, 1], got {alpha}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qpsk_table() -> Vec<Complex32> {
        vec![
            Complex32::new(1.0, 0.0),
            Complex32::new(-1.0, 0.0),
            Complex32::new(0.0, 1.0),
            Complex32::new(0.0, -1.0),
        ]
    }

    #[test]
    fn default_configuration_has_sensible_values() {
        let config = ProbeConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.period, 1000);
        assert!(config.symbol_table.is_empty());
    }

    #[test]
    fn valid_configuration_passes() {
        assert!(ProbeConfig::new(qpsk_table(), 0.1).validate().is_ok());
        assert!(ProbeConfig::new(qpsk_table(), 1.0).validate().is_ok());
        assert!(ProbeConfig::with_preset("qpsk", 0.5).validate().is_ok());
    }

    #[test]
    fn rejects_bad_alpha() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            let err = ProbeConfig::new(qpsk_table(), alpha).validate();
            assert!(
                matches!(err, Err(ProbeError::InvalidParameter(_))),
                "alpha {alpha} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_zero_period_and_empty_table() {
        let err = ProbeConfig::new(qpsk_table(), 0.1).period(0).validate();
        assert!(matches!(err, Err(ProbeError::InvalidParameter(_))));

        let err = ProbeConfig::new(Vec::new(), 0.1).validate();
        assert!(matches!(err, Err(ProbeError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_negative_power_floor() {
        let err = ProbeConfig::new(qpsk_table(), 0.1).power_floor(-1.0).validate();
        assert!(matches!(err, Err(ProbeError::InvalidParameter(_))));
    }

    #[test]
    fn parses_json_with_defaults() {
        let json = r#"{ "symbol_table": [[1.0, 0.0], [-1.0, 0.0]] }"#;
        let config: ProbeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.symbol_table.len(), 2);
        assert_eq!(config.symbol_table[1], Complex32::new(-1.0, 0.0));
        assert_eq!(config.period, 1000);
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.power_floor, 1e-12);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.json");
        let config = ProbeConfig::new(qpsk_table(), 0.25).period(500);
        config.save(&path).unwrap();
        assert_eq!(ProbeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn negative_period_in_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.json");
        std::fs::write(&path, r#"{ "preset": "qpsk", "period": -5 }"#).unwrap();
        assert!(matches!(ProbeConfig::load(&path), Err(ProbeError::Config(_))));
    }

    #[test]
    fn load_reports_missing_file_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProbeConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(err, Err(ProbeError::Config(_))));
    }
}
