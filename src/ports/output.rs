//! Continuous output port

use crate::domain::ProbeResult;

/// Consumer of the two per-sample angle channels (degrees).
///
/// Both slices always have the same length; element `i` of each belongs to
/// the same input sample.
pub trait AngleOutput {
    fn write(&mut self, angleh: &[f32], anglev: &[f32]) -> ProbeResult<()>;
}
