//! Digital Signal Processing
//!
//! The per-sample estimation stages. Pure state machines, no I/O.

pub mod constellation;
pub mod demapper;
pub mod error_tracker;
pub mod power;
pub mod quadrature;

// Re-export commonly used items
pub use constellation::ConstellationTable;
pub use demapper::Demapper;
pub use error_tracker::ErrorTracker;
pub use power::PowerTracker;
pub use quadrature::QuadratureEstimator;
