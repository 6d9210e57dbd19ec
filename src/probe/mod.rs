//! Quadrature-error probe
//!
//! Pipeline per sample: demapper → {power tracker, error tracker}
//!           → quadrature-error estimator → degrees → outputs / reports
//!
//! `QeCore` is the pure numeric pipeline, `ReportSchedule` decides when a
//! periodic report is due, and `QeProbe` ties both to a `ReportSink`.

pub mod controller;
pub mod pipeline;
pub mod schedule;

pub use controller::QeProbe;
pub use pipeline::{PipelineOutput, QeCore};
pub use schedule::ReportSchedule;
