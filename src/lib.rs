//! Quadrature-Error Probe
//!
//! Passive estimator of I/Q amplitude/phase imbalance for a complex baseband
//! stream with a known constellation. Every sample is demapped to its nearest
//! ideal point; running averages of symbol power and per-symbol error yield
//! two angles (real-axis and imaginary-axis rotation) that are streamed per
//! sample and reported periodically.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types and configuration, no I/O dependencies
//! - `dsp/` - Per-sample estimation stages (demapper, trackers, estimator)
//! - `probe/` - The streaming controller built from those stages
//! - `ports/` - Trait definitions for sample sources, outputs and report sinks
//! - `adapters/` - Implementations of ports (files, CSV, crossbeam channel, log)
//! - `runner` - Reader thread + ring buffer feeding a probe from a source

// Core domain (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod ports;
pub mod probe;

// Adapters (external I/O)
pub mod adapters;
pub mod runner;

pub use domain::{ProbeConfig, ProbeError, ProbeResult};
pub use probe::QeProbe;
