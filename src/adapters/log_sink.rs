//! Report sink that writes every notification to the log.
//!
//! Useful as a default when nothing subscribes to the reports:
//!
//!   RUST_LOG=qeprobe_lib=info qeprobe --input capture.cfile --preset qpsk --log-reports

use crate::domain::{ProbeResult, QeReport};
use crate::ports::ReportSink;

#[derive(Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for LogSink {
    fn publish(&mut self, report: &QeReport) -> ProbeResult<()> {
        log::info!(
            "[{}] {:+.4}° (sample {})",
            report.axis.topic(),
            report.degrees,
            report.sample_index
        );
        Ok(())
    }
}
