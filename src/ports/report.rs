//! Report sink port

use crate::domain::{ProbeResult, QeReport};

/// Destination for periodic quadrature-error notifications.
///
/// Publishing is fire-and-forget: an `Err` means the report was dropped. The
/// probe counts the drop and carries on; it never retries.
pub trait ReportSink: Send {
    fn publish(&mut self, report: &QeReport) -> ProbeResult<()>;
}

impl<F> ReportSink for F
where
    F: FnMut(&QeReport) -> ProbeResult<()> + Send,
{
    fn publish(&mut self, report: &QeReport) -> ProbeResult<()> {
        self(report)
    }
}
