//! Channel-backed report sink
//!
//! Hands reports to another thread over a bounded crossbeam channel. Sending
//! never blocks the sample path: a full or disconnected channel drops the
//! report and reports a transport error.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::domain::{ProbeError, ProbeResult, QeReport};
use crate::ports::ReportSink;

pub struct ChannelSink {
    tx: Sender<QeReport>,
}

impl ChannelSink {
    /// Create a sink and the receiver its reports arrive on
    pub fn bounded(capacity: usize) -> (Self, Receiver<QeReport>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelSink {
    fn publish(&mut self, report: &QeReport) -> ProbeResult<()> {
        self.tx.try_send(*report).map_err(|e| match e {
            TrySendError::Full(_) => ProbeError::Transport("report channel full".to_string()),
            TrySendError::Disconnected(_) => {
                ProbeError::Transport("report channel disconnected".to_string())
            }
        })
    }
}
