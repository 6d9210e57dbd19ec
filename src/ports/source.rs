//! Sample source port

use crate::domain::{IqSample, ProbeResult};

/// Supplier of complex baseband samples, consumed in batches
pub trait IqSource: Send {
    /// Fill `buf` from the front with as many samples as are available.
    ///
    /// Returns the number written; 0 means the stream has ended.
    fn read_batch(&mut self, buf: &mut [IqSample]) -> ProbeResult<usize>;
}
