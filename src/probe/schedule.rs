//! Report cadence
//!
//! Counts samples and fires once the count exceeds the period, then starts
//! over from zero. A report therefore lands every `period + 1` samples.

pub struct ReportSchedule {
    count: u64,
    period: u64,
}

impl ReportSchedule {
    pub fn new(period: u64) -> Self {
        Self { count: 0, period }
    }

    /// Account for one sample; true when a report is due
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count > self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
