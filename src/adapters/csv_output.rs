//! CSV writer for the continuous angle channels
//!
//! One line per input sample: `index,angleh_deg,anglev_deg`.

use std::io::Write;

use crate::domain::{ProbeError, ProbeResult};
use crate::ports::AngleOutput;

pub struct CsvAngleWriter<W: Write> {
    writer: W,
    next_index: u64,
}

impl<W: Write> CsvAngleWriter<W> {
    /// Wrap `writer` and emit the header line
    pub fn new(mut writer: W) -> ProbeResult<Self> {
        writeln!(writer, "index,angleh_deg,anglev_deg")?;
        Ok(Self {
            writer,
            next_index: 0,
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AngleOutput for CsvAngleWriter<W> {
    fn write(&mut self, angleh: &[f32], anglev: &[f32]) -> ProbeResult<()> {
        if angleh.len() != anglev.len() {
            return Err(ProbeError::InvalidParameter(format!(
                "angle channels differ in length ({} vs {})",
                angleh.len(),
                anglev.len()
            )));
        }
        for (h, v) in angleh.iter().zip(anglev) {
            writeln!(self.writer, "{},{h},{v}", self.next_index)?;
            self.next_index += 1;
        }
        Ok(())
    }
}

/// Output that discards everything (reports only)
#[derive(Default)]
pub struct NullOutput;

impl AngleOutput for NullOutput {
    fn write(&mut self, _angleh: &[f32], _anglev: &[f32]) -> ProbeResult<()> {
        Ok(())
    }
}
