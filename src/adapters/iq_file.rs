//! Raw I/Q file source
//!
//! Reads interleaved little-endian `f32` pairs (I then Q), the layout GNU
//! Radio's file sink writes for complex streams (`.cfile`). Works over any
//! `Read`, so tests can feed it a `Cursor`.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::domain::{IqSample, ProbeError, ProbeResult};
use crate::ports::IqSource;

const BYTES_PER_SAMPLE: usize = 8;

pub struct IqFileSource<R> {
    reader: R,
    bytes: Vec<u8>,
    /// Bytes of an incomplete sample carried over from the last read
    pending: usize,
}

impl IqFileSource<BufReader<File>> {
    pub fn open(path: &Path) -> ProbeResult<Self> {
        let file = File::open(path)
            .map_err(|e| ProbeError::Io(format!("Failed to open '{}': {e}", path.display())))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> IqFileSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes: Vec::new(),
            pending: 0,
        }
    }
}

impl<R: Read + Send> IqSource for IqFileSource<R> {
    fn read_batch(&mut self, buf: &mut [IqSample]) -> ProbeResult<usize> {
        let want = buf.len() * BYTES_PER_SAMPLE;
        if want == 0 {
            return Ok(0);
        }
        if self.bytes.len() < want {
            self.bytes.resize(want, 0);
        }

        // Read until at least one whole sample is buffered, or EOF
        let mut filled = self.pending;
        let mut eof = false;
        while filled < BYTES_PER_SAMPLE {
            match self.reader.read(&mut self.bytes[filled..want]) {
                Ok(0) => {
                    eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let complete = filled / BYTES_PER_SAMPLE;
        if complete == 0 {
            if eof && filled > 0 {
                log::warn!("Discarding {filled} trailing bytes (incomplete I/Q sample)");
            }
            self.pending = 0;
            return Ok(0);
        }

        for (sample, chunk) in buf
            .iter_mut()
            .zip(self.bytes[..complete * BYTES_PER_SAMPLE].chunks_exact(BYTES_PER_SAMPLE))
        {
            let re = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let im = f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
            *sample = IqSample::new(re, im);
        }

        let used = complete * BYTES_PER_SAMPLE;
        self.bytes.copy_within(used..filled, 0);
        self.pending = filled - used;
        Ok(complete)
    }
}

/// Encode samples in the same interleaved little-endian layout
pub fn encode_iq(samples: &[IqSample]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for s in samples {
        out.extend_from_slice(&s.re.to_le_bytes());
        out.extend_from_slice(&s.im.to_le_bytes());
    }
    out
}
