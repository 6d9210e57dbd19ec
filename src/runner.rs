//! Stream runner — feeds a probe from an `IqSource` on a reader thread
//!
//! Flow: source → reader thread → ring buffer → processing loop
//!       → `QeProbe::work` → `AngleOutput` (+ reports via the probe's sink)
//!
//! The probe itself is only touched by the calling thread. The ring buffer
//! decouples source latency (disk, network, SDR driver) from the per-sample
//! work, the same way a capture callback would hand samples to a DSP loop.

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::{IqSample, ProbeError, ProbeResult, ProbeStatus};
use crate::ports::{AngleOutput, IqSource};
use crate::probe::QeProbe;

/// Idle wait when the ring buffer is empty (reader) or full (writer)
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Batch and buffer sizes for [`run_stream`]
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Samples handed to `QeProbe::work` per call
    pub batch_size: usize,
    /// Ring buffer capacity in samples
    pub buffer_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: 4096,
            buffer_capacity: 65536,
        }
    }
}

impl RunnerConfig {
    fn validate(&self) -> ProbeResult<()> {
        if self.batch_size == 0 || self.buffer_capacity == 0 {
            return Err(ProbeError::InvalidParameter(
                "batch size and buffer capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples read from the source
    pub samples_read: u64,
    /// Samples pushed through the probe
    pub samples_processed: u64,
    pub status: ProbeStatus,
}

/// Run `probe` over every sample of `source`.
///
/// Returns once the source is exhausted and drained, or early when `running`
/// is cleared (samples still buffered are then left unprocessed).
pub fn run_stream<S>(
    source: S,
    probe: &mut QeProbe,
    output: &mut dyn AngleOutput,
    running: Arc<AtomicBool>,
    config: &RunnerConfig,
) -> ProbeResult<RunSummary>
where
    S: IqSource + 'static,
{
    config.validate()?;

    let rb = HeapRb::<IqSample>::new(config.buffer_capacity);
    let (producer, mut consumer) = rb.split();
    let source_done = Arc::new(AtomicBool::new(false));

    let reader = {
        let running = Arc::clone(&running);
        let source_done = Arc::clone(&source_done);
        let batch_size = config.batch_size;
        thread::spawn(move || {
            let result = read_into(source, producer, &running, batch_size);
            source_done.store(true, Ordering::SeqCst);
            result
        })
    };

    let processed = process_loop(probe, output, &mut consumer, &running, &source_done, config.batch_size);
    if processed.is_err() {
        // Unblock the reader so the join below returns
        running.store(false, Ordering::SeqCst);
    }

    let samples_read = reader
        .join()
        .map_err(|_| ProbeError::Io("Sample reader thread panicked".to_string()))??;
    let samples_processed = processed?;

    log::info!(
        "Stream finished: {samples_read} samples read, {samples_processed} processed, {} report pairs",
        probe.status().reports_emitted
    );

    Ok(RunSummary {
        samples_read,
        samples_processed,
        status: probe.status(),
    })
}

/// Reader side: pull batches from the source and push them into the ring buffer
fn read_into<S, P>(mut source: S, mut producer: P, running: &AtomicBool, batch_size: usize) -> ProbeResult<u64>
where
    S: IqSource,
    P: Producer<Item = IqSample>,
{
    let mut buf = vec![IqSample::new(0.0, 0.0); batch_size];
    let mut total = 0u64;

    while running.load(Ordering::SeqCst) {
        let n = source.read_batch(&mut buf)?;
        if n == 0 {
            log::debug!("Source exhausted after {total} samples");
            break;
        }
        total += n as u64;

        let mut pushed = 0;
        while pushed < n {
            pushed += producer.push_slice(&buf[pushed..n]);
            if pushed < n {
                if !running.load(Ordering::SeqCst) {
                    return Ok(total);
                }
                thread::sleep(IDLE_SLEEP);
            }
        }
    }

    Ok(total)
}

/// Processing side: drain the ring buffer through the probe in batches
fn process_loop<C>(
    probe: &mut QeProbe,
    output: &mut dyn AngleOutput,
    consumer: &mut C,
    running: &AtomicBool,
    source_done: &AtomicBool,
    batch_size: usize,
) -> ProbeResult<u64>
where
    C: Consumer<Item = IqSample>,
{
    let mut batch = vec![IqSample::new(0.0, 0.0); batch_size];
    let mut angleh = vec![0.0f32; batch_size];
    let mut anglev = vec![0.0f32; batch_size];
    let mut processed = 0u64;

    while running.load(Ordering::SeqCst) {
        let n = consumer.pop_slice(&mut batch);
        if n == 0 {
            // `done` before emptiness: every push happens before `done` is set
            if source_done.load(Ordering::SeqCst) && consumer.is_empty() {
                break;
            }
            thread::sleep(IDLE_SLEEP);
            continue;
        }

        let produced = probe.work(&batch[..n], &mut angleh[..n], &mut anglev[..n]);
        output.write(&angleh[..produced], &anglev[..produced])?;
        processed += produced as u64;
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::iq_file::{encode_iq, IqFileSource};
    use crate::adapters::NullOutput;
    use crate::domain::{ProbeConfig, QeReport};
    use std::io::Cursor;

    fn probe() -> QeProbe {
        let sink = |_: &QeReport| -> ProbeResult<()> { Ok(()) };
        QeProbe::new(&ProbeConfig::with_preset("bpsk", 0.1).period(10), Box::new(sink)).unwrap()
    }

    #[test]
    fn processes_every_sample_with_small_buffers() {
        let samples = vec![IqSample::new(1.0, 0.0); 1000];
        let source = IqFileSource::new(Cursor::new(encode_iq(&samples)));
        let mut probe = probe();
        let config = RunnerConfig {
            batch_size: 7,
            buffer_capacity: 16,
        };
        let summary = run_stream(
            source,
            &mut probe,
            &mut NullOutput,
            Arc::new(AtomicBool::new(true)),
            &config,
        )
        .unwrap();

        assert_eq!(summary.samples_read, 1000);
        assert_eq!(summary.samples_processed, 1000);
        assert_eq!(summary.status.samples_processed, 1000);
        assert_eq!(summary.status.reports_emitted, 1000 / 11);
    }

    #[test]
    fn cleared_flag_stops_immediately() {
        let samples = vec![IqSample::new(1.0, 0.0); 100];
        let source = IqFileSource::new(Cursor::new(encode_iq(&samples)));
        let mut probe = probe();
        let summary = run_stream(
            source,
            &mut probe,
            &mut NullOutput,
            Arc::new(AtomicBool::new(false)),
            &RunnerConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.samples_processed, 0);
    }

    #[test]
    fn rejects_zero_batch() {
        let source = IqFileSource::new(Cursor::new(Vec::new()));
        let config = RunnerConfig {
            batch_size: 0,
            buffer_capacity: 16,
        };
        let result = run_stream(
            source,
            &mut probe(),
            &mut NullOutput,
            Arc::new(AtomicBool::new(true)),
            &config,
        );
        assert!(matches!(result, Err(ProbeError::InvalidParameter(_))));
    }
}
