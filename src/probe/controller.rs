//! Streaming controller
//!
//! Drives [`QeCore`] one sample at a time, writes the two continuous angle
//! channels (degrees) and publishes a report pair to the sink whenever the
//! [`ReportSchedule`] fires. Samples are processed strictly in order; the
//! trackers carry state from each sample to the next.

use num_complex::Complex64;

use super::pipeline::QeCore;
use super::schedule::ReportSchedule;
use crate::domain::{Axis, IqSample, ProbeConfig, ProbeResult, ProbeStatus, QeReport};
use crate::ports::ReportSink;

/// Quadrature-error probe: per-sample estimation plus periodic reporting
pub struct QeProbe {
    core: QeCore,
    schedule: ReportSchedule,
    sink: Box<dyn ReportSink>,
    /// Latest (angleh, anglev) in degrees
    latest: (f64, f64),
    status: ProbeStatus,
}

impl QeProbe {
    /// Validate `config` and build a probe publishing to `sink`
    pub fn new(config: &ProbeConfig, sink: Box<dyn ReportSink>) -> ProbeResult<Self> {
        let core = QeCore::new(config)?;
        log::info!(
            "QE probe '{}' ready: {} constellation points, alpha={}, period={}, power_floor={:e}",
            config.name,
            core.demapper().dimension(),
            config.alpha,
            config.period,
            config.power_floor
        );
        Ok(Self {
            core,
            schedule: ReportSchedule::new(config.period),
            sink,
            latest: (0.0, 0.0),
            status: ProbeStatus::default(),
        })
    }

    /// Process one sample and return (angleh, anglev) in degrees.
    ///
    /// Non-finite samples never reach the trackers: the previous angles are
    /// repeated, but the sample still counts toward the report period.
    pub fn process_sample(&mut self, sample: IqSample) -> (f64, f64) {
        let sample_index = self.status.samples_processed;
        self.status.samples_processed += 1;

        match self
            .core
            .update(Complex64::new(sample.re as f64, sample.im as f64))
        {
            Some(out) => {
                if out.degenerate {
                    self.status.degenerate_samples += 1;
                }
                self.latest = out.angles.to_degrees();
            }
            None => {
                self.status.rejected_samples += 1;
                if self.status.rejected_samples == 1 {
                    log::warn!("Rejecting non-finite sample {sample} at position {sample_index}");
                }
            }
        }

        if self.schedule.tick() {
            self.emit(sample_index);
        }

        self.latest
    }

    /// Process a batch. Consumes as many samples as both output buffers can
    /// hold and returns that count.
    pub fn work(&mut self, input: &[IqSample], angleh_out: &mut [f32], anglev_out: &mut [f32]) -> usize {
        let mut produced = 0;
        for ((&sample, h), v) in input
            .iter()
            .zip(angleh_out.iter_mut())
            .zip(anglev_out.iter_mut())
        {
            let (angleh, anglev) = self.process_sample(sample);
            *h = angleh as f32;
            *v = anglev as f32;
            produced += 1;
        }
        produced
    }

    fn emit(&mut self, sample_index: u64) {
        self.status.reports_emitted += 1;
        let (angleh, anglev) = self.latest;

        for (axis, degrees) in [(Axis::Real, angleh), (Axis::Imag, anglev)] {
            let report = QeReport {
                axis,
                degrees,
                sample_index,
            };
            match self.sink.publish(&report) {
                Ok(()) => log::debug!("{} = {degrees:.4}° at sample {sample_index}", axis.topic()),
                Err(e) => {
                    self.status.reports_dropped += 1;
                    if self.status.reports_dropped == 1 {
                        log::warn!("Dropping {} report: {e}", axis.topic());
                    } else {
                        log::debug!("Dropping {} report: {e}", axis.topic());
                    }
                }
            }
        }
    }

    /// Latest (angleh, anglev) in degrees
    pub fn latest_degrees(&self) -> (f64, f64) {
        self.latest
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn core(&self) -> &QeCore {
        &self.core
    }

    /// Samples counted since the last report
    pub fn pending(&self) -> u64 {
        self.schedule.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProbeError;
    use num_complex::Complex32;
    use std::sync::{Arc, Mutex};

    fn cross_config() -> ProbeConfig {
        ProbeConfig::new(
            vec![
                Complex32::new(1.0, 0.0),
                Complex32::new(-1.0, 0.0),
                Complex32::new(0.0, 1.0),
                Complex32::new(0.0, -1.0),
            ],
            0.1,
        )
    }

    fn recording_probe(config: &ProbeConfig) -> (QeProbe, Arc<Mutex<Vec<QeReport>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink_log = Arc::clone(&log);
        let sink = move |r: &QeReport| -> ProbeResult<()> {
            sink_log.lock().unwrap().push(*r);
            Ok(())
        };
        (QeProbe::new(config, Box::new(sink)).unwrap(), log)
    }

    #[test]
    fn reports_pair_every_period_plus_one_samples() {
        let (mut probe, log) = recording_probe(&cross_config().period(4));
        for _ in 0..15 {
            probe.process_sample(Complex32::new(1.0, 0.0));
        }
        let reports = log.lock().unwrap();
        let indices: Vec<u64> = reports.iter().map(|r| r.sample_index).collect();
        assert_eq!(indices, vec![4, 4, 9, 9, 14, 14]);
        assert_eq!(reports[0].axis, Axis::Real);
        assert_eq!(reports[1].axis, Axis::Imag);
        assert_eq!(probe.status().reports_emitted, 3);
        assert_eq!(probe.pending(), 0);
    }

    #[test]
    fn report_matches_triggering_sample_outputs() {
        let (mut probe, log) = recording_probe(&cross_config().period(2));
        let input = [
            Complex32::new(1.1, 0.05),
            Complex32::new(1.0, 0.0),
            Complex32::new(0.98, -0.02),
        ];
        let mut h = [0.0f32; 3];
        let mut v = [0.0f32; 3];
        assert_eq!(probe.work(&input, &mut h, &mut v), 3);

        let reports = log.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].degrees as f32, h[2]);
        assert_eq!(reports[1].degrees as f32, v[2]);
    }

    #[test]
    fn work_stops_at_shortest_buffer() {
        let (mut probe, _) = recording_probe(&cross_config());
        let input = [Complex32::new(1.0, 0.0); 8];
        let mut h = [0.0f32; 5];
        let mut v = [0.0f32; 8];
        assert_eq!(probe.work(&input, &mut h, &mut v), 5);
        assert_eq!(probe.status().samples_processed, 5);
    }

    #[test]
    fn non_finite_samples_hold_previous_angles() {
        let (mut probe, _) = recording_probe(&cross_config());
        let first = probe.process_sample(Complex32::new(1.0, 0.1));
        let held = probe.process_sample(Complex32::new(f32::NAN, 0.0));
        let held_inf = probe.process_sample(Complex32::new(1.0, f32::INFINITY));
        assert_eq!(first, held);
        assert_eq!(first, held_inf);
        assert_eq!(probe.status().rejected_samples, 2);
        assert_eq!(probe.status().samples_processed, 3);
        assert_eq!(probe.pending(), 3);
    }

    #[test]
    fn degenerate_power_counts_and_latest_tracks_outputs() {
        let (mut probe, _) = recording_probe(&ProbeConfig::new(vec![Complex32::new(0.0, 0.0)], 0.1));
        let input = [
            Complex32::new(0.3, -0.2),
            Complex32::new(1.0, 1.0),
            Complex32::new(-0.5, 0.0),
        ];
        let mut h = [1.0f32; 3];
        let mut v = [1.0f32; 3];
        assert_eq!(probe.work(&input, &mut h, &mut v), 3);
        assert_eq!(h, [0.0; 3]);
        assert_eq!(v, [0.0; 3]);
        assert_eq!(probe.status().degenerate_samples, 3);
        assert_eq!(probe.latest_degrees(), (0.0, 0.0));

        let last = probe.process_sample(Complex32::new(0.1, 0.1));
        assert_eq!(probe.latest_degrees(), last);
        assert_eq!(probe.status().degenerate_samples, 4);

        let held = probe.process_sample(Complex32::new(f32::NAN, 0.0));
        assert_eq!(probe.latest_degrees(), held);
        assert_eq!(held, last);
        assert_eq!(probe.status().degenerate_samples, 4);
        assert_eq!(probe.status().rejected_samples, 1);
    }

    #[test]
    fn failing_sink_drops_reports_and_keeps_running() {
        let sink = |_: &QeReport| -> ProbeResult<()> {
            Err(ProbeError::Transport("unavailable".to_string()))
        };
        let mut probe = QeProbe::new(&cross_config().period(1), Box::new(sink)).unwrap();
        for _ in 0..6 {
            probe.process_sample(Complex32::new(-1.0, 0.0));
        }
        let status = probe.status();
        assert_eq!(status.samples_processed, 6);
        assert_eq!(status.reports_emitted, 3);
        assert_eq!(status.reports_dropped, 6);
    }

    #[test]
    fn rejects_invalid_configuration() {
        for config in [
            ProbeConfig::new(Vec::new(), 0.1),
            cross_config().period(0),
            ProbeConfig::new(cross_config().symbol_table, 0.0),
            ProbeConfig::new(cross_config().symbol_table, 1.5),
        ] {
            let sink = |_: &QeReport| -> ProbeResult<()> { Ok(()) };
            assert!(matches!(
                QeProbe::new(&config, Box::new(sink)),
                Err(ProbeError::InvalidParameter(_))
            ));
        }
    }
}
