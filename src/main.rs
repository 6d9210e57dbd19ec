//! `qeprobe` — measure quadrature error of a recorded I/Q capture
//!
//! Reads a raw interleaved `f32` I/Q file, runs the probe over it and prints
//! every periodic report as one JSON line on stdout. The per-sample angle
//! channels can be written to CSV.
//!
//!   RUST_LOG=info qeprobe --input capture.cfile --preset qpsk --alpha 0.05
//!   qeprobe --input capture.cfile --config probe.json --csv angles.csv
//!   RUST_LOG=info qeprobe --input capture.cfile --preset bpsk --log-reports

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use qeprobe_lib::adapters::{ChannelSink, CsvAngleWriter, IqFileSource, LogSink, NullOutput};
use qeprobe_lib::domain::{ProbeConfig, ProbeError, ProbeResult};
use qeprobe_lib::ports::ReportSink;
use qeprobe_lib::probe::QeProbe;
use qeprobe_lib::runner::{run_stream, RunnerConfig};

/// Capacity of the report channel between the probe and the stdout printer
const REPORT_QUEUE: usize = 1024;

/// Streaming I/Q quadrature-error probe
#[derive(Parser, Debug)]
#[command(name = "qeprobe")]
#[command(version)]
#[command(about = "Estimate I/Q quadrature error of a complex baseband capture", long_about = None)]
struct Cli {
    /// Raw interleaved little-endian f32 I/Q file (GNU Radio .cfile)
    #[arg(short, long)]
    input: PathBuf,

    /// JSON probe configuration (symbol table, alpha, period, power floor)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named constellation: bpsk, qpsk, psk8, qam16 (replaces the config's table)
    #[arg(long)]
    preset: Option<String>,

    /// EMA smoothing factor in (0, 1]
    #[arg(long)]
    alpha: Option<f64>,

    /// Samples between periodic reports
    #[arg(long)]
    period: Option<u64>,

    /// Write the per-sample angle channels to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Samples per processing batch
    #[arg(long, default_value_t = 4096)]
    batch: usize,

    /// Send reports to the log instead of printing JSON lines on stdout
    #[arg(long)]
    log_reports: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn build_config(cli: &Cli) -> ProbeResult<ProbeConfig> {
    let mut config = match &cli.config {
        Some(path) => ProbeConfig::load(path)?,
        None => ProbeConfig::default(),
    };
    if let Some(preset) = &cli.preset {
        config.preset = Some(preset.clone());
        config.symbol_table.clear();
    }
    if let Some(alpha) = cli.alpha {
        config.alpha = alpha;
    }
    if let Some(period) = cli.period {
        config.period = period;
    }
    Ok(config)
}

fn run(cli: Cli) -> ProbeResult<()> {
    let config = build_config(&cli)?;

    let (sink, printer): (Box<dyn ReportSink>, Option<JoinHandle<()>>) = if cli.log_reports {
        (Box::new(LogSink::new()), None)
    } else {
        let (sink, reports) = ChannelSink::bounded(REPORT_QUEUE);
        let printer = thread::spawn(move || {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for report in reports {
                let line = serde_json::json!({
                    "topic": report.axis.topic(),
                    "degrees": report.degrees,
                    "sample_index": report.sample_index,
                });
                if writeln!(out, "{line}").is_err() {
                    break;
                }
            }
        });
        (Box::new(sink), Some(printer))
    };

    let mut probe = QeProbe::new(&config, sink)?;
    let source = IqFileSource::open(&cli.input)?;
    let running = Arc::new(AtomicBool::new(true));
    let runner_config = RunnerConfig {
        batch_size: cli.batch,
        buffer_capacity: cli.batch.saturating_mul(16),
    };

    let summary = match &cli.csv {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| ProbeError::Io(format!("Failed to create '{}': {e}", path.display())))?;
            let mut writer = CsvAngleWriter::new(BufWriter::new(file))?;
            let summary = run_stream(source, &mut probe, &mut writer, running, &runner_config)?;
            writer.into_inner().flush()?;
            summary
        }
        None => run_stream(source, &mut probe, &mut NullOutput, running, &runner_config)?,
    };

    // Dropping the probe drops the sink, which ends the printer's loop
    drop(probe);
    if let Some(printer) = printer {
        printer
            .join()
            .map_err(|_| ProbeError::Io("Report printer thread panicked".to_string()))?;
    }

    let status = summary.status;
    log::info!(
        "{} samples, {} report pairs, {} dropped, {} rejected, {} below power floor",
        status.samples_processed,
        status.reports_emitted,
        status.reports_dropped,
        status.rejected_samples,
        status.degenerate_samples
    );
    Ok(())
}
