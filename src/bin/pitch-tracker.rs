use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use pitch_tracker::config::PipelineConfig;
use pitch_tracker::sink::{CsvSink, LogRecord, ReadingSink};
use pitch_tracker::stream::wav::read_wav;
use pitch_tracker::stream::{run_stream, spawn_frame_reader};
use pitch_tracker::{Algorithm, Detector, Pipeline, PitchDetector, PitchResult};

#[derive(Parser, Debug)]
#[command(
    name = "pitch-tracker",
    about = "Monophonic pitch tracking with ZCR, autocorrelation, YIN and McLeod detectors"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Track the pitch of a WAV file
    File {
        path: PathBuf,
        /// JSON pipeline configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// zcr, acf, yin or mpm
        #[arg(long)]
        algo: Option<Algorithm>,
        /// Window length in samples
        #[arg(long)]
        frames: Option<usize>,
        /// Samples between window starts (defaults to half a window)
        #[arg(long)]
        hop: Option<usize>,
        /// Smoothing window size (0 to disable)
        #[arg(long)]
        smooth: Option<usize>,
        /// Amplitude gate threshold (RMS)
        #[arg(long)]
        gate: Option<f64>,
        #[arg(long)]
        yin_threshold: Option<f64>,
        #[arg(long)]
        mpm_threshold: Option<f64>,
        /// Log every reading to a CSV file
        #[arg(long)]
        log: Option<PathBuf>,
        /// Hide cents offset in note display
        #[arg(long)]
        no_cents: bool,
        /// Frames buffered between the reader and the pipeline
        #[arg(long, default_value_t = 16)]
        capacity: usize,
    },
    /// Measure every detector against pure sine tones
    Sweep {
        #[arg(long, default_value_t = 48000)]
        sr: usize,
        #[arg(long, default_value_t = 4800)]
        frames: usize,
        #[arg(long, default_value_t = 50)]
        min: usize,
        #[arg(long, default_value_t = 2000)]
        max: usize,
        #[arg(long, default_value_t = 50)]
        step: usize,
        /// Write per-frequency results to a CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    match Cli::parse().command {
        Commands::File {
            path,
            config,
            algo,
            frames,
            hop,
            smooth,
            gate,
            yin_threshold,
            mpm_threshold,
            log,
            no_cents,
            capacity,
        } => {
            let mut pipeline_config = match config {
                Some(config) => PipelineConfig::from_json_file(&config)
                    .with_context(|| format!("loading config {}", config.display()))?,
                None => PipelineConfig::default(),
            };
            if let Some(algorithm) = algo {
                pipeline_config.algorithm = algorithm;
            }
            if let Some(frames) = frames {
                pipeline_config.frame_size = frames;
            }
            if let Some(smooth) = smooth {
                pipeline_config.smoothing_window = smooth;
            }
            if let Some(gate) = gate {
                pipeline_config.gate.min_rms = gate;
            }
            if let Some(threshold) = yin_threshold {
                pipeline_config.thresholds.yin = threshold;
            }
            if let Some(threshold) = mpm_threshold {
                pipeline_config.thresholds.mpm = threshold;
            }
            run_file(&path, pipeline_config, hop, log, !no_cents, capacity)
        }
        Commands::Sweep {
            sr,
            frames,
            min,
            max,
            step,
            output,
        } => run_sweep(sr, frames, min, max, step, output),
    }
}

/// Prints valid readings and forwards everything to an optional CSV log.
struct Console {
    log: Option<CsvSink<File>>,
}

impl ReadingSink for Console {
    fn record(&mut self, record: &LogRecord) -> PitchResult<()> {
        match record.frequency_hz {
            Some(frequency) if record.is_valid() => {
                println!("{:6.2}s: {:7.2} Hz  {}", record.timestamp, frequency, record.note)
            }
            _ => {}
        }
        match self.log.as_mut() {
            Some(log) => log.record(record),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> PitchResult<()> {
        match self.log.as_mut() {
            Some(log) => log.flush(),
            None => Ok(()),
        }
    }
}

fn run_file(
    path: &Path,
    mut config: PipelineConfig,
    hop: Option<usize>,
    log: Option<PathBuf>,
    show_cents: bool,
    capacity: usize,
) -> Result<ExitCode> {
    let signal = read_wav::<f32, _>(path).with_context(|| format!("reading {}", path.display()))?;
    config.sample_rate = signal.sample_rate;
    let hop = hop.unwrap_or((config.frame_size / 2).max(1));

    info!(
        "{}: {:.2}s at {} Hz",
        path.display(),
        signal.duration(),
        signal.sample_rate
    );
    println!(
        "Algorithm: {}, Frame size: {} samples\n",
        config.algorithm.name().to_uppercase(),
        config.frame_size
    );

    let mut pipeline = Pipeline::new(config.clone()).context("building pipeline")?;
    let mut console = Console {
        log: match &log {
            Some(path) => Some(
                CsvSink::create(path).with_context(|| format!("creating {}", path.display()))?,
            ),
            None => None,
        },
    };

    let (frames, reader) = spawn_frame_reader(
        signal.samples,
        signal.sample_rate,
        config.frame_size,
        hop,
        capacity,
    )?;
    let summary = run_stream(&frames, &mut pipeline, &mut console, show_cents)?;
    drop(frames);
    if reader.join().is_err() {
        bail!("frame reader panicked");
    }

    if let Some(path) = log {
        println!("\nLog saved to: {}", path.display());
    }
    println!(
        "\n{} frames: {} valid, {} quiet, {} stabilizing, {} out of range, {} without pitch",
        summary.frames,
        summary.valid,
        summary.quiet,
        summary.stabilizing,
        summary.out_of_range,
        summary.no_pitch
    );

    Ok(ExitCode::from(0))
}

#[derive(Debug, Default)]
struct SweepStats {
    detected: usize,
    total: usize,
    error_sum: f64,
    max_error: f64,
}

fn run_sweep(
    sample_rate: usize,
    frame_size: usize,
    min: usize,
    max: usize,
    step: usize,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    if step == 0 || min > max {
        bail!("empty frequency range {}..={} step {}", min, max, step);
    }

    let base = PipelineConfig {
        sample_rate,
        frame_size,
        ..PipelineConfig::default()
    };
    let mut detectors = Vec::new();
    for algorithm in Algorithm::ALL {
        let config = PipelineConfig {
            algorithm,
            ..base.clone()
        };
        config.validate()?;
        detectors.push(Detector::<f64>::from_config(&config));
    }

    let mut writer = match &output {
        Some(path) => Some(
            csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => None,
    };
    if let Some(writer) = writer.as_mut() {
        let mut header = vec!["frequency_hz".to_string()];
        for algorithm in Algorithm::ALL {
            header.push(format!("{}_detected", algorithm));
            header.push(format!("{}_error", algorithm));
            header.push(format!("{}_error_pct", algorithm));
        }
        writer.write_record(&header)?;
    }

    println!("Frequency range: {}-{} Hz, step: {} Hz", min, max, step);

    let mut stats: Vec<SweepStats> = Algorithm::ALL.iter().map(|_| SweepStats::default()).collect();
    for frequency in (min..=max).step_by(step) {
        let frequency = frequency as f64;
        let signal: Vec<f64> = (0..frame_size)
            .map(|i| (2.0 * std::f64::consts::PI * frequency * i as f64 / sample_rate as f64).sin())
            .collect();

        let mut row = vec![format!("{}", frequency)];
        for (detector, stats) in detectors.iter().zip(stats.iter_mut()) {
            stats.total += 1;
            match detector.get_pitch(&signal, sample_rate) {
                Some(detected) => {
                    let error = (detected - frequency).abs();
                    stats.detected += 1;
                    stats.error_sum += error;
                    stats.max_error = stats.max_error.max(error);
                    row.push(format!("{:.2}", detected));
                    row.push(format!("{:.2}", error));
                    row.push(format!("{:.2}", error / frequency * 100.0));
                }
                None => row.extend(["None", "inf", "inf"].map(String::from)),
            }
        }
        if let Some(writer) = writer.as_mut() {
            writer.write_record(&row)?;
        }
    }

    if let Some(writer) = writer.as_mut() {
        writer.flush()?;
    }
    if let Some(path) = &output {
        println!("Results saved to {}", path.display());
    }

    println!("\nSummary:");
    println!("{}", "-".repeat(60));
    for (algorithm, stats) in Algorithm::ALL.iter().zip(&stats) {
        println!("\n{}:", algorithm.name().to_uppercase());
        println!(
            "  Detection rate: {:.1}%",
            stats.detected as f64 / stats.total as f64 * 100.0
        );
        if stats.detected > 0 {
            println!("  Average error: {:.2} Hz", stats.error_sum / stats.detected as f64);
            println!("  Max error: {:.2} Hz", stats.max_error);
        }
    }

    Ok(ExitCode::from(0))
}
