//! Frame delivery. A producer thread slices a signal into frames and pushes
//! them through a bounded channel; [run_stream] pulls them through a
//! [Pipeline] one at a time and hands every reading to a sink.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver};
use log::{debug, info, warn};

use crate::error::{PitchError, PitchResult};
use crate::float::Float;
use crate::pipeline::{Pipeline, Reading};
use crate::sink::{LogRecord, ReadingSink};

pub mod wav;

/// A window of samples and where it starts in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<T> {
    pub samples: Vec<T>,
    pub sample_rate: usize,
    /// Index of the first sample.
    pub offset: usize,
}

impl<T> Frame<T> {
    /// Start of the frame in seconds.
    pub fn timestamp(&self) -> f64 {
        self.offset as f64 / self.sample_rate as f64
    }
}

/// Full frames of `frame_size` samples starting every `hop` samples. A tail
/// shorter than a frame is dropped.
pub fn frames<T: Float>(
    signal: &[T],
    sample_rate: usize,
    frame_size: usize,
    hop: usize,
) -> impl Iterator<Item = Frame<T>> + '_ {
    let count = if frame_size == 0 || hop == 0 || signal.len() < frame_size {
        0
    } else {
        (signal.len() - frame_size) / hop + 1
    };

    (0..count).map(move |i| {
        let offset = i * hop;
        Frame {
            samples: signal[offset..offset + frame_size].to_vec(),
            sample_rate,
            offset,
        }
    })
}

/// Spawn a thread feeding frames of `signal` into a channel holding at most
/// `capacity` frames. The channel closes once the signal is exhausted or the
/// receiver is dropped.
pub fn spawn_frame_reader<T: Float>(
    signal: Vec<T>,
    sample_rate: usize,
    frame_size: usize,
    hop: usize,
    capacity: usize,
) -> PitchResult<(Receiver<Frame<T>>, JoinHandle<()>)> {
    if sample_rate == 0 {
        return Err(PitchError::InvalidSampleRate(sample_rate));
    }
    if frame_size == 0 {
        return Err(PitchError::InvalidFrameSize(frame_size));
    }
    if hop == 0 {
        return Err(PitchError::InvalidHop(hop));
    }
    if capacity == 0 {
        return Err(PitchError::InvalidCapacity(capacity));
    }

    let (sender, receiver) = bounded(capacity);
    let handle = thread::Builder::new()
        .name("frame-reader".into())
        .spawn(move || {
            let mut sent = 0usize;
            for frame in frames(&signal, sample_rate, frame_size, hop) {
                if sender.send(frame).is_err() {
                    debug!("frame receiver dropped after {} frames", sent);
                    return;
                }
                sent += 1;
            }
            debug!("frame reader finished after {} frames", sent);
        })?;

    Ok((receiver, handle))
}

/// Per-tag reading counts of a finished stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub frames: usize,
    pub valid: usize,
    pub quiet: usize,
    pub stabilizing: usize,
    pub out_of_range: usize,
    pub no_pitch: usize,
}

impl StreamSummary {
    fn count<T>(&mut self, reading: &Reading<T>) {
        self.frames += 1;
        match reading {
            Reading::Valid(_) => self.valid += 1,
            Reading::Quiet => self.quiet += 1,
            Reading::Stabilizing => self.stabilizing += 1,
            Reading::OutOfRange(_) => self.out_of_range += 1,
            Reading::NoPitch => self.no_pitch += 1,
        }
    }
}

/// Drain `frames` through `pipeline` until the channel closes, recording every
/// reading in `sink`.
pub fn run_stream<T, S>(
    frames: &Receiver<Frame<T>>,
    pipeline: &mut Pipeline<T>,
    sink: &mut S,
    show_cents: bool,
) -> PitchResult<StreamSummary>
where
    T: Float,
    S: ReadingSink + ?Sized,
{
    let expected = pipeline.config().sample_rate;
    let algorithm = pipeline.algorithm();
    let mut summary = StreamSummary::default();

    info!(
        "{} stream started at {} Hz, {} samples per frame",
        algorithm,
        expected,
        pipeline.config().frame_size
    );

    for frame in frames.iter() {
        if frame.sample_rate != expected {
            return Err(PitchError::SampleRateMismatch {
                expected,
                actual: frame.sample_rate,
            });
        }

        let analysis = pipeline.process_frame(&frame.samples)?;
        summary.count(&analysis.reading);
        sink.record(&LogRecord::new(frame.timestamp(), &analysis, algorithm, show_cents))?;
    }
    sink.flush()?;

    info!(
        "stream finished: {} frames, {} valid, {} quiet, {} stabilizing, {} out of range, {} without pitch",
        summary.frames,
        summary.valid,
        summary.quiet,
        summary.stabilizing,
        summary.out_of_range,
        summary.no_pitch
    );
    if summary.frames > 0 && summary.valid == 0 {
        warn!("no valid pitch in {} frames", summary.frames);
    }

    Ok(summary)
}
