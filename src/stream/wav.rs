//! WAV decoding with `hound`.

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::error::PitchResult;
use crate::float::{from_f64, Float};

/// Decoded mono audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal<T> {
    pub samples: Vec<T>,
    pub sample_rate: usize,
}

impl<T> Signal<T> {
    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read the first channel of a WAV file, scaled to `[-1, 1)`.
pub fn read_wav<T: Float, P: AsRef<Path>>(path: P) -> PitchResult<Signal<T>> {
    read_wav_from(WavReader::open(path)?)
}

/// Like [read_wav], for an already opened reader.
pub fn read_wav_from<T: Float, R: Read>(reader: WavReader<R>) -> PitchResult<Signal<T>> {
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<T> = match spec.sample_format {
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f64;
            reader
                .into_samples::<i32>()
                .step_by(channels)
                .map(|sample| sample.map(|s| from_f64(s as f64 / scale)))
                .collect::<Result<_, _>>()?
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .step_by(channels)
            .map(|sample| sample.map(|s| from_f64(s as f64)))
            .collect::<Result<_, _>>()?,
    };

    debug!(
        "decoded {} samples at {} Hz ({} channels, {} bits)",
        samples.len(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );

    Ok(Signal {
        samples,
        sample_rate: spec.sample_rate as usize,
    })
}
