//! Where pipeline readings go once a frame has been analysed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::detector::Algorithm;
use crate::error::PitchResult;
use crate::float::{to_f64, Float};
use crate::notes::format_note;
use crate::pipeline::{Analysis, Reading};

/// One row of the reading log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Seconds from the start of the stream.
    pub timestamp: f64,
    pub frequency_hz: Option<f64>,
    /// Note label for valid readings, otherwise the reading's tag.
    pub note: String,
    pub rms: f64,
    pub algorithm: Algorithm,
}

impl LogRecord {
    pub fn new<T: Float>(
        timestamp: f64,
        analysis: &Analysis<T>,
        algorithm: Algorithm,
        show_cents: bool,
    ) -> Self {
        let frequency_hz = analysis.reading.frequency().map(to_f64);
        let note = match analysis.reading {
            Reading::Valid(_) => format_note(frequency_hz, show_cents),
            other => other.label().to_string(),
        };

        LogRecord {
            timestamp,
            frequency_hz,
            note,
            rms: to_f64(analysis.rms),
            algorithm,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.frequency_hz.is_some() && self.note != "out_of_range"
    }
}

/// Consumer of log records.
pub trait ReadingSink {
    fn record(&mut self, record: &LogRecord) -> PitchResult<()>;

    fn flush(&mut self) -> PitchResult<()> {
        Ok(())
    }
}

impl ReadingSink for Vec<LogRecord> {
    fn record(&mut self, record: &LogRecord) -> PitchResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as CSV with a `timestamp,frequency_hz,note,rms,algorithm` header.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        CsvSink {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> PitchResult<W> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}

impl CsvSink<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> PitchResult<Self> {
        Ok(CsvSink::new(File::create(path)?))
    }
}

impl<W: Write> ReadingSink for CsvSink<W> {
    fn record(&mut self, record: &LogRecord) -> PitchResult<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn flush(&mut self) -> PitchResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
