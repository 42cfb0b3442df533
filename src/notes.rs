//! Musical note names for detected frequencies.

use std::fmt;

/// Concert pitch of A4.
pub const A4_FREQUENCY: f64 = 440.0;

/// Outside this range a frequency has no note label.
pub const NOTE_RANGE: (f64, f64) = (50.0, 2000.0);

pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// The equal-tempered note nearest to a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub name: &'static str,
    pub octave: i32,
    /// Offset from the note, truncated towards zero. Always within ±50.
    pub cents: i32,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Nearest note to `frequency` given the tuning reference `a4`.
pub fn freq_to_note(frequency: f64, a4: f64) -> Note {
    let midi = 69.0 + 12.0 * (frequency / a4).log2();
    let nearest = midi.round();
    let cents = ((midi - nearest) * 100.0) as i32;
    let nearest = nearest as i32;

    Note {
        name: NOTE_NAMES[nearest.rem_euclid(12) as usize],
        octave: nearest.div_euclid(12) - 1,
        cents,
    }
}

/// Label such as `A4` or `A4 +5c`; `---` for missing or out-of-range frequencies.
pub fn format_note(frequency: Option<f64>, show_cents: bool) -> String {
    let frequency = match frequency {
        Some(f) if f >= NOTE_RANGE.0 && f <= NOTE_RANGE.1 => f,
        _ => return "---".to_string(),
    };

    let note = freq_to_note(frequency, A4_FREQUENCY);
    if show_cents && note.cents != 0 {
        format!("{} {:+}c", note, note.cents)
    } else {
        note.to_string()
    }
}
