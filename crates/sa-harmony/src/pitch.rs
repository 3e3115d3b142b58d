//! Pitch classes, note names, and scale tables.
//!
//! Notes are plain `i32` semitone offsets.  Agents store them relative to
//! C4 (MIDI 60) so that octave shifts are signed: `-12` is C3, `14` is D5.

/// MIDI number of the reference note (middle C).
pub const MIDI_C4: i32 = 60;

/// Reduce a note to its pitch class in `0..12`, negative notes included.
///
/// `pitch_class(-1) == 11`, `pitch_class(13) == 1`.
#[inline]
pub fn pitch_class(note: i32) -> i32 {
    note.rem_euclid(12)
}

/// Sharp-spelled name of a note's pitch class.
pub fn note_name(note: i32) -> &'static str {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    NAMES[pitch_class(note) as usize]
}

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
#[inline]
pub fn midi_to_frequency(midi_note: i32) -> f32 {
    440.0 * 2f32.powf((midi_note as f32 - 69.0) / 12.0)
}

// ── Scale tables ──────────────────────────────────────────────────────────────

/// Interval sets, rooted at 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scale {
    Chromatic,
    Major,
    NaturalMinor,
    MajorBlues,
    MinorBlues,
    MajorPentatonic,
}

impl Scale {
    /// The scales agents draw their joint notes from at spawn.
    pub const SPAWN_POOL: [Scale; 3] = [Scale::Major, Scale::MajorBlues, Scale::MajorPentatonic];

    pub fn intervals(self) -> &'static [i32] {
        match self {
            Scale::Chromatic       => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::Major           => &[0, 2, 4, 5, 7, 9, 11],
            Scale::NaturalMinor    => &[0, 2, 3, 5, 7, 8, 10],
            Scale::MajorBlues      => &[0, 2, 4, 5, 6, 9],
            Scale::MinorBlues      => &[0, 3, 5, 6, 7, 10],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
        }
    }
}

/// Seven-note major scale starting at `root` (unreduced).
pub fn major_scale(root: i32) -> [i32; 7] {
    rooted(root, Scale::Major)
}

/// Seven-note natural minor scale starting at `root` (unreduced).
pub fn natural_minor_scale(root: i32) -> [i32; 7] {
    rooted(root, Scale::NaturalMinor)
}

fn rooted(root: i32, scale: Scale) -> [i32; 7] {
    let mut out = [0; 7];
    for (slot, interval) in out.iter_mut().zip(scale.intervals()) {
        *slot = root + interval;
    }
    out
}
