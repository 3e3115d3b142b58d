//! Deterministic chord search.
//!
//! Both finders enumerate qualities in [`ChordQuality::ALL`] order and, for
//! each, roots in circle-of-fifths order.  Only a strictly better score
//! replaces the current best, so ties resolve to the first candidate
//! enumerated.  With no notes at all, the first candidate (C major) wins.

use crate::chord::{Chord, ChordQuality};
use crate::circle::CIRCLE_OF_FIFTHS;
use crate::pitch::pitch_class;

/// Scoring rule for [`find_chord`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordMetric {
    /// Minimise summed semitone distance to the nearest chord tone.
    Distance,
    /// Maximise the number of notes that are chord tones.
    #[default]
    Affinity,
}

/// Shorter way round the pitch-class circle between a note and the closest
/// tone of `triad`, in semitones (`0..=6`).
pub fn note_distance(note: i32, triad: &[i32; 3]) -> u32 {
    let pc = pitch_class(note);
    triad
        .iter()
        .map(|&tone| {
            let d = (pc - pitch_class(tone)).unsigned_abs();
            d.min(12 - d)
        })
        .min()
        .unwrap_or(0)
}

/// Sum of [`note_distance`] over `notes`.
pub fn chord_distance(notes: &[i32], triad: &[i32; 3]) -> u32 {
    notes.iter().map(|&n| note_distance(n, triad)).sum()
}

/// Number of `notes` whose pitch class is one of the triad's pitch classes.
pub fn chord_affinity(notes: &[i32], triad: &[i32; 3]) -> u32 {
    let pcs = triad.map(pitch_class);
    notes
        .iter()
        .filter(|&&n| pcs.contains(&pitch_class(n)))
        .count() as u32
}

fn candidates() -> impl Iterator<Item = Chord> {
    ChordQuality::ALL.into_iter().flat_map(|quality| {
        CIRCLE_OF_FIFTHS
            .into_iter()
            .map(move |root| Chord::new(root as i32, quality))
    })
}

/// The chord whose triad is closest to `notes` in summed distance.
pub fn find_closest_chord(notes: &[i32]) -> Chord {
    let mut best = Chord::default();
    let mut lowest = u32::MAX;
    for chord in candidates() {
        let distance = chord_distance(notes, &chord.triad());
        if distance < lowest {
            lowest = distance;
            best = chord;
        }
    }
    best
}

/// The chord whose triad contains the most of `notes`.
pub fn find_most_affine_chord(notes: &[i32]) -> Chord {
    let mut best = Chord::default();
    let mut highest: Option<u32> = None;
    for chord in candidates() {
        let affinity = chord_affinity(notes, &chord.triad());
        if highest.is_none_or(|h| affinity > h) {
            highest = Some(affinity);
            best = chord;
        }
    }
    best
}

/// Dispatch on `metric`.
pub fn find_chord(notes: &[i32], metric: ChordMetric) -> Chord {
    match metric {
        ChordMetric::Distance => find_closest_chord(notes),
        ChordMetric::Affinity => find_most_affine_chord(notes),
    }
}
