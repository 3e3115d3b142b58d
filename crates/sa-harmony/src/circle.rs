//! Circle of fifths and its neighbouring sections.
//!
//! A *section* is six chords: three same-quality roots that are adjacent on
//! the circle, followed by the three adjacent roots of the relative key in
//! the other quality.  The relative key sits three steps clockwise for a
//! major chord (C major → A minor) and three steps counter-clockwise for a
//! minor one.

use crate::chord::{Chord, ChordQuality};
use crate::pitch::pitch_class;

/// Pitch classes in ascending fifths, starting at C.
pub const CIRCLE_OF_FIFTHS: [u8; 12] = [0, 7, 2, 9, 4, 11, 6, 1, 8, 3, 10, 5];

/// Six chords around one position of the circle.
pub type CircleSection = [Chord; 6];

const LEN: usize = CIRCLE_OF_FIFTHS.len();

/// Position of a pitch class on the circle.
pub fn fifths_index(note: i32) -> usize {
    let pc = pitch_class(note) as u8;
    // Every pitch class appears exactly once.
    CIRCLE_OF_FIFTHS.iter().position(|&p| p == pc).unwrap_or(0)
}

#[inline]
fn step(index: usize, delta: isize) -> usize {
    (index as isize + delta).rem_euclid(LEN as isize) as usize
}

fn section(center: usize, relative: usize, quality: ChordQuality) -> CircleSection {
    let other = quality.other();
    let at = |i: usize, q: ChordQuality| Chord::new(CIRCLE_OF_FIFTHS[i] as i32, q);
    [
        at(step(center, -1), quality),
        at(center, quality),
        at(step(center, 1), quality),
        at(step(relative, -1), other),
        at(relative, other),
        at(step(relative, 1), other),
    ]
}

/// The central section around `chord`, then the sections one step
/// counter-clockwise and one step clockwise.
///
/// Element `[1]` of each section is its key chord.
pub fn circle_adjacent_sections(chord: Chord) -> [CircleSection; 3] {
    let index = fifths_index(chord.root as i32);
    let relative = match chord.quality {
        ChordQuality::Major => step(index, 3),
        ChordQuality::Minor => step(index, -3),
    };
    [
        section(index, relative, chord.quality),
        section(step(index, -1), step(relative, -1), chord.quality),
        section(step(index, 1), step(relative, 1), chord.quality),
    ]
}
