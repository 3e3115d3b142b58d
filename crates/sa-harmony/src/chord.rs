//! Chord value type and triad constructors.

use std::fmt;

use crate::pitch::{note_name, pitch_class};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordQuality {
    Major,
    Minor,
}

impl ChordQuality {
    /// Search order used by the chord finders: majors before minors.
    pub const ALL: [ChordQuality; 2] = [ChordQuality::Major, ChordQuality::Minor];

    /// Major ↔ minor.
    #[inline]
    pub fn other(self) -> ChordQuality {
        match self {
            ChordQuality::Major => ChordQuality::Minor,
            ChordQuality::Minor => ChordQuality::Major,
        }
    }
}

/// A triad chord: root pitch class (`0..12`) and quality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    pub root:    u8,
    pub quality: ChordQuality,
}

impl Chord {
    /// Build a chord; `root` is reduced to its pitch class.
    pub fn new(root: i32, quality: ChordQuality) -> Self {
        Self { root: pitch_class(root) as u8, quality }
    }

    /// The three chord tones, unreduced (`root + 7` may exceed 11).
    pub fn triad(self) -> [i32; 3] {
        let root = self.root as i32;
        match self.quality {
            ChordQuality::Major => major_triad(root),
            ChordQuality::Minor => minor_triad(root),
        }
    }

    /// The three chord tones reduced to pitch classes.
    pub fn pitch_classes(self) -> [i32; 3] {
        self.triad().map(pitch_class)
    }
}

impl Default for Chord {
    /// C major.
    fn default() -> Self {
        Chord { root: 0, quality: ChordQuality::Major }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", note_name(self.root as i32), self.quality)
    }
}

#[inline]
pub fn major_triad(root: i32) -> [i32; 3] {
    [root, root + 4, root + 7]
}

#[inline]
pub fn minor_triad(root: i32) -> [i32; 3] {
    [root, root + 3, root + 7]
}

#[inline]
pub fn diminished_triad(root: i32) -> [i32; 3] {
    [root, root + 3, root + 6]
}

#[inline]
pub fn augmented_triad(root: i32) -> [i32; 3] {
    [root, root + 4, root + 8]
}
