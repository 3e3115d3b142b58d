//! Playback shaping for joint notes.
//!
//! Small structures play short, plucked notes at full gain.  Between 5 and 20
//! members the attack and release stretch linearly (up to 100× and 10×) and
//! the gain falls with √size, so a large structure swells into a pad instead
//! of clipping the mix.

use crate::pitch::midi_to_frequency;

const SMALL_STRUCTURE: f32 = 5.0;
const LARGE_STRUCTURE: f32 = 20.0;

const BASE_ATTACK: f32 = 0.01;
const BASE_RELEASE: f32 = 0.2;

/// Envelope parameters handed to the synthesis backend with each note.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoiceEnvelope {
    /// Seconds.
    pub attack:  f32,
    /// Seconds.
    pub release: f32,
    pub gain:    f32,
}

impl VoiceEnvelope {
    pub fn for_structure(structure_size: u32, base_gain: f32) -> Self {
        let size = structure_size.max(1) as f32;
        let t = inverse_lerp(SMALL_STRUCTURE, LARGE_STRUCTURE, size);
        Self {
            attack:  BASE_ATTACK * (1.0 + 99.0 * t),
            release: BASE_RELEASE * (1.0 + 9.0 * t),
            gain:    base_gain / size.sqrt(),
        }
    }
}

/// Where `v` lies between `a` and `b`, clamped to `[0, 1]`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((v - a) / (b - a)).clamp(0.0, 1.0)
}

/// Frequency for a note stored relative to C4.
#[inline]
pub fn note_frequency(relative_note: i32) -> f32 {
    midi_to_frequency(relative_note + crate::MIDI_C4)
}
