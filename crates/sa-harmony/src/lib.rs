//! `sa-harmony`: the music theory the swarm uses to reason about the notes
//! its structures play.
//!
//! Everything here is pure and allocation-free: functions take slices and
//! return small fixed-size arrays by value, so the chord search can run on
//! any thread without shared scratch buffers.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`pitch`]   | `pitch_class`, note names, scale tables, MIDI → Hz            |
//! | [`chord`]   | `Chord`, `ChordQuality`, triad constructors                   |
//! | [`circle`]  | Circle of fifths, `circle_adjacent_sections`                  |
//! | [`search`]  | Distance/affinity scoring, closest and most-affine chord      |
//! | [`voice`]   | `VoiceEnvelope`: playback shaping by structure size          |

pub mod chord;
pub mod circle;
pub mod pitch;
pub mod search;
pub mod voice;


pub use chord::{Chord, ChordQuality};
pub use circle::{CIRCLE_OF_FIFTHS, CircleSection, circle_adjacent_sections};
pub use pitch::{MIDI_C4, Scale, midi_to_frequency, note_name, pitch_class};
pub use search::{ChordMetric, find_chord, find_closest_chord, find_most_affine_chord};
pub use voice::VoiceEnvelope;
