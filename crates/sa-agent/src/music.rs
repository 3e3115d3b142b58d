//! Joint notes, beat scheduling and structure harmony.

use sa_core::{AgentId, AgentRng, SaResult};
use sa_harmony::{Chord, ChordMetric, MIDI_C4, Scale, VoiceEnvelope, find_chord};

use crate::{Beat, Swarm, SwarmEvent};

/// Octave spread of spawned notes, either side of C4.
const OCTAVE_SPREAD: i32 = 2;

/// One note per slot: a degree of a random scale from the spawn pool,
/// cycled if there are more slots than degrees, shifted by a random octave.
pub fn spawn_notes(rng: &mut AgentRng, slots: usize) -> Box<[i32]> {
    let scale = rng.choose(&Scale::SPAWN_POOL).copied().unwrap_or(Scale::Major);
    let intervals = scale.intervals();
    (0..slots)
        .map(|i| {
            let octave: i32 = rng.gen_range(-OCTAVE_SPREAD..=OCTAVE_SPREAD);
            intervals[i % intervals.len()] + 12 * octave
        })
        .collect()
}

impl Swarm {
    /// Advance every oscillator by `dt`, then play the beats that fell due in
    /// ascending id order.
    pub fn advance_oscillators(&mut self, dt: f32) {
        #[cfg(not(feature = "parallel"))]
        let ticks: Vec<_> = self
            .store
            .oscillator
            .iter_mut()
            .map(|osc| osc.advance(dt))
            .collect();

        #[cfg(feature = "parallel")]
        let ticks: Vec<_> = {
            use rayon::prelude::*;
            self.store
                .oscillator
                .par_iter_mut()
                .map(|osc| osc.advance(dt))
                .collect()
        };

        for (i, tick) in ticks.into_iter().enumerate() {
            let agent = AgentId(i as u32);
            if tick.climax {
                self.events.push(SwarmEvent::PhasorClimax { time: self.time, agent });
            }
            for _ in 0..tick.beats {
                let beat = self.next_beat(agent);
                self.events.push(SwarmEvent::Beat { time: self.time, agent, beat });
            }
        }
    }

    /// Play the next occupied slot in round-robin order, or report that the
    /// agent is alone.
    pub fn next_beat(&mut self, agent: AgentId) -> Beat {
        let i = agent.index();
        if self.store.is_alone(agent) {
            return Beat::Alone;
        }

        let slots = &self.store.slots[i];
        let k = slots.len();
        let mut slot = self.store.next_beat_slot[i] % k;
        while slots[slot].is_none() {
            slot = (slot + 1) % k;
        }
        self.store.next_beat_slot[i] = (slot + 1) % k;

        Beat::Note {
            slot,
            neighbor: slots[slot].unwrap_or(AgentId::INVALID),
            pitch: self.store.notes[i][slot] + MIDI_C4,
            envelope: VoiceEnvelope::for_structure(self.store.structure_size[i], self.audio_gain),
        }
    }

    /// Chord that best matches the joint notes of every member of `agent`'s
    /// structure.
    pub fn structure_chord(&mut self, agent: AgentId, metric: ChordMetric) -> SaResult<Chord> {
        self.check_agent(agent)?;
        let mut notes = Vec::new();
        for &m in self.walker.component(&self.store.slots, agent) {
            notes.extend_from_slice(&self.store.notes[m.index()]);
        }
        Ok(find_chord(&notes, metric))
    }

    /// Hook run after every join.  Notes are kept as spawned.
    pub(crate) fn reassign_notes(&mut self, _agent: AgentId) {}
}
