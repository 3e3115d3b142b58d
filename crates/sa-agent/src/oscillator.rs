//! Per-agent phase oscillator.
//!
//! Two phasors advance at the same frequency.  The cycle phasor wraps at 1
//! and raises a climax; the beat phasor wraps every `cycles / beats` and
//! raises a beat.  Every `cycles` climaxes the beat phasor is re-aligned to
//! the cycle so the two never drift apart.

use sa_core::AgentRng;

/// Beats per group of cycles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subdivision {
    pub cycles: u32,
    pub beats:  u32,
}

impl Subdivision {
    /// Choices drawn at spawn.
    pub const ALL: [Subdivision; 4] = [
        Subdivision { cycles: 1, beats: 1 },
        Subdivision { cycles: 1, beats: 2 },
        Subdivision { cycles: 1, beats: 4 },
        Subdivision { cycles: 1, beats: 8 },
    ];

    /// Beat phasor wrap point, in cycle units.
    #[inline]
    pub fn beat_period(self) -> f32 {
        self.cycles as f32 / self.beats.max(1) as f32
    }
}

impl Default for Subdivision {
    fn default() -> Self {
        Self::ALL[0]
    }
}

/// What happened during one [`PhaseOscillator::advance`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OscillatorTick {
    /// The cycle phasor wrapped.
    pub climax: bool,
    /// Beats to play this tick (0, 1 or 2).
    pub beats: u8,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseOscillator {
    /// Hz.
    pub frequency:     f32,
    /// `[0, 1)`.
    pub cycle_phasor:  f32,
    /// `[0, beat_period)`.
    pub beat_phasor:   f32,
    pub subdivision:   Subdivision,
    /// Climaxes since the last re-alignment, modulo `subdivision.cycles`.
    pub cycle_counter: u32,
}

impl PhaseOscillator {
    pub fn new(frequency: f32, subdivision: Subdivision, phase: f32) -> Self {
        let mut osc = Self {
            frequency,
            cycle_phasor: 0.0,
            beat_phasor: 0.0,
            subdivision,
            cycle_counter: 0,
        };
        osc.sync(phase);
        osc
    }

    /// Random subdivision and random initial phase in `[0, 1)`.
    pub fn random(frequency: f32, rng: &mut AgentRng) -> Self {
        let subdivision = rng
            .choose(&Subdivision::ALL)
            .copied()
            .unwrap_or_default();
        let phase: f32 = rng.random();
        Self::new(frequency, subdivision, phase)
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.cycle_phasor
    }

    /// Jump to `phase`, keeping the beat phasor consistent with it.
    pub fn sync(&mut self, phase: f32) {
        self.cycle_phasor = phase.rem_euclid(1.0);
        self.beat_phasor = self.cycle_phasor % self.subdivision.beat_period();
    }

    pub fn advance(&mut self, dt: f32) -> OscillatorTick {
        let step = self.frequency * dt;
        let mut tick = OscillatorTick::default();

        self.cycle_phasor += step;
        self.beat_phasor += step;

        if self.cycle_phasor >= 1.0 {
            self.cycle_phasor = 0.0;
            tick.climax = true;
            self.cycle_counter = (self.cycle_counter + 1) % self.subdivision.cycles.max(1);
            if self.cycle_counter == 0 {
                self.beat_phasor = 0.0;
                tick.beats += 1;
            }
        }

        if self.beat_phasor >= self.subdivision.beat_period() {
            self.beat_phasor = 0.0;
            tick.beats += 1;
        }

        tick
    }
}
