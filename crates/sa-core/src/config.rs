//! Top-level simulation configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the simulation builder.  Every field has a
//! default matching the reference scene, so partial config files work.

use crate::{SaError, SaResult, SimClock, Tick};

/// How the driver interleaves proximity detection with ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunMode {
    /// Headless: every agent pair is scanned every tick.
    #[default]
    Batch,
    /// Paced: one outer agent index is scanned per tick, cycling through the
    /// population.
    RealTime,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of agents spawned by the swarm builder.
    pub agent_count: usize,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Per-agent speed is drawn uniformly from `min_speed..=max_speed`.
    /// Negative speeds are allowed; they simply reverse the heading.
    pub min_speed: f32,
    pub max_speed: f32,

    /// Physical diameter of an agent.  Slots sit at `scale / 2` from the
    /// centre.
    pub agent_scale: f32,

    /// Slots per agent.
    pub max_joints: usize,

    /// Joint radius = factor × scale.  Two agents are close enough to start a
    /// join when their centres are within twice the joint radius.
    pub join_radius_factor: f32,

    /// Radius of the spherical arena centred at the origin.
    pub boundary_radius: f32,

    /// Oscillator frequency in Hz.
    pub frequency: f32,

    /// Seconds after a join before an agent may voluntarily detach.
    pub max_join_time: f32,

    /// Seconds an agent must wander without touching the boundary before it
    /// starts detecting.
    pub only_wandering_time: f32,

    /// Fixed timestep in seconds.
    pub delta_time: f32,

    /// Ticks to run in batch mode.
    pub total_ticks: u64,

    pub mode: RunMode,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Base gain for note playback; divided by √(structure size).
    pub audio_gain: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent_count:             20,
            seed:                    42,
            min_speed:               1.0,
            max_speed:               1.0,
            agent_scale:             0.1,
            max_joints:              6,
            join_radius_factor:      1.0,
            boundary_radius:         1.0,
            frequency:               1.0,
            max_join_time:           1.0,
            only_wandering_time:     1.0,
            delta_time:              0.01,
            total_ticks:             1_000,
            mode:                    RunMode::Batch,
            snapshot_interval_ticks: 0,
            audio_gain:              0.2,
        }
    }
}

impl SimConfig {
    /// Check that every parameter is in its meaningful range.
    pub fn validate(&self) -> SaResult<()> {
        fn positive(name: &str, v: f32) -> SaResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SaError::Config(format!("{name} must be positive, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f32) -> SaResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(SaError::Config(format!("{name} must be non-negative, got {v}")))
            }
        }

        positive("agent_scale", self.agent_scale)?;
        positive("boundary_radius", self.boundary_radius)?;
        positive("delta_time", self.delta_time)?;
        positive("frequency", self.frequency)?;
        positive("join_radius_factor", self.join_radius_factor)?;
        non_negative("max_join_time", self.max_join_time)?;
        non_negative("only_wandering_time", self.only_wandering_time)?;
        non_negative("audio_gain", self.audio_gain)?;

        if !(self.min_speed.is_finite() && self.max_speed.is_finite()) {
            return Err(SaError::Config("speed range must be finite".into()));
        }
        if self.max_speed < self.min_speed {
            return Err(SaError::Config(format!(
                "max_speed {} is below min_speed {}",
                self.max_speed, self.min_speed
            )));
        }
        if self.max_joints == 0 {
            return Err(SaError::Config("max_joints must be at least 1".into()));
        }
        Ok(())
    }

    /// Joint radius handed to each spawned agent.
    #[inline]
    pub fn joint_radius(&self) -> f32 {
        self.join_radius_factor * self.agent_scale
    }

    /// The tick at which a batch run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.delta_time)
    }
}
