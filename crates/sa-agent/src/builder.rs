//! Agent spawn parameters and the fluent `SwarmBuilder`.
//!
//! # Usage
//!
//! ```rust
//! use sa_agent::SwarmBuilder;
//! use sa_core::SimConfig;
//!
//! let config = SimConfig { agent_count: 50, ..SimConfig::default() };
//! let swarm = SwarmBuilder::from_config(&config).build().unwrap();
//! assert_eq!(swarm.len(), 50);
//! ```

use sa_core::{SaError, SaResult, SimConfig, SimRng, Vec3};

use crate::Swarm;

/// Scatter radius as a fraction of the boundary radius.
const SPAWN_FILL: f32 = 0.9;

// ── AgentSpawn ────────────────────────────────────────────────────────────────

/// Everything needed to create one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSpawn {
    pub position:            Vec3,
    /// Normalised at spawn; a zero vector draws a random heading.
    pub direction:           Vec3,
    pub speed:               f32,
    pub max_joints:          usize,
    pub joint_radius:        f32,
    pub boundary_radius:     f32,
    pub scale:               f32,
    pub frequency:           f32,
    pub max_join_time:       f32,
    pub only_wandering_time: f32,
}

impl AgentSpawn {
    /// Spawn with default scale (0.1), frequency (1 Hz) and dwell times (1 s).
    pub fn new(
        position:        Vec3,
        direction:       Vec3,
        speed:           f32,
        max_joints:      usize,
        joint_radius:    f32,
        boundary_radius: f32,
    ) -> Self {
        Self {
            position,
            direction,
            speed,
            max_joints,
            joint_radius,
            boundary_radius,
            scale:               0.1,
            frequency:           1.0,
            max_join_time:       1.0,
            only_wandering_time: 1.0,
        }
    }

    /// Spawn parameters shared by every agent of `config`, at the origin.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            position:            Vec3::ZERO,
            direction:           Vec3::ZERO,
            speed:               config.min_speed,
            max_joints:          config.max_joints,
            joint_radius:        config.joint_radius(),
            boundary_radius:     config.boundary_radius,
            scale:               config.agent_scale,
            frequency:           config.frequency,
            max_join_time:       config.max_join_time,
            only_wandering_time: config.only_wandering_time,
        }
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn dwell(mut self, only_wandering_time: f32, max_join_time: f32) -> Self {
        self.only_wandering_time = only_wandering_time;
        self.max_join_time = max_join_time;
        self
    }

    pub fn validate(&self) -> SaResult<()> {
        if self.max_joints == 0 {
            return Err(SaError::Config("max_joints must be at least 1".into()));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SaError::Config(format!("scale must be positive, got {}", self.scale)));
        }
        if !(self.boundary_radius.is_finite() && self.boundary_radius > 0.0) {
            return Err(SaError::Config(format!(
                "boundary_radius must be positive, got {}",
                self.boundary_radius
            )));
        }
        if self.joint_radius < 0.0 || self.frequency < 0.0 {
            return Err(SaError::Config("joint_radius and frequency must not be negative".into()));
        }
        if !(self.speed.is_finite() && self.position.length().is_finite()) {
            return Err(SaError::Config("position and speed must be finite".into()));
        }
        Ok(())
    }
}

// ── SwarmBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for a [`Swarm`].
///
/// Explicit spawns added with [`agent`](Self::agent) come first; then, when
/// built [`from_config`](Self::from_config), `config.agent_count` random
/// agents are scattered inside 90% of the boundary with random headings and
/// speeds drawn from `min_speed..=max_speed`.
pub struct SwarmBuilder {
    seed:       u64,
    audio_gain: f32,
    spawns:     Vec<AgentSpawn>,
    random:     Option<SimConfig>,
}

impl SwarmBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            audio_gain: 0.2,
            spawns:     Vec::new(),
            random:     None,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            seed:       config.seed,
            audio_gain: config.audio_gain,
            spawns:     Vec::new(),
            random:     Some(config.clone()),
        }
    }

    pub fn audio_gain(mut self, gain: f32) -> Self {
        self.audio_gain = gain;
        self
    }

    pub fn agent(mut self, spawn: AgentSpawn) -> Self {
        self.spawns.push(spawn);
        self
    }

    pub fn agents(mut self, spawns: impl IntoIterator<Item = AgentSpawn>) -> Self {
        self.spawns.extend(spawns);
        self
    }

    pub fn build(self) -> SaResult<Swarm> {
        let mut swarm = Swarm::new(self.seed).with_audio_gain(self.audio_gain);
        for spawn in self.spawns {
            swarm.spawn(spawn)?;
        }

        if let Some(config) = self.random {
            config.validate()?;
            let mut rng = SimRng::new(config.seed);
            let template = AgentSpawn::from_config(&config);
            let radius = config.boundary_radius * SPAWN_FILL;
            for _ in 0..config.agent_count {
                let spawn = AgentSpawn {
                    position:  rng.inside_unit_sphere() * radius,
                    direction: rng.on_unit_sphere(),
                    speed:     rng.gen_range(config.min_speed..=config.max_speed),
                    ..template
                };
                swarm.spawn(spawn)?;
            }
        }

        Ok(swarm)
    }
}
