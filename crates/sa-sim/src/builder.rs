//! Fluent builder for constructing a [`Sim`].

use sa_agent::{Swarm, SwarmBuilder};
use sa_core::SimConfig;

use crate::{ProximityDetector, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: timestep, tick count, run mode, …
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                                         |
/// |---------------|-------------------------------------------------|
/// | `.swarm(s)`   | `SwarmBuilder::from_config(&config)`            |
///
/// A supplied swarm must hold exactly `config.agent_count` agents.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    swarm:  Option<Swarm>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, swarm: None }
    }

    /// Supply a pre-populated swarm instead of a random one.
    pub fn swarm(mut self, swarm: Swarm) -> Self {
        self.swarm = Some(swarm);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let swarm = match self.swarm {
            Some(s) => {
                if s.len() != self.config.agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: self.config.agent_count,
                        got:      s.len(),
                        what:     "swarm",
                    });
                }
                s
            }
            None => SwarmBuilder::from_config(&self.config).build()?,
        };

        Ok(Sim {
            clock:    self.config.make_clock(),
            config:   self.config,
            swarm,
            detector: ProximityDetector::new(),
        })
    }
}
