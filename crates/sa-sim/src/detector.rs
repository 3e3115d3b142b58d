//! Proximity detector: finds agent pairs close enough to start a join.
//!
//! A pair `(i, j)` with `i < j` qualifies when
//!
//! - `i` is inside the boundary, in `WanderingAndDetecting` or `Joined`, and
//!   has a free slot;
//! - the centres are within `i`'s detection radius (twice its joint radius);
//! - `j` has a free slot;
//! - `i` and `j` are in different structures.
//!
//! Each scanned agent takes only its first qualifying partner, targeting that
//! partner's lowest free slot.

use sa_agent::Swarm;
use sa_core::{AgentId, SaResult};
use tracing::trace;

/// Pairwise proximity scan.  Holds the round-robin cursor for real-time mode.
#[derive(Debug, Default)]
pub struct ProximityDetector {
    cursor: usize,
}

impl ProximityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next agent [`scan_next`](Self::scan_next) will visit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Scan every agent once, in ascending id order.  Returns the number of
    /// joins started.
    pub fn scan_all(&mut self, swarm: &mut Swarm) -> SaResult<usize> {
        let mut started = 0;
        for i in 0..swarm.len() {
            started += self.scan_agent(swarm, AgentId(i as u32))? as usize;
        }
        Ok(started)
    }

    /// Scan a single agent and advance the cursor.
    pub fn scan_next(&mut self, swarm: &mut Swarm) -> SaResult<usize> {
        let n = swarm.len();
        if n == 0 {
            return Ok(0);
        }
        let agent = AgentId((self.cursor % n) as u32);
        self.cursor = (self.cursor + 1) % n;
        Ok(self.scan_agent(swarm, agent)? as usize)
    }

    /// Look for `agent`'s first qualifying partner with a higher id.  `true`
    /// if a join was started.
    pub fn scan_agent(&mut self, swarm: &mut Swarm, agent: AgentId) -> SaResult<bool> {
        let store = &swarm.store;
        let i = agent.index();
        if store.boundary_detected(agent)
            || !store.state[i].can_initiate_join()
            || store.free_slot(agent).is_none()
        {
            return Ok(false);
        }

        let radius = store.params[i].detection_radius();
        for j in (i + 1)..swarm.len() {
            let other = AgentId(j as u32);
            if swarm.store.distance(agent, other) > radius {
                continue;
            }
            let Some(slot) = swarm.store.free_slot(other) else {
                continue;
            };
            if swarm.connected(agent, other) {
                continue;
            }

            trace!(%agent, %other, slot, "close available agent");
            swarm.on_detect_close_available_agent(agent, other, slot)?;
            return Ok(true);
        }
        Ok(false)
    }
}
