//! Per-tick agent behaviour and the proximity callback.

use sa_core::{AgentId, SaResult};
use tracing::trace;

use crate::store::JoinTarget;
use crate::{AgentState, Swarm};

/// Arrival distance as a fraction of the target's scale.
const ARRIVAL_FRACTION: f32 = 0.5;

impl Swarm {
    /// Advance every agent's state machine by `dt`, in ascending id order.
    pub fn update_movements(&mut self, dt: f32) {
        for i in 0..self.store.count {
            self.update_movement(AgentId(i as u32), dt);
        }
    }

    /// Advance one agent by `dt`.
    ///
    /// - `Wandering`: move; after `only_wandering_time` boundary-free
    ///   seconds start detecting.  A boundary hit restarts the dwell.
    /// - `WanderingAndDetecting`: move; a boundary hit drops back to
    ///   `Wandering`.
    /// - `ToJoin`: head for the target slot, join on arrival, give up if the
    ///   slot or the own free slot vanished or the boundary was hit.
    /// - `Joined`, `IndirectToJoin`: snap to the followed neighbor.
    ///
    /// Then the post-join timer runs until `max_join_time`, after which the
    /// agent may detach when it next starts a join.
    pub fn update_movement(&mut self, agent: AgentId, dt: f32) {
        let i = agent.index();
        match self.store.state[i] {
            AgentState::Wandering => {
                self.integrate(agent, dt);
                if self.bounce_if_outside(agent) {
                    self.store.timers[i].only_wandering = 0.0;
                }
                let dwell = self.store.params[i].only_wandering_time;
                let timers = &mut self.store.timers[i];
                if timers.only_wandering < dwell {
                    timers.only_wandering += dt;
                } else {
                    timers.only_wandering = 0.0;
                    self.transition(agent, AgentState::WanderingAndDetecting);
                }
            }
            AgentState::WanderingAndDetecting => {
                self.integrate(agent, dt);
                if self.bounce_if_outside(agent) {
                    self.store.timers[i].only_wandering = 0.0;
                    self.transition(agent, AgentState::Wandering);
                }
            }
            AgentState::ToJoin => self.approach(agent, dt),
            AgentState::Joined | AgentState::IndirectToJoin => self.follow_neighbor(agent),
        }

        let max_join_time = self.store.params[i].max_join_time;
        let timers = &mut self.store.timers[i];
        if !timers.detach_ready {
            if timers.join < max_join_time {
                timers.join += dt;
            } else {
                timers.detach_ready = true;
            }
        }
    }

    /// A proximity scan found `other` close to `agent` with `other_slot`
    /// free.  `agent` becomes the root of its structure and heads for the
    /// slot; the rest of its structure becomes `IndirectToJoin`.
    ///
    /// An agent whose post-join timer has run out first detaches, so it
    /// leaves its old structure alone.
    pub fn on_detect_close_available_agent(
        &mut self,
        agent:      AgentId,
        other:      AgentId,
        other_slot: usize,
    ) -> SaResult<()> {
        self.check_agent(agent)?;
        self.check_slot(other, other_slot)?;

        let i = agent.index();
        if self.store.timers[i].detach_ready && !self.store.is_alone(agent) {
            self.detach(agent);
        }

        self.set_structure_state(agent, AgentState::IndirectToJoin);
        self.transition(agent, AgentState::ToJoin);
        self.store.join_target[i] = Some(JoinTarget { agent: other, slot: other_slot });
        self.fix_followers(agent);

        trace!(%agent, %other, other_slot, "heading for slot");
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn integrate(&mut self, agent: AgentId, dt: f32) {
        let i = agent.index();
        let step = self.store.direction[i] * (self.store.params[i].speed * dt);
        self.store.position[i] += step;
    }

    /// On or past the boundary: draw a random heading, flipped so the
    /// resulting motion points inward.  Velocity is `direction * speed`, so
    /// a negative speed needs an outward-facing heading.  `true` if the
    /// boundary was hit.
    fn bounce_if_outside(&mut self, agent: AgentId) -> bool {
        if !self.store.boundary_detected(agent) {
            return false;
        }
        let i = agent.index();
        let outward = self.store.position[i].normalized();
        let sign = self.store.params[i].speed.signum();
        let mut heading = self.rngs.get_mut(agent).on_unit_sphere();
        if heading.dot(outward) * sign > 0.0 {
            heading = -heading;
        }
        self.store.direction[i] = heading;
        true
    }

    fn approach(&mut self, agent: AgentId, dt: f32) {
        let Some(JoinTarget { agent: target, slot }) = self.store.join_target[agent.index()] else {
            self.abort_join(agent);
            return;
        };

        let proceed = !self.bounce_if_outside(agent)
            && self.store.is_slot_free(target, slot)
            && self.store.free_slot(agent).is_some()
            && !self.connected(agent, target);
        if !proceed {
            self.abort_join(agent);
            return;
        }

        let i = agent.index();
        let goal = self.store.slot_position(target, slot);
        let heading = (goal - self.store.position[i]).normalized();
        self.store.position[i] += heading * (self.store.params[i].speed.abs() * dt);

        let t = target.index();
        if self.store.distance(agent, target) <= self.store.params[t].scale * ARRIVAL_FRACTION {
            self.join(agent, target, slot);
        }
    }

    /// Place `agent` against the slot of the neighbor it follows, facing it.
    fn follow_neighbor(&mut self, agent: AgentId) {
        let i = agent.index();
        let Some(follow) = self.store.follow[i] else {
            return;
        };
        let t = follow.target.index();

        let outward = self.store.orientation[t].slot_direction(follow.target_slot);
        let anchor = self.store.position[t] + outward * (self.store.params[t].scale * 0.5);

        let orientation = &mut self.store.orientation[i];
        orientation.face_slot(follow.local_slot, -outward);
        let offset = orientation.slot_direction(follow.local_slot) * (self.store.params[i].scale * 0.5);
        self.store.position[i] = anchor - offset;
    }
}
