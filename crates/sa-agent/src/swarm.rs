//! The `Swarm`: agent arena plus everything needed to mutate it.

use sa_core::{AgentId, AgentRng, SaError, SaResult, Vec3};
use tracing::trace;

use crate::builder::AgentSpawn;
use crate::music::spawn_notes;
use crate::store::{AgentParams, AgentTimers};
use crate::{AgentRngs, AgentState, AgentStore, Orientation, PhaseOscillator, StructureWalker, SwarmEvent};

/// Arena of agents and the structure graph over them.
///
/// All graph mutations go through `&mut Swarm`, so a join or detach is never
/// observed half-done.  Events are buffered in the swarm until the driver
/// drains them with [`take_events`](Swarm::take_events).
pub struct Swarm {
    pub store: AgentStore,
    pub rngs:  AgentRngs,

    /// Simulated seconds; stamped onto emitted events.  The driver sets it
    /// at the start of every tick.
    pub time: f64,

    /// Base gain for beat envelopes.
    pub audio_gain: f32,

    seed:                 u64,
    pub(crate) walker:    StructureWalker,
    pub(crate) events:    Vec<SwarmEvent>,
}

impl Swarm {
    pub fn new(seed: u64) -> Self {
        Self {
            store:      AgentStore::new(),
            rngs:       AgentRngs::new(),
            time:       0.0,
            audio_gain: 0.2,
            seed,
            walker:     StructureWalker::new(),
            events:     Vec::new(),
        }
    }

    pub fn with_audio_gain(mut self, gain: f32) -> Self {
        self.audio_gain = gain;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Add an agent: wandering, alone, root of its own one-agent structure.
    pub fn spawn(&mut self, spawn: AgentSpawn) -> SaResult<AgentId> {
        spawn.validate()?;
        let id = AgentId::try_from(self.store.count)
            .map_err(|_| SaError::Config("agent arena is full".into()))?;

        let mut rng = AgentRng::new(self.seed, id);
        let direction = match spawn.direction.normalized() {
            d if d == Vec3::ZERO => rng.on_unit_sphere(),
            d => d,
        };
        let notes = spawn_notes(&mut rng, spawn.max_joints);
        let oscillator = PhaseOscillator::random(spawn.frequency, &mut rng);

        let store = &mut self.store;
        store.position.push(spawn.position);
        store.direction.push(direction);
        store.orientation.push(Orientation::IDENTITY);
        store.params.push(AgentParams {
            speed:               spawn.speed,
            scale:               spawn.scale,
            joint_radius:        spawn.joint_radius,
            boundary_radius:     spawn.boundary_radius,
            max_join_time:       spawn.max_join_time,
            only_wandering_time: spawn.only_wandering_time,
        });
        store.state.push(AgentState::Wandering);
        store.timers.push(AgentTimers::default());
        store.join_target.push(None);
        store.slots.push(vec![None; spawn.max_joints].into_boxed_slice());
        store.follow.push(None);
        store.structure_size.push(1);
        store.notes.push(notes);
        store.oscillator.push(oscillator);
        store.next_beat_slot.push(0);
        store.count += 1;
        self.rngs.inner.push(rng);

        trace!(agent = %id, position = %spawn.position, "spawned agent");
        Ok(id)
    }

    // ── Checked accessors ─────────────────────────────────────────────────

    pub fn check_agent(&self, agent: AgentId) -> SaResult<()> {
        if self.store.contains(agent) {
            Ok(())
        } else {
            Err(SaError::AgentNotFound(agent))
        }
    }

    pub fn check_slot(&self, agent: AgentId, slot: usize) -> SaResult<()> {
        self.check_agent(agent)?;
        let joints = self.store.slot_count(agent);
        if slot < joints {
            Ok(())
        } else {
            Err(SaError::SlotOutOfRange { agent, slot, joints })
        }
    }

    #[inline]
    pub fn state(&self, agent: AgentId) -> AgentState {
        self.store.state[agent.index()]
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Vec3 {
        self.store.position[agent.index()]
    }

    #[inline]
    pub fn structure_size(&self, agent: AgentId) -> u32 {
        self.store.structure_size[agent.index()]
    }

    // ── Event buffer ──────────────────────────────────────────────────────

    pub fn events(&self) -> &[SwarmEvent] {
        &self.events
    }

    /// Move the buffered events out.  Hand the vector back with
    /// [`recycle_events`](Self::recycle_events) to reuse its capacity.
    pub fn take_events(&mut self) -> Vec<SwarmEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn recycle_events(&mut self, mut buffer: Vec<SwarmEvent>) {
        if self.events.is_empty() {
            buffer.clear();
            self.events = buffer;
        }
    }

    /// Set `agent`'s state, recording a `StateChanged` event.
    pub(crate) fn transition(&mut self, agent: AgentId, to: AgentState) {
        transition(&mut self.store.state, &mut self.events, agent, to);
    }
}

/// Field-level form of [`Swarm::transition`] for use while the walker is
/// borrowed.
pub(crate) fn transition(
    states: &mut [AgentState],
    events: &mut Vec<SwarmEvent>,
    agent:  AgentId,
    to:     AgentState,
) {
    let from = std::mem::replace(&mut states[agent.index()], to);
    if from != to {
        events.push(SwarmEvent::StateChanged { agent, from, to });
    }
}
