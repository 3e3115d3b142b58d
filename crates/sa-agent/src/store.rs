//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! RNGs live outside the store so an agent's random draws (boundary bounce
//! headings) can be taken while the store is mutably borrowed for the same
//! agent's position, and so the oscillator phase can iterate the store's
//! arrays in parallel without touching RNG state.

use sa_core::{AgentId, AgentRng, Vec3};

use crate::{AgentState, Orientation, PhaseOscillator};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, parallel to [`AgentStore`].
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    pub(crate) fn new() -> Self {
        Self { inner: Vec::new() }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── Per-agent records ─────────────────────────────────────────────────────────

/// Immutable physical and timing parameters fixed at spawn.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentParams {
    /// Signed; a negative speed reverses the heading while wandering.
    pub speed:               f32,
    /// Diameter.  Slots sit at `scale / 2` from the centre.
    pub scale:               f32,
    pub joint_radius:        f32,
    pub boundary_radius:     f32,
    /// Seconds after a join before voluntary detach is allowed.
    pub max_join_time:       f32,
    /// Boundary-free seconds before `Wandering → WanderingAndDetecting`.
    pub only_wandering_time: f32,
}

impl AgentParams {
    /// Centre-to-centre distance at which a proximity scan fires.
    #[inline]
    pub fn detection_radius(&self) -> f32 {
        2.0 * self.joint_radius
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentTimers {
    /// Seconds spent wandering without touching the boundary.
    pub only_wandering: f32,
    /// Seconds since the agent's last join.
    pub join:           f32,
    /// Set once `join` reaches `max_join_time`; cleared on join and detach.
    pub detach_ready:   bool,
}

impl AgentTimers {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Follow link: this agent's position is derived from `target`.
///
/// `target_slot` is the slot on `target` that holds this agent and
/// `local_slot` is the slot on this agent that holds `target`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Follow {
    pub target:      AgentId,
    pub target_slot: usize,
    pub local_slot:  usize,
}

/// Destination of an agent in `ToJoin`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinTarget {
    pub agent: AgentId,
    pub slot:  usize,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Kinematics ────────────────────────────────────────────────────────
    pub position:    Vec<Vec3>,
    /// Unit heading.
    pub direction:   Vec<Vec3>,
    pub orientation: Vec<Orientation>,
    pub params:      Vec<AgentParams>,

    // ── Behaviour ─────────────────────────────────────────────────────────
    pub state:       Vec<AgentState>,
    pub timers:      Vec<AgentTimers>,
    /// `Some` only while the agent is in `ToJoin`.
    pub join_target: Vec<Option<JoinTarget>>,

    // ── Structure graph ───────────────────────────────────────────────────
    /// K slots per agent; `Some(n)` names the neighbor in that slot.
    pub slots:          Vec<Box<[Option<AgentId>]>>,
    /// `None` exactly for the root of each structure.
    pub follow:         Vec<Option<Follow>>,
    /// Cached member count of the agent's structure.
    pub structure_size: Vec<u32>,

    // ── Music ─────────────────────────────────────────────────────────────
    /// One note per slot, in semitones relative to C4.
    pub notes:          Vec<Box<[i32]>>,
    pub oscillator:     Vec<PhaseOscillator>,
    /// Round-robin pointer for the next beat.
    pub next_beat_slot: Vec<usize>,
}

impl AgentStore {
    pub(crate) fn new() -> Self {
        Self {
            count:          0,
            position:       Vec::new(),
            direction:      Vec::new(),
            orientation:    Vec::new(),
            params:         Vec::new(),
            state:          Vec::new(),
            timers:         Vec::new(),
            join_target:    Vec::new(),
            slots:          Vec::new(),
            follow:         Vec::new(),
            structure_size: Vec::new(),
            notes:          Vec::new(),
            oscillator:     Vec::new(),
            next_beat_slot: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── Slot queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn slot_count(&self, agent: AgentId) -> usize {
        self.slots[agent.index()].len()
    }

    /// Lowest-index empty slot.
    pub fn free_slot(&self, agent: AgentId) -> Option<usize> {
        self.slots[agent.index()].iter().position(Option::is_none)
    }

    /// `false` for an out-of-range slot.
    #[inline]
    pub fn is_slot_free(&self, agent: AgentId, slot: usize) -> bool {
        matches!(self.slots[agent.index()].get(slot), Some(None))
    }

    /// No occupied slots.
    pub fn is_alone(&self, agent: AgentId) -> bool {
        self.slots[agent.index()].iter().all(Option::is_none)
    }

    /// Occupied `(slot, neighbor)` pairs in slot order.
    pub fn neighbors(&self, agent: AgentId) -> impl Iterator<Item = (usize, AgentId)> + '_ {
        self.slots[agent.index()]
            .iter()
            .enumerate()
            .filter_map(|(slot, n)| n.map(|n| (slot, n)))
    }

    /// Slot on `agent` that holds `neighbor`.
    pub fn slot_of(&self, agent: AgentId, neighbor: AgentId) -> Option<usize> {
        self.slots[agent.index()]
            .iter()
            .position(|&n| n == Some(neighbor))
    }

    /// World position of `slot` on `agent`.
    pub fn slot_position(&self, agent: AgentId, slot: usize) -> Vec3 {
        let i = agent.index();
        self.position[i] + self.orientation[i].slot_direction(slot) * (self.params[i].scale * 0.5)
    }

    // ── Kinematic queries ─────────────────────────────────────────────────

    /// Outside (or on) the arena boundary.
    #[inline]
    pub fn boundary_detected(&self, agent: AgentId) -> bool {
        let i = agent.index();
        self.position[i].length() >= self.params[i].boundary_radius
    }

    #[inline]
    pub fn distance(&self, a: AgentId, b: AgentId) -> f32 {
        self.position[a.index()].distance(self.position[b.index()])
    }

    #[inline]
    pub fn is_root(&self, agent: AgentId) -> bool {
        self.follow[agent.index()].is_none()
    }
}
