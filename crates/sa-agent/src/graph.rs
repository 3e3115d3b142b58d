//! Structure graph operations: join, detach, re-rooting, size propagation
//! and snapshots.

use std::fmt;

use rustc_hash::FxHashMap;
use sa_core::{AgentId, SaResult};
use tracing::debug;

use crate::store::Follow;
use crate::swarm::transition;
use crate::{AgentState, JoinOutcome, StructureWalker, Swarm, SwarmEvent};

// ── StructureSnapshot ─────────────────────────────────────────────────────────

/// Copy of one structure: its members and their slot arrays.
///
/// Empty slots are `AgentId::INVALID`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructureSnapshot {
    /// Root first, then traversal order.
    pub members: Vec<AgentId>,
    pub slots:   FxHashMap<AgentId, Box<[AgentId]>>,
}

impl StructureSnapshot {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.slots.contains_key(&agent)
    }
}

/// `[3(5-x-x-x-x-x)5(x-3-x-x-x-x)]`
impl fmt::Display for StructureSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for member in &self.members {
            write!(f, "{}(", member.0)?;
            let slots = self.slots.get(member).map(|s| &s[..]).unwrap_or_default();
            for (i, n) in slots.iter().enumerate() {
                if i > 0 {
                    f.write_str("-")?;
                }
                if n.is_valid() {
                    write!(f, "{}", n.0)?;
                } else {
                    f.write_str("x")?;
                }
            }
            f.write_str(")")?;
        }
        f.write_str("]")
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

impl Swarm {
    /// `true` if `a` and `b` belong to the same structure.
    pub fn connected(&mut self, a: AgentId, b: AgentId) -> bool {
        self.walker.reaches(&self.store.slots, a, b)
    }

    /// Every member of `agent`'s structure, `agent` first.
    pub fn structure(&mut self, agent: AgentId) -> SaResult<Vec<AgentId>> {
        self.check_agent(agent)?;
        Ok(self.walker.component(&self.store.slots, agent).to_vec())
    }

    /// Snapshot of `agent`'s structure, listed from its root.
    pub fn snapshot(&self, agent: AgentId) -> SaResult<StructureSnapshot> {
        self.check_agent(agent)?;
        let mut walker = StructureWalker::new();
        Ok(self.snapshot_with(&mut walker, self.root_of(agent)))
    }

    /// Snapshots of every structure, ordered by lowest member id.
    pub fn all_structures(&self) -> Vec<StructureSnapshot> {
        let mut walker = StructureWalker::new();
        let mut covered = vec![false; self.store.count];
        let mut out = Vec::new();
        for agent in self.store.agent_ids() {
            if covered[agent.index()] {
                continue;
            }
            let snapshot = self.snapshot_with(&mut walker, self.root_of(agent));
            for m in &snapshot.members {
                covered[m.index()] = true;
            }
            out.push(snapshot);
        }
        out
    }

    /// Follow links from `agent` to its structure's root.  Stops after
    /// `count` hops so a corrupted graph cannot loop forever.
    pub fn root_of(&self, agent: AgentId) -> AgentId {
        let mut current = agent;
        for _ in 0..self.store.count {
            match self.store.follow[current.index()] {
                Some(f) => current = f.target,
                None => break,
            }
        }
        current
    }

    fn snapshot_with(&self, walker: &mut StructureWalker, root: AgentId) -> StructureSnapshot {
        let members = walker.component(&self.store.slots, root).to_vec();
        let slots = members
            .iter()
            .map(|&m| {
                let row = self.store.slots[m.index()]
                    .iter()
                    .map(|n| n.unwrap_or(AgentId::INVALID))
                    .collect();
                (m, row)
            })
            .collect();
        StructureSnapshot { members, slots }
    }
}

// ── Mutations ─────────────────────────────────────────────────────────────────

impl Swarm {
    /// Make `root` the root of its structure: clear its follow link and point
    /// every other member at its neighbor on the path to `root`.
    pub fn fix_followers(&mut self, root: AgentId) {
        self.walker.component(&self.store.slots, root);
        self.store.follow[root.index()] = None;
        for edge in self.walker.tree_edges() {
            let Some(local_slot) = self.store.slot_of(edge.child, edge.parent) else {
                debug_assert!(false, "asymmetric edge {} -> {}", edge.parent, edge.child);
                continue;
            };
            self.store.follow[edge.child.index()] = Some(Follow {
                target:      edge.parent,
                target_slot: edge.parent_slot,
                local_slot,
            });
        }
    }

    /// Set every member of `agent`'s structure to `state`.
    pub fn set_structure_state(&mut self, agent: AgentId, state: AgentState) {
        for &m in self.walker.component(&self.store.slots, agent) {
            transition(&mut self.store.state, &mut self.events, m, state);
        }
    }

    /// Write `size` into every member's cached structure size.
    pub fn propagate_structure_size(&mut self, agent: AgentId, size: u32) {
        self.walker
            .propagate(&self.store.slots, &mut self.store.structure_size, agent, size);
    }

    /// Count `agent`'s structure and store the count on every member.
    pub fn recount_structure(&mut self, agent: AgentId) -> u32 {
        let members = self.walker.component(&self.store.slots, agent);
        let size = members.len() as u32;
        for &m in members {
            self.store.structure_size[m.index()] = size;
        }
        size
    }

    /// Re-synchronise every member's oscillator to `phase`.
    pub(crate) fn sync_structure_phase(&mut self, agent: AgentId, phase: f32) {
        for &m in self.walker.component(&self.store.slots, agent) {
            self.store.oscillator[m.index()].sync(phase);
        }
    }

    /// Checked form of the join that ends an approach.
    pub fn join_to(
        &mut self,
        initiator:   AgentId,
        target:      AgentId,
        target_slot: usize,
    ) -> SaResult<JoinOutcome> {
        self.check_agent(initiator)?;
        self.check_slot(target, target_slot)?;
        Ok(self.join(initiator, target, target_slot))
    }

    /// Connect `initiator`'s first free slot to `target_slot` on `target`.
    ///
    /// On success the merged structure is rooted at `target`, every member is
    /// `Joined` except `target` which wanders and carries the structure, and
    /// the initiator's whole former structure takes on `target`'s phase.
    pub(crate) fn join(&mut self, initiator: AgentId, target: AgentId, target_slot: usize) -> JoinOutcome {
        let Some(local_slot) = self.store.free_slot(initiator) else {
            return self.abort_join(initiator);
        };
        if !self.store.is_slot_free(target, target_slot) || self.connected(initiator, target) {
            return self.abort_join(initiator);
        }

        let phase = self.store.oscillator[target.index()].phase();
        self.sync_structure_phase(initiator, phase);

        self.store.slots[initiator.index()][local_slot] = Some(target);
        self.store.slots[target.index()][target_slot] = Some(initiator);

        self.fix_followers(target);
        self.set_structure_state(target, AgentState::Joined);
        self.transition(target, AgentState::Wandering);

        let i = initiator.index();
        self.store.timers[i].join = 0.0;
        self.store.timers[i].detach_ready = false;
        self.store.join_target[i] = None;
        self.store.join_target[target.index()] = None;

        let size = self.store.structure_size[i] + self.store.structure_size[target.index()];
        self.propagate_structure_size(initiator, size);
        self.reassign_notes(initiator);

        debug!(%initiator, %target, target_slot, size, "joined");
        self.events.push(SwarmEvent::Joined {
            time: self.time,
            agent: initiator,
            target,
            structure_size: size,
        });
        JoinOutcome::Joined
    }

    /// Give up a pending join: the structure goes back to `Joined` with
    /// `agent` as its wandering root.
    pub(crate) fn abort_join(&mut self, agent: AgentId) -> JoinOutcome {
        self.fix_followers(agent);
        self.set_structure_state(agent, AgentState::Joined);
        self.transition(agent, AgentState::Wandering);
        self.store.join_target[agent.index()] = None;

        debug!(%agent, "join aborted");
        self.events.push(SwarmEvent::JoinAborted { time: self.time, agent });
        JoinOutcome::Aborted
    }

    /// Checked form of [`detach`](Self::detach).
    pub fn try_detach(&mut self, agent: AgentId) -> SaResult<()> {
        self.check_agent(agent)?;
        self.detach(agent);
        Ok(())
    }

    /// Remove `agent` from its structure.
    ///
    /// Each neighbor's fragment is recounted.  A neighbor left alone goes
    /// back to `Wandering`; a fragment that lost its root is re-rooted at the
    /// neighbor, which wanders while the rest of the fragment is `Joined`.
    pub fn detach(&mut self, agent: AgentId) {
        let a = agent.index();
        let former: Vec<(usize, AgentId)> = self.store.neighbors(agent).collect();

        for &(slot, neighbor) in &former {
            self.store.slots[a][slot] = None;
            if let Some(back) = self.store.slot_of(neighbor, agent) {
                self.store.slots[neighbor.index()][back] = None;
            }
        }

        for &(_, neighbor) in &former {
            let n = neighbor.index();
            if self.store.is_alone(neighbor) {
                self.store.follow[n] = None;
                self.store.structure_size[n] = 1;
                self.transition(neighbor, AgentState::Wandering);
                continue;
            }

            self.recount_structure(neighbor);
            let has_root = self
                .walker
                .component(&self.store.slots, neighbor)
                .iter()
                .any(|m| self.store.follow[m.index()].is_none());
            if !has_root {
                self.fix_followers(neighbor);
                self.set_structure_state(neighbor, AgentState::Joined);
                self.transition(neighbor, AgentState::Wandering);
            }
        }

        self.store.follow[a] = None;
        self.store.structure_size[a] = 1;
        self.store.timers[a].reset();
        if self.store.state[a].is_following() {
            self.transition(agent, AgentState::Wandering);
        }

        debug!(%agent, fragments = former.len(), "detached");
        self.events.push(SwarmEvent::Detached { time: self.time, agent });
    }
}
