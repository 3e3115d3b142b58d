//! `StructureRecorder`: in-memory log of structure changes and climaxes.

use sa_agent::{StructureSnapshot, Swarm};
use sa_core::AgentId;

use crate::SwarmObserver;

/// Two event times closer than this are treated as the same instant.
const SAME_INSTANT: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructureEventKind {
    Join,
    Detach,
}

/// Every structure in the swarm right after a join or detach.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructureRecord {
    pub time:       f64,
    pub agent:      AgentId,
    pub kind:       StructureEventKind,
    pub structures: Vec<StructureSnapshot>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimaxRecord {
    pub agent: AgentId,
    pub time:  f64,
}

/// A [`SwarmObserver`] that keeps the structure history of a run.
///
/// When several joins or detaches happen at the same instant only the last
/// record survives, since it already contains the effect of the earlier ones.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructureRecorder {
    pub records:  Vec<StructureRecord>,
    pub climaxes: Vec<ClimaxRecord>,
    pub joins:    usize,
    pub detaches: usize,
}

impl StructureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent structure record.
    pub fn latest(&self) -> Option<&StructureRecord> {
        self.records.last()
    }

    fn record(&mut self, time: f64, agent: AgentId, kind: StructureEventKind, swarm: &Swarm) {
        let record = StructureRecord {
            time,
            agent,
            kind,
            structures: swarm.all_structures(),
        };
        match self.records.last_mut() {
            Some(last) if (last.time - time).abs() < SAME_INSTANT => *last = record,
            _ => self.records.push(record),
        }
    }
}

impl SwarmObserver for StructureRecorder {
    fn on_join(&mut self, time: f64, agent: AgentId, swarm: &Swarm) {
        self.joins += 1;
        self.record(time, agent, StructureEventKind::Join, swarm);
    }

    fn on_detach(&mut self, time: f64, agent: AgentId, swarm: &Swarm) {
        self.detaches += 1;
        self.record(time, agent, StructureEventKind::Detach, swarm);
    }

    fn on_phasor_climax(&mut self, agent: AgentId, time: f64) {
        self.climaxes.push(ClimaxRecord { agent, time });
    }
}
