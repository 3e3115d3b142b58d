//! Structure-graph invariant checker.
//!
//! Every tick must leave the graph:
//!
//! - symmetric: a neighbor named in a slot names the agent back in exactly
//!   one of its own slots, and no agent names itself;
//! - rooted: each structure has exactly one member without a follow link;
//! - acyclic in its follow links, each of which names an actual neighbor;
//! - consistent in its cached sizes.
//!
//! [`Swarm::audit`] walks the whole arena, so it is meant for tests and
//! debugging rather than the tick loop.

use std::fmt;

use sa_core::AgentId;

use crate::{StructureWalker, Swarm};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphViolation {
    SelfLink { agent: AgentId },
    UnknownNeighbor { agent: AgentId, neighbor: AgentId },
    Asymmetric { agent: AgentId, neighbor: AgentId, back_links: usize },
    RootCount { structure: AgentId, roots: usize },
    BadFollow { agent: AgentId },
    FollowCycle { agent: AgentId },
    SizeMismatch { agent: AgentId, cached: u32, actual: u32 },
}

impl fmt::Display for GraphViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLink { agent } => write!(f, "{agent} occupies its own slot"),
            Self::UnknownNeighbor { agent, neighbor } => {
                write!(f, "{agent} names unknown neighbor {neighbor}")
            }
            Self::Asymmetric { agent, neighbor, back_links } => write!(
                f,
                "{agent} names {neighbor}, which names it back {back_links} times"
            ),
            Self::RootCount { structure, roots } => {
                write!(f, "structure of {structure} has {roots} roots")
            }
            Self::BadFollow { agent } => write!(f, "{agent} follows a non-neighbor"),
            Self::FollowCycle { agent } => write!(f, "follow links from {agent} never reach a root"),
            Self::SizeMismatch { agent, cached, actual } => {
                write!(f, "{agent} caches size {cached}, structure has {actual}")
            }
        }
    }
}

impl Swarm {
    /// Every invariant violation in the current graph; empty when healthy.
    pub fn audit(&self) -> Vec<GraphViolation> {
        let store = &self.store;
        let mut violations = Vec::new();

        for agent in store.agent_ids() {
            for (_, neighbor) in store.neighbors(agent) {
                if neighbor == agent {
                    violations.push(GraphViolation::SelfLink { agent });
                } else if !store.contains(neighbor) {
                    violations.push(GraphViolation::UnknownNeighbor { agent, neighbor });
                } else {
                    let back_links = store.slots[neighbor.index()]
                        .iter()
                        .filter(|&&n| n == Some(agent))
                        .count();
                    if back_links != 1 {
                        violations.push(GraphViolation::Asymmetric { agent, neighbor, back_links });
                    }
                }
            }

            if let Some(f) = store.follow[agent.index()] {
                let linked = store.contains(f.target)
                    && store.slots[agent.index()].get(f.local_slot) == Some(&Some(f.target))
                    && store.slots[f.target.index()].get(f.target_slot) == Some(&Some(agent));
                if !linked {
                    violations.push(GraphViolation::BadFollow { agent });
                }
            }
        }
        if !violations.is_empty() {
            return violations;
        }

        let mut walker = StructureWalker::new();
        let mut covered = vec![false; store.count];
        for agent in store.agent_ids() {
            if covered[agent.index()] {
                continue;
            }
            let members = walker.component(&store.slots, agent);
            let actual = members.len() as u32;
            let mut roots = 0;
            for &m in members {
                covered[m.index()] = true;
                if store.follow[m.index()].is_none() {
                    roots += 1;
                }
                let cached = store.structure_size[m.index()];
                if cached != actual {
                    violations.push(GraphViolation::SizeMismatch { agent: m, cached, actual });
                }
            }
            if roots != 1 {
                violations.push(GraphViolation::RootCount { structure: agent, roots });
            }
        }

        for agent in store.agent_ids() {
            let mut current = agent;
            let mut hops = 0;
            while let Some(f) = store.follow[current.index()] {
                current = f.target;
                hops += 1;
                if hops > store.count {
                    violations.push(GraphViolation::FollowCycle { agent });
                    break;
                }
            }
        }

        violations
    }
}
