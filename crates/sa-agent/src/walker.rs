//! Iterative structure traversal.
//!
//! Structures can hold thousands of agents, so every walk uses an explicit
//! stack.  The visited set is an epoch-stamped `Vec<u32>`: starting a new walk
//! bumps the epoch instead of clearing the marks.

use sa_core::AgentId;

/// Edge of the spanning tree produced by [`StructureWalker::component`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeEdge {
    pub parent:      AgentId,
    /// Slot on `parent` holding `child`.
    pub parent_slot: usize,
    pub child:       AgentId,
}

/// Reusable traversal scratch space.
#[derive(Default)]
pub struct StructureWalker {
    stack: Vec<AgentId>,
    marks: Vec<u32>,
    epoch: u32,
    order: Vec<AgentId>,
    tree:  Vec<TreeEdge>,
}

impl StructureWalker {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self, count: usize) {
        if self.marks.len() < count {
            self.marks.resize(count, 0);
        }
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.marks.fill(0);
            self.epoch = 1;
        }
        self.stack.clear();
        self.order.clear();
        self.tree.clear();
    }

    /// Mark `agent`; `true` on first visit this epoch.
    #[inline]
    fn visit(&mut self, agent: AgentId) -> bool {
        let mark = &mut self.marks[agent.index()];
        if *mark == self.epoch {
            false
        } else {
            *mark = self.epoch;
            true
        }
    }

    /// All agents reachable from `root`, root first.  Also records the
    /// spanning tree rooted at `root`, see [`tree_edges`](Self::tree_edges).
    pub fn component(&mut self, slots: &[Box<[Option<AgentId>]>], root: AgentId) -> &[AgentId] {
        self.begin(slots.len());
        self.visit(root);
        self.stack.push(root);
        while let Some(current) = self.stack.pop() {
            self.order.push(current);
            for (slot, neighbor) in slots[current.index()].iter().enumerate() {
                let Some(n) = *neighbor else { continue };
                if self.visit(n) {
                    self.tree.push(TreeEdge { parent: current, parent_slot: slot, child: n });
                    self.stack.push(n);
                }
            }
        }
        &self.order
    }

    /// Spanning tree of the last [`component`](Self::component) walk, each
    /// parent listed before its children.
    pub fn tree_edges(&self) -> &[TreeEdge] {
        &self.tree
    }

    /// `true` if `to` is in the same structure as `from`.
    pub fn reaches(&mut self, slots: &[Box<[Option<AgentId>]>], from: AgentId, to: AgentId) -> bool {
        if from == to {
            return true;
        }
        self.begin(slots.len());
        self.visit(from);
        self.stack.push(from);
        while let Some(current) = self.stack.pop() {
            for n in slots[current.index()].iter().flatten().copied() {
                if n == to {
                    self.stack.clear();
                    return true;
                }
                if self.visit(n) {
                    self.stack.push(n);
                }
            }
        }
        false
    }

    /// Write `value` into `sizes` for every agent connected to `start`,
    /// stopping at agents that already hold it.
    pub fn propagate(
        &mut self,
        slots: &[Box<[Option<AgentId>]>],
        sizes: &mut [u32],
        start: AgentId,
        value: u32,
    ) {
        self.stack.clear();
        self.stack.push(start);
        while let Some(current) = self.stack.pop() {
            let size = &mut sizes[current.index()];
            if *size == value {
                continue;
            }
            *size = value;
            self.stack.extend(
                slots[current.index()]
                    .iter()
                    .flatten()
                    .filter(|n| sizes[n.index()] != value),
            );
        }
    }
}
