//! `sa-agent`: the agents of the swarm and the structures they build.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                       |
//! |------------------|----------------------------------------------------------------|
//! | [`state`]        | `AgentState`: the five behavioural states                     |
//! | [`orientation`]  | `Orientation`: slot axes and follower alignment               |
//! | [`oscillator`]   | `PhaseOscillator`, `Subdivision`: cycle and beat phasors      |
//! | [`store`]        | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)         |
//! | [`walker`]       | `StructureWalker`: iterative traversal with epoch visited-set |
//! | [`swarm`]        | `Swarm`: arena + RNGs + walker + event buffer                 |
//! | [`builder`]      | `AgentSpawn`, `SwarmBuilder`                                   |
//! | [`graph`]        | Join, detach, re-root, size propagation, snapshots             |
//! | [`movement`]     | Per-tick state machine and proximity callback                  |
//! | [`music`]        | Joint notes, beat scheduling, structure chord                  |
//! | [`audit`]        | `GraphViolation`: invariant checker for tests and debugging   |
//! | [`event`]        | `SwarmEvent`, `Beat`, `JoinOutcome`                            |
//!
//! # Structure model
//!
//! Agents live in an arena indexed by `AgentId`.  Each agent has K slots;
//! an occupied slot names a neighbor, and the neighbor has exactly one slot
//! naming it back.  Joins only connect agents in different components, so
//! every component is a tree.  Within a component exactly one agent (the
//! root) moves on its own; every other agent has a `Follow` link to a
//! neighbor and derives its position from it, and following those links
//! always ends at the root.
//!
//! All multi-agent mutations (join, detach, re-root) run to completion
//! inside a single `&mut Swarm` call, so no partial join is ever observable.

pub mod audit;
pub mod builder;
pub mod event;
pub mod graph;
pub mod movement;
pub mod music;
pub mod orientation;
pub mod oscillator;
pub mod state;
pub mod store;
pub mod swarm;
pub mod walker;


pub use audit::GraphViolation;
pub use builder::{AgentSpawn, SwarmBuilder};
pub use event::{Beat, JoinOutcome, SwarmEvent};
pub use graph::StructureSnapshot;
pub use orientation::Orientation;
pub use oscillator::{OscillatorTick, PhaseOscillator, Subdivision};
pub use state::AgentState;
pub use store::{AgentParams, AgentRngs, AgentStore, AgentTimers, Follow, JoinTarget};
pub use swarm::Swarm;
pub use walker::StructureWalker;
