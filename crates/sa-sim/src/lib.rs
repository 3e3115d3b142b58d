//! `sa-sim`: tick loop orchestrator for the self-assembly swarm.
//!
//! # Tick loop
//!
//! ```text
//! every tick (dt = config.delta_time, time = tick × dt):
//!   ① Movement   every agent's state machine, ascending AgentId.
//!   ② Detection  Batch: full pairwise scan.
//!                RealTime: one agent per tick, round-robin.
//!   ③ Phase      oscillators advance (parallel with the `parallel`
//!                feature); climaxes and beats in ascending AgentId.
//!   after each phase, buffered swarm events go to the observer.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Advances oscillators on Rayon's thread pool.           |
//! | `serde`    | Serde derives on recorder records.                     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sa_agent::SwarmBuilder;
//! use sa_core::SimConfig;
//! use sa_sim::{SimBuilder, StructureRecorder};
//!
//! let config = SimConfig::default();
//! let swarm = SwarmBuilder::from_config(&config).build()?;
//! let mut sim = SimBuilder::new(config).swarm(swarm).build()?;
//! let mut recorder = StructureRecorder::new();
//! sim.run(&mut recorder)?;
//! ```

pub mod builder;
pub mod detector;
pub mod error;
pub mod observer;
pub mod recorder;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use detector::ProximityDetector;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SwarmObserver};
pub use recorder::{ClimaxRecord, StructureEventKind, StructureRecord, StructureRecorder};
pub use sim::Sim;
