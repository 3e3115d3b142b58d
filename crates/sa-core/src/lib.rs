//! `sa-core`: foundational types for the self-assembly swarm simulator.
//!
//! This crate is a dependency of every other `sa-*` crate.  It has no `sa-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`vec3`]        | `Vec3`, the world-space vector used for kinematics    |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `SimConfig`, `RunMode`                                |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `SaError`, `SaResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vec3;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{RunMode, SimConfig};
pub use error::{SaError, SaResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
pub use vec3::Vec3;
