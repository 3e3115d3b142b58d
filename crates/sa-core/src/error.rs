//! Framework error type.
//!
//! Only collaborator-facing entry points return errors.  Precondition races
//! inside a tick (a slot taken between detection and arrival, a boundary hit
//! mid-approach) are ordinary outcomes and never surface here.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `sa-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SaError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("slot {slot} out of range for {agent} ({joints} joints)")]
    SlotOutOfRange {
        agent:  AgentId,
        slot:   usize,
        joints: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `sa-*` crates.
pub type SaResult<T> = Result<T, SaError>;
