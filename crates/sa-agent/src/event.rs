//! Events raised by the swarm while it mutates.
//!
//! The swarm only buffers events; the simulation driver drains the buffer
//! after each phase and forwards every event to its observer.

use sa_core::AgentId;
use sa_harmony::VoiceEnvelope;

use crate::AgentState;

/// Result of a join attempt.  Losing a race is an ordinary outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    /// A slot was taken, or the agents were already connected.  The
    /// initiator's structure is back to `Joined` and the initiator wanders.
    Aborted,
}

/// What an agent does on a beat.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Beat {
    /// Play the note of an occupied slot.
    Note {
        slot:      usize,
        neighbor: AgentId,
        /// MIDI note number.
        pitch:     i32,
        envelope:  VoiceEnvelope,
    },
    /// No neighbors; a presentation layer may flash or pulse the agent.
    Alone,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwarmEvent {
    StateChanged {
        agent: AgentId,
        from:  AgentState,
        to:    AgentState,
    },
    Joined {
        time:           f64,
        agent:          AgentId,
        target:         AgentId,
        structure_size: u32,
    },
    JoinAborted {
        time:  f64,
        agent: AgentId,
    },
    Detached {
        time:  f64,
        agent: AgentId,
    },
    PhasorClimax {
        time:  f64,
        agent: AgentId,
    },
    Beat {
        time:  f64,
        agent: AgentId,
        beat:  Beat,
    },
}
