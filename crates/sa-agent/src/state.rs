//! Behavioural states of an agent.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Free movement; not yet eligible to initiate a join.
    #[default]
    Wandering,
    /// Free movement after a boundary-free dwell; may initiate joins.
    WanderingAndDetecting,
    /// Heading for a target agent's slot.
    ToJoin,
    /// Member of a structure whose root is in `ToJoin`.  Moves like `Joined`.
    IndirectToJoin,
    /// Position derived from the followed neighbor.
    Joined,
}

impl AgentState {
    /// `true` for states whose position is computed from a follow link.
    #[inline]
    pub fn is_following(self) -> bool {
        matches!(self, AgentState::Joined | AgentState::IndirectToJoin)
    }

    /// States that may start a join when the proximity scan visits them.
    #[inline]
    pub fn can_initiate_join(self) -> bool {
        matches!(self, AgentState::WanderingAndDetecting | AgentState::Joined)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Wandering             => "wandering",
            AgentState::WanderingAndDetecting => "wandering_and_detecting",
            AgentState::ToJoin                => "to_join",
            AgentState::IndirectToJoin        => "indirect_to_join",
            AgentState::Joined                => "joined",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
