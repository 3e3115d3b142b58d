use sa_core::SaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("swarm error: {0}")]
    Swarm(#[from] SaError),
}

pub type SimResult<T> = Result<T, SimError>;
