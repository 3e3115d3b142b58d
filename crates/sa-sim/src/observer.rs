//! Simulation observer trait for progress reporting and data collection.

use sa_agent::{AgentState, Beat, Swarm};
use sa_core::{AgentId, Tick};

/// Callbacks invoked by [`Sim`][crate::Sim] as the tick loop runs.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Swarm events are delivered after the phase
/// that produced them, in the order they happened.
///
/// # Example: join counter
///
/// ```rust,ignore
/// struct JoinCounter(usize);
///
/// impl SwarmObserver for JoinCounter {
///     fn on_join(&mut self, _time: f64, _agent: AgentId, _swarm: &Swarm) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SwarmObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the number of proximity
    /// detections that started a join this tick.
    fn on_tick_end(&mut self, _tick: Tick, _detections: usize) {}

    /// An agent changed behavioural state.
    fn on_state_change(&mut self, _agent: AgentId, _from: AgentState, _to: AgentState) {}

    /// `agent` completed a join.  `swarm` reflects the state right after the
    /// phase in which the join happened.
    fn on_join(&mut self, _time: f64, _agent: AgentId, _swarm: &Swarm) {}

    /// `agent` gave up a pending join.
    fn on_join_aborted(&mut self, _time: f64, _agent: AgentId) {}

    /// `agent` left its structure.
    fn on_detach(&mut self, _time: f64, _agent: AgentId, _swarm: &Swarm) {}

    /// `agent`'s cycle phasor wrapped.
    fn on_phasor_climax(&mut self, _agent: AgentId, _time: f64) {}

    /// `agent` played a beat.
    fn on_beat(&mut self, _time: f64, _agent: AgentId, _beat: &Beat) {}

    /// Called every `config.snapshot_interval_ticks` ticks.
    fn on_snapshot(&mut self, _tick: Tick, _swarm: &Swarm) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SwarmObserver`] that does nothing.
pub struct NoopObserver;

impl SwarmObserver for NoopObserver {}
