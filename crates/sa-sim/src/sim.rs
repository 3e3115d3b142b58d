//! The `Sim` struct and its tick loop.

use sa_agent::{Swarm, SwarmEvent};
use sa_core::{RunMode, SimClock, SimConfig};
use tracing::info;

use crate::{ProximityDetector, SimResult, SwarmObserver};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick runs three phases in order:
///
/// 1. **Movement**: every agent's state machine, ascending `AgentId`.
/// 2. **Detection**: in [`RunMode::Batch`] every agent is scanned; in
///    [`RunMode::RealTime`] one agent per tick, round-robin, to bound the
///    per-frame cost.
/// 3. **Phase**: oscillators advance; climaxes and beats are emitted.
///
/// Buffered swarm events are dispatched to the observer after each phase.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:   SimConfig,
    pub clock:    SimClock,
    pub swarm:    Swarm,
    pub detector: ProximityDetector,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SwarmObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.swarm.len(),
            mode = ?self.config.mode,
            ticks = self.config.total_ticks,
            dt = self.config.delta_time,
            "simulation starting"
        );

        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);

        info!(
            final_tick = %self.clock.current_tick,
            structures = self.swarm.all_structures().len(),
            "simulation finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SwarmObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Advance one fixed timestep.  Real-time drivers call this from their
    /// frame callback.
    pub fn step<O: SwarmObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        let dt = self.clock.delta_time;
        self.swarm.time = self.clock.elapsed_secs();

        observer.on_tick_start(now);

        // ── Phase 1: movement ─────────────────────────────────────────────
        self.swarm.update_movements(dt);
        self.dispatch(observer);

        // ── Phase 2: proximity detection ──────────────────────────────────
        let detections = match self.config.mode {
            RunMode::Batch    => self.detector.scan_all(&mut self.swarm)?,
            RunMode::RealTime => self.detector.scan_next(&mut self.swarm)?,
        };
        self.dispatch(observer);

        // ── Phase 3: oscillators ──────────────────────────────────────────
        self.swarm.advance_oscillators(dt);
        self.dispatch(observer);

        observer.on_tick_end(now, detections);
        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            observer.on_snapshot(now, &self.swarm);
        }

        self.clock.advance();
        Ok(())
    }

    /// Current simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    // ── Event dispatch ────────────────────────────────────────────────────

    fn dispatch<O: SwarmObserver>(&mut self, observer: &mut O) {
        let events = self.swarm.take_events();
        for event in &events {
            match *event {
                SwarmEvent::StateChanged { agent, from, to } => {
                    observer.on_state_change(agent, from, to);
                }
                SwarmEvent::Joined { time, agent, .. } => observer.on_join(time, agent, &self.swarm),
                SwarmEvent::JoinAborted { time, agent } => observer.on_join_aborted(time, agent),
                SwarmEvent::Detached { time, agent } => observer.on_detach(time, agent, &self.swarm),
                SwarmEvent::PhasorClimax { time, agent } => observer.on_phasor_climax(agent, time),
                SwarmEvent::Beat { time, agent, ref beat } => observer.on_beat(time, agent, beat),
            }
        }
        self.swarm.recycle_events(events);
    }
}
