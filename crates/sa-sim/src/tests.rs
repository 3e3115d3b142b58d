//! Integration tests for sa-sim.

use sa_agent::{AgentSpawn, AgentState, Beat, Swarm, SwarmBuilder};
use sa_core::{AgentId, RunMode, SimConfig, Tick, Vec3};

use crate::{
    NoopObserver, ProximityDetector, Sim, SimBuilder, SimError, StructureEventKind,
    StructureRecorder, SwarmObserver,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Stationary agents that start detecting on their first tick.
fn still_config(agent_count: usize) -> SimConfig {
    SimConfig {
        agent_count,
        min_speed: 0.0,
        max_speed: 0.0,
        only_wandering_time: 0.0,
        total_ticks: 100,
        ..SimConfig::default()
    }
}

fn spawn_at(config: &SimConfig, x: f32) -> AgentSpawn {
    AgentSpawn {
        position:  Vec3::new(x, 0.0, 0.0),
        direction: Vec3::Y,
        ..AgentSpawn::from_config(config)
    }
}

fn sim_with(config: SimConfig, spawns: Vec<AgentSpawn>) -> Sim {
    let swarm = SwarmBuilder::new(config.seed).agents(spawns).build().unwrap();
    SimBuilder::new(config).swarm(swarm).build().unwrap()
}

/// Every structural invariant, plus the state/follow-link correspondence.
fn assert_healthy(swarm: &Swarm, tick: u64) {
    let violations = swarm.audit();
    assert!(violations.is_empty(), "tick {tick}: {violations:?}");
    for agent in swarm.store.agent_ids() {
        let i = agent.index();
        let state = swarm.state(agent);
        assert_eq!(
            swarm.store.follow[i].is_some(),
            state.is_following(),
            "tick {tick}: {agent} is {state} with follow {:?}",
            swarm.store.follow[i]
        );
        if state == AgentState::ToJoin {
            assert!(swarm.store.join_target[i].is_some(), "tick {tick}: {agent} has no target");
        }
    }
}

fn run_checked<O: SwarmObserver>(sim: &mut Sim, ticks: u64, observer: &mut O) {
    for _ in 0..ticks {
        let tick = sim.clock.current_tick.0;
        sim.run_ticks(1, observer).unwrap();
        assert_healthy(&sim.swarm, tick);
    }
}

#[derive(Default)]
struct Counter {
    tick_starts:   u64,
    tick_ends:     u64,
    snapshots:     Vec<Tick>,
    ends:          u64,
    detections:    usize,
    joins:         usize,
    aborts:        usize,
    detaches:      usize,
    climaxes:      usize,
    beats:         usize,
    notes:         usize,
    state_changes: usize,
}

impl SwarmObserver for Counter {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.tick_starts += 1;
    }
    fn on_tick_end(&mut self, _tick: Tick, detections: usize) {
        self.tick_ends += 1;
        self.detections += detections;
    }
    fn on_state_change(&mut self, _agent: AgentId, from: AgentState, to: AgentState) {
        assert_ne!(from, to);
        self.state_changes += 1;
    }
    fn on_join(&mut self, _time: f64, agent: AgentId, swarm: &Swarm) {
        assert!(swarm.structure_size(agent) >= 2);
        self.joins += 1;
    }
    fn on_join_aborted(&mut self, _time: f64, _agent: AgentId) {
        self.aborts += 1;
    }
    fn on_detach(&mut self, _time: f64, _agent: AgentId, _swarm: &Swarm) {
        self.detaches += 1;
    }
    fn on_phasor_climax(&mut self, _agent: AgentId, _time: f64) {
        self.climaxes += 1;
    }
    fn on_beat(&mut self, _time: f64, _agent: AgentId, beat: &Beat) {
        self.beats += 1;
        if let Beat::Note { pitch, .. } = beat {
            assert!((36..=95).contains(pitch));
            self.notes += 1;
        }
    }
    fn on_snapshot(&mut self, tick: Tick, _swarm: &Swarm) {
        self.snapshots.push(tick);
    }
    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.ends += 1;
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_random_swarm_from_config() {
        let sim = SimBuilder::new(SimConfig::default()).build().unwrap();
        assert_eq!(sim.swarm.len(), 20);
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
    }

    #[test]
    fn swarm_count_mismatch_errors() {
        let config = still_config(3);
        let swarm = SwarmBuilder::new(1).agent(spawn_at(&config, 0.0)).build().unwrap();
        let result = SimBuilder::new(config).swarm(swarm).build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 3, got: 1, .. })
        ));
    }

    #[test]
    fn invalid_config_errors() {
        let config = SimConfig { boundary_radius: -1.0, ..SimConfig::default() };
        assert!(matches!(SimBuilder::new(config).build(), Err(SimError::Config(_))));
    }
}

// ── ProximityDetector ─────────────────────────────────────────────────────────

#[cfg(test)]
mod detector_tests {
    use super::*;

    fn pair(gap: f32) -> Swarm {
        let config = still_config(2);
        SwarmBuilder::new(1)
            .agents([spawn_at(&config, 0.0), spawn_at(&config, gap)])
            .build()
            .unwrap()
    }

    #[test]
    fn wandering_agents_do_not_initiate() {
        let mut swarm = pair(0.04);
        let mut detector = ProximityDetector::new();
        assert_eq!(detector.scan_all(&mut swarm).unwrap(), 0);
        assert_eq!(swarm.state(AgentId(0)), AgentState::Wandering);
    }

    #[test]
    fn detecting_agent_targets_lowest_free_slot() {
        let mut swarm = pair(0.04);
        swarm.store.state[0] = AgentState::WanderingAndDetecting;
        let mut detector = ProximityDetector::new();

        assert!(detector.scan_agent(&mut swarm, AgentId(0)).unwrap());
        assert_eq!(swarm.state(AgentId(0)), AgentState::ToJoin);
        let target = swarm.store.join_target[0].unwrap();
        assert_eq!((target.agent, target.slot), (AgentId(1), 0));
    }

    #[test]
    fn distant_agents_are_ignored() {
        let mut swarm = pair(0.5);
        swarm.store.state[0] = AgentState::WanderingAndDetecting;
        let mut detector = ProximityDetector::new();
        assert!(!detector.scan_agent(&mut swarm, AgentId(0)).unwrap());
    }

    #[test]
    fn only_higher_ids_are_partners() {
        let mut swarm = pair(0.04);
        swarm.store.state[1] = AgentState::WanderingAndDetecting;
        let mut detector = ProximityDetector::new();
        assert!(!detector.scan_agent(&mut swarm, AgentId(1)).unwrap());
    }

    #[test]
    fn connected_agents_are_skipped() {
        let mut swarm = pair(0.04);
        swarm.join_to(AgentId(1), AgentId(0), 0).unwrap();
        assert_eq!(swarm.state(AgentId(1)), AgentState::Joined);
        swarm.store.state[0] = AgentState::WanderingAndDetecting;
        let mut detector = ProximityDetector::new();
        assert!(!detector.scan_agent(&mut swarm, AgentId(0)).unwrap());
    }

    #[test]
    fn scan_next_walks_round_robin() {
        let mut swarm = pair(0.5);
        let mut detector = ProximityDetector::new();
        for expected in [1, 0, 1, 0] {
            detector.scan_next(&mut swarm).unwrap();
            assert_eq!(detector.cursor(), expected);
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sim_tests {
    use super::*;

    fn close_pair(mode: RunMode) {
        let config = SimConfig { mode, ..still_config(2) };
        let spawns = vec![spawn_at(&config, 0.0), spawn_at(&config, 0.04)];
        let mut sim = sim_with(config, spawns);
        let mut recorder = StructureRecorder::new();

        run_checked(&mut sim, 2, &mut recorder);

        let (a, b) = (AgentId(0), AgentId(1));
        assert_eq!(sim.swarm.structure_size(a), 2);
        assert_eq!(sim.swarm.structure_size(b), 2);
        let roots = sim.swarm.store.agent_ids().filter(|&x| sim.swarm.store.is_root(x)).count();
        assert_eq!(roots, 1);
        assert_eq!(recorder.joins, 1);
        assert_eq!(recorder.latest().unwrap().kind, StructureEventKind::Join);
        assert_eq!(recorder.latest().unwrap().structures.len(), 1);

        let pa = sim.swarm.store.oscillator[0].phase();
        let pb = sim.swarm.store.oscillator[1].phase();
        assert!((pa - pb).abs() < 1e-5);

        run_checked(&mut sim, 50, &mut recorder);
        assert_eq!(recorder.joins, 1);
        assert!(sim.swarm.store.slots[0].iter().flatten().any(|&n| n == b));
    }

    #[test]
    fn close_stationary_pair_joins_in_batch_mode() {
        close_pair(RunMode::Batch);
    }

    #[test]
    fn close_stationary_pair_joins_in_real_time_mode() {
        close_pair(RunMode::RealTime);
    }

    #[test]
    fn detaching_middle_of_chain_frees_everyone() {
        let config = still_config(3);
        let spawns = (0..3).map(|i| spawn_at(&config, i as f32 * 0.5)).collect();
        let mut sim = sim_with(config, spawns);
        let (a, b, c) = (AgentId(0), AgentId(1), AgentId(2));
        sim.swarm.join_to(b, a, 0).unwrap();
        sim.swarm.join_to(c, b, 1).unwrap();
        let mut recorder = StructureRecorder::new();
        run_checked(&mut sim, 1, &mut recorder);

        sim.swarm.try_detach(b).unwrap();

        for agent in [a, b, c] {
            assert_eq!(sim.swarm.structure_size(agent), 1);
            assert!(sim.swarm.store.is_alone(agent));
            assert!(matches!(
                sim.swarm.state(agent),
                AgentState::Wandering | AgentState::WanderingAndDetecting
            ));
        }
        assert_healthy(&sim.swarm, 1);
    }

    #[test]
    fn join_race_has_one_winner() {
        let config = SimConfig { min_speed: 1.0, max_speed: 1.0, ..still_config(3) };
        let hub = AgentSpawn { max_joints: 1, speed: 0.0, ..spawn_at(&config, 0.0) };
        let spawns = vec![spawn_at(&config, -0.15), spawn_at(&config, 0.15), hub];
        let mut sim = sim_with(config, spawns);
        let mut counter = Counter::default();

        run_checked(&mut sim, 1, &mut counter);
        assert_eq!(sim.swarm.state(AgentId(0)), AgentState::ToJoin);
        assert_eq!(sim.swarm.state(AgentId(1)), AgentState::ToJoin);

        run_checked(&mut sim, 40, &mut counter);

        let occupant = sim.swarm.store.slots[2][0];
        assert!(matches!(occupant, Some(AgentId(0)) | Some(AgentId(1))));
        assert!(counter.joins >= 1);
        assert!(counter.aborts >= 1);
    }

    #[test]
    fn expired_join_timer_detaches_before_new_approach() {
        let config = SimConfig { max_join_time: 0.05, ..still_config(3) };
        let spawns = vec![spawn_at(&config, 0.0), spawn_at(&config, 0.04), spawn_at(&config, 0.9)];
        let mut sim = sim_with(config, spawns);
        let mut counter = Counter::default();
        let (a, b, c) = (AgentId(0), AgentId(1), AgentId(2));

        run_checked(&mut sim, 20, &mut counter);
        assert_eq!(counter.joins, 1);
        assert_eq!(counter.detaches, 0);
        assert_eq!(sim.swarm.state(a), AgentState::Joined);
        assert!(sim.swarm.store.timers[a.index()].detach_ready);

        sim.swarm.store.position[c.index()] = sim.swarm.position(a) + Vec3::new(0.0, 0.0, 0.1);
        run_checked(&mut sim, 1, &mut counter);

        assert_eq!(counter.detaches, 1);
        assert_eq!(sim.swarm.state(a), AgentState::ToJoin);
        assert_eq!(sim.swarm.store.join_target[a.index()].unwrap().agent, c);
        assert_eq!(sim.swarm.structure_size(b), 1);
        assert!(sim.swarm.store.is_alone(b));
    }

    #[test]
    fn mixed_sign_speeds_stay_in_the_arena() {
        let config = SimConfig {
            agent_count:         20,
            seed:                11,
            min_speed:           -1.0,
            max_speed:           1.0,
            boundary_radius:     0.5,
            only_wandering_time: 100.0,
            ..SimConfig::default()
        };
        let limit = config.boundary_radius + 2.0 * config.max_speed * config.delta_time;
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut counter = Counter::default();

        for _ in 0..500 {
            run_checked(&mut sim, 1, &mut counter);
            for agent in sim.swarm.store.agent_ids() {
                let p = sim.swarm.position(agent);
                assert!(p.length() <= limit, "{agent} escaped to {p}");
            }
        }
        assert_eq!(counter.joins, 0);
        assert!(sim.swarm.store.params.iter().any(|p| p.speed < 0.0));
    }

    #[test]
    fn random_swarm_keeps_invariants_in_both_modes() {
        for mode in [RunMode::Batch, RunMode::RealTime] {
            let config = SimConfig {
                agent_count:         30,
                seed:                7,
                min_speed:           -0.8,
                max_speed:           0.8,
                boundary_radius:     0.5,
                only_wandering_time: 0.1,
                max_join_time:       0.3,
                mode,
                ..SimConfig::default()
            };
            let mut sim = SimBuilder::new(config).build().unwrap();
            let mut counter = Counter::default();

            run_checked(&mut sim, 600, &mut counter);

            assert!(counter.joins > 0, "{mode:?}: no joins");
            assert!(counter.state_changes > 0);
            assert!(counter.climaxes >= 30);
            assert!(counter.beats >= counter.climaxes);
        }
    }

    #[test]
    fn run_stops_at_end_tick() {
        let config = SimConfig { total_ticks: 25, snapshot_interval_ticks: 10, ..SimConfig::default() };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut counter = Counter::default();

        sim.run(&mut counter).unwrap();

        assert_eq!(sim.clock.current_tick, Tick(25));
        assert_eq!(counter.tick_starts, 25);
        assert_eq!(counter.tick_ends, 25);
        assert_eq!(counter.ends, 1);
        assert_eq!(counter.snapshots, vec![Tick(0), Tick(10), Tick(20)]);
        assert!((sim.time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn real_time_detects_at_most_once_per_tick() {
        let config = SimConfig { mode: RunMode::RealTime, ..still_config(10) };
        let spawns = (0..10).map(|i| spawn_at(&config, i as f32 * 0.02)).collect();
        let mut sim = sim_with(config, spawns);
        let mut counter = Counter::default();
        for _ in 0..10 {
            let before = counter.detections;
            sim.run_ticks(1, &mut counter).unwrap();
            assert!(counter.detections - before <= 1);
        }
        assert_eq!(sim.detector.cursor(), 0);
    }

    #[test]
    fn runs_are_deterministic() {
        let config = SimConfig {
            agent_count:     25,
            boundary_radius: 0.4,
            ..SimConfig::default()
        };
        let mut first = SimBuilder::new(config.clone()).build().unwrap();
        let mut second = SimBuilder::new(config).build().unwrap();
        let mut rec1 = StructureRecorder::new();
        let mut rec2 = StructureRecorder::new();

        first.run_ticks(300, &mut rec1).unwrap();
        second.run_ticks(300, &mut rec2).unwrap();

        assert_eq!(first.swarm.store.position, second.swarm.store.position);
        assert_eq!(first.swarm.store.state, second.swarm.store.state);
        assert_eq!(rec1.records, rec2.records);
        assert_eq!(rec1.climaxes, rec2.climaxes);
    }

    #[test]
    fn noop_observer_runs() {
        let mut sim = SimBuilder::new(SimConfig { total_ticks: 10, ..SimConfig::default() })
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(10));
    }
}

// ── StructureRecorder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod recorder_tests {
    use super::*;

    fn two_agents() -> Swarm {
        let config = still_config(2);
        SwarmBuilder::new(1)
            .agents([spawn_at(&config, 0.0), spawn_at(&config, 0.5)])
            .build()
            .unwrap()
    }

    #[test]
    fn same_instant_keeps_last_record() {
        let swarm = two_agents();
        let mut recorder = StructureRecorder::new();
        recorder.on_join(1.0, AgentId(0), &swarm);
        recorder.on_detach(1.0, AgentId(1), &swarm);

        assert_eq!(recorder.records.len(), 1);
        assert_eq!(recorder.records[0].agent, AgentId(1));
        assert_eq!(recorder.records[0].kind, StructureEventKind::Detach);
        assert_eq!(recorder.joins, 1);
        assert_eq!(recorder.detaches, 1);
    }

    #[test]
    fn distinct_instants_append() {
        let swarm = two_agents();
        let mut recorder = StructureRecorder::new();
        recorder.on_join(1.0, AgentId(0), &swarm);
        recorder.on_join(1.01, AgentId(0), &swarm);
        assert_eq!(recorder.records.len(), 2);
        assert_eq!(recorder.records[1].structures.len(), 2);
    }

    #[test]
    fn climaxes_are_logged() {
        let mut recorder = StructureRecorder::new();
        recorder.on_phasor_climax(AgentId(3), 0.5);
        assert_eq!(recorder.climaxes.len(), 1);
        assert_eq!(recorder.climaxes[0].agent, AgentId(3));
    }
}
