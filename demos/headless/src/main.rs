//! headless: run the self-assembly swarm without a renderer.
//!
//! ```text
//! headless [config.json] [structures.json]
//! ```
//!
//! The optional config is a JSON `SimConfig`; missing fields take their
//! defaults.  In `real_time` mode each tick sleeps for `delta_time` so the
//! beat log lines up with the wall clock.  When a second path is given the
//! structure history is written there as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sa_agent::{Beat, Swarm};
use sa_core::{AgentId, RunMode, SimConfig, Tick};
use sa_harmony::ChordMetric;
use sa_sim::{SimBuilder, StructureRecorder, SwarmObserver};

// ── Observer ──────────────────────────────────────────────────────────────────

/// Records structures and prints a progress line every `interval` ticks.
struct ConsoleObserver {
    recorder: StructureRecorder,
    interval: u64,
    notes:    u64,
}

impl SwarmObserver for ConsoleObserver {
    fn on_tick_end(&mut self, tick: Tick, _detections: usize) {
        if self.interval > 0 && tick.0.is_multiple_of(self.interval) {
            info!(
                %tick,
                joins = self.recorder.joins,
                detaches = self.recorder.detaches,
                notes = self.notes,
                "progress"
            );
        }
    }

    fn on_join(&mut self, time: f64, agent: AgentId, swarm: &Swarm) {
        self.recorder.on_join(time, agent, swarm);
    }

    fn on_detach(&mut self, time: f64, agent: AgentId, swarm: &Swarm) {
        self.recorder.on_detach(time, agent, swarm);
    }

    fn on_phasor_climax(&mut self, agent: AgentId, time: f64) {
        self.recorder.on_phasor_climax(agent, time);
    }

    fn on_beat(&mut self, _time: f64, _agent: AgentId, beat: &Beat) {
        if matches!(beat, Beat::Note { .. }) {
            self.notes += 1;
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
            serde_json::from_reader::<_, SimConfig>(BufReader::new(file))
                .with_context(|| format!("parsing config {path}"))?
        }
        None => SimConfig::default(),
    };
    let history_path = args.next();

    let mode = config.mode;
    let total_ticks = config.total_ticks;
    let dt = Duration::from_secs_f32(config.delta_time);
    let mut sim = SimBuilder::new(config).build()?;
    let mut observer = ConsoleObserver {
        recorder: StructureRecorder::new(),
        interval: (total_ticks / 10).max(1),
        notes:    0,
    };

    let started = Instant::now();
    match mode {
        RunMode::Batch => sim.run(&mut observer)?,
        RunMode::RealTime => {
            for _ in 0..total_ticks {
                let frame = Instant::now();
                sim.step(&mut observer)?;
                if let Some(rest) = dt.checked_sub(frame.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
    }
    let elapsed = started.elapsed();

    // ── Summary ───────────────────────────────────────────────────────────
    let structures = sim.swarm.all_structures();
    let largest = structures.iter().map(|s| s.len()).max().unwrap_or(0);
    println!(
        "\n{} ticks ({:.2} simulated s) in {:.2?}",
        sim.clock.current_tick.0,
        sim.time(),
        elapsed
    );
    println!(
        "joins: {}  detaches: {}  climaxes: {}  notes: {}",
        observer.recorder.joins,
        observer.recorder.detaches,
        observer.recorder.climaxes.len(),
        observer.notes
    );
    println!("structures: {}  largest: {largest}", structures.len());
    for snapshot in structures.iter().filter(|s| s.len() > 1) {
        let root = snapshot.members[0];
        let chord = sim.swarm.structure_chord(root, ChordMetric::Affinity)?;
        println!(
            "  size {:>3}  chord {:<10} {snapshot}",
            snapshot.len(),
            chord.to_string()
        );
    }

    if let Some(path) = history_path {
        let file = File::create(&path).with_context(|| format!("creating {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &observer.recorder.records)
            .with_context(|| format!("writing {path}"))?;
        println!("structure history written to {path}");
    }

    Ok(())
}
