#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line host that plays a Lane Blast level to completion.

mod autoplay;
mod config;

use std::{fmt, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_blast_core::{Event, GameState, LevelLayout, Tuning};
use lane_blast_simulation::Simulation;
use lane_blast_world::{level::read_level, query};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use autoplay::Autoplay;
use config::TuningFile;

/// Command-line arguments accepted by the Lane Blast host.
#[derive(Debug, Parser)]
#[command(name = "lane-blast", about = "Plays a Lane Blast level headlessly")]
struct Args {
    /// Level file to load.
    #[arg(long, default_value = "levels/demo.json")]
    level: PathBuf,
    /// Optional TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the autoplay lane choices.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated milliseconds per step.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Simulated seconds after which the run is abandoned.
    #[arg(long, default_value_t = 300)]
    max_seconds: u64,
}

/// Counters gathered from the event stream of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RunSummary {
    state: GameState,
    elapsed: Duration,
    docks: u32,
    shots: u32,
    hits: u32,
    misses: u32,
    waves: u32,
    exits: u32,
}

impl RunSummary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentDocked { .. } => self.docks += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::CellHit { .. } => self.hits += 1,
                Event::ProjectileMissed { .. } => self.misses += 1,
                Event::WaveImpulseFired { .. } => self.waves += 1,
                Event::AgentExited { .. } => self.exits += 1,
                Event::GameStateChanged { state } => self.state = *state,
                _ => {}
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "result:  {:?}", self.state)?;
        writeln!(f, "elapsed: {:.2}s", self.elapsed.as_secs_f32())?;
        writeln!(f, "docks:   {}", self.docks)?;
        writeln!(f, "shots:   {} ({} hits, {} misses)", self.shots, self.hits, self.misses)?;
        writeln!(f, "waves:   {}", self.waves)?;
        write!(f, "exits:   {}", self.exits)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let tuning = match &args.config {
        Some(path) => TuningFile::load(path)?.apply(Tuning::default()),
        None => Tuning::default(),
    };
    let layout = read_level(&args.level)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;

    let summary = run(
        Simulation::new(tuning),
        layout,
        args.seed,
        Duration::from_millis(args.tick_ms),
        Duration::from_secs(args.max_seconds),
    );
    println!("{summary}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(
    mut simulation: Simulation,
    layout: LevelLayout,
    seed: u64,
    step: Duration,
    limit: Duration,
) -> RunSummary {
    let mut autoplay = Autoplay::new(seed);
    let mut summary = RunSummary::default();
    summary.record(&simulation.load(layout));

    while !simulation.state().is_terminal() && query::now(simulation.world()) < limit {
        if let Some(lane) = autoplay.choose(simulation.world()) {
            debug!(lane, "autoplay_dock");
            summary.record(&simulation.request_dock(lane));
        }
        summary.record(&simulation.advance(step));
    }

    summary.elapsed = query::now(simulation.world());
    if !simulation.state().is_terminal() {
        info!(elapsed_ms = summary.elapsed.as_millis() as u64, "run_abandoned");
    }
    summary
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use lane_blast_core::{AgentSpec, Color, GameState, LevelLayout, Tuning};
    use lane_blast_simulation::Simulation;

    use super::{run, Args};

    fn single_lane(grid: Color, agent: Color) -> LevelLayout {
        LevelLayout::new(
            vec![vec![grid], vec![grid]],
            vec![vec![AgentSpec {
                color: agent,
                ammo: 2,
                hidden: false,
            }]],
        )
    }

    #[test]
    fn arguments_fall_back_to_defaults() {
        let args = Args::parse_from(["lane-blast"]);

        assert_eq!(args.level.to_str(), Some("levels/demo.json"));
        assert_eq!(args.config, None);
        assert_eq!(args.seed, 0);
        assert_eq!(args.tick_ms, 50);
        assert_eq!(args.max_seconds, 300);
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Args::try_parse_from(["lane-blast", "--tick-ms", "0"]).is_err());
    }

    #[test]
    fn matching_agent_wins_the_run() {
        let summary = run(
            Simulation::new(Tuning::default()),
            single_lane(Color::Red, Color::Red),
            3,
            Duration::from_millis(50),
            Duration::from_secs(30),
        );

        assert_eq!(summary.state, GameState::Won);
        assert_eq!(summary.docks, 1);
        assert_eq!(summary.shots, 2);
        assert_eq!(summary.hits, 2);
    }

    #[test]
    fn run_without_a_match_is_lost() {
        let tuning = Tuning {
            slot_count: 1,
            ..Tuning::default()
        };
        let summary = run(
            Simulation::new(tuning),
            single_lane(Color::Blue, Color::Red),
            3,
            Duration::from_millis(50),
            Duration::from_secs(30),
        );

        assert_eq!(summary.state, GameState::Lost);
        assert_eq!(summary.shots, 0);
    }

    #[test]
    fn run_stops_at_the_time_limit() {
        let summary = run(
            Simulation::new(Tuning::default()),
            single_lane(Color::Blue, Color::Red),
            3,
            Duration::from_millis(50),
            Duration::from_secs(2),
        );

        assert_eq!(summary.state, GameState::Playing);
        assert_eq!(summary.elapsed, Duration::from_secs(2));
    }
}
