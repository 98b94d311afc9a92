#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-side driver that wires the world to its systems.
//!
//! Every call applies one host command, then feeds the resulting events to
//! the targeting and outcome systems and applies their commands until no
//! system has anything left to say. Clock advances stop at every due task.

use std::{collections::VecDeque, time::Duration};

use lane_blast_core::{CellId, Command, Event, GameState, LevelLayout, Tuning};
use lane_blast_system_outcome::Outcome;
use lane_blast_system_targeting::Targeting;
use lane_blast_world::{self as world, query, World};
use tracing::{debug, warn};

/// Owns a world together with the systems that react to it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    targeting: Targeting,
    outcome: Outcome,
    layout: Option<LevelLayout>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl Simulation {
    /// Creates a simulation around an empty world using the provided tuning.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self::with_world(World::with_tuning(tuning))
    }

    /// Creates a simulation around an existing world.
    #[must_use]
    pub fn with_world(world: World) -> Self {
        Self {
            world,
            targeting: Targeting::new(),
            outcome: Outcome::new(),
            layout: None,
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> GameState {
        query::game_state(&self.world)
    }

    /// Loads a level and remembers it for [`Simulation::restart`].
    pub fn load(&mut self, layout: LevelLayout) -> Vec<Event> {
        self.layout = Some(layout.clone());
        self.pump(Command::LoadLevel { layout })
    }

    /// Reloads the most recently loaded level from scratch.
    pub fn restart(&mut self) -> Vec<Event> {
        match self.layout.clone() {
            Some(layout) => self.pump(Command::LoadLevel { layout }),
            None => {
                warn!("restart_without_level");
                Vec::new()
            }
        }
    }

    /// Forwards a player's tap on a lane.
    pub fn request_dock(&mut self, lane: u32) -> Vec<Event> {
        self.pump(Command::RequestDock { lane })
    }

    /// Applies a main-target hit on behalf of the host.
    pub fn apply_hit(&mut self, cell: CellId) -> Vec<Event> {
        self.pump(Command::ApplyHit { cell })
    }

    /// Advances the clock by `dt` and settles every system reaction.
    ///
    /// The step is split at every due time on the world's timeline so the
    /// systems react to each batch of tasks at the moment it fires. The
    /// outcome of a run therefore does not depend on how the host slices time.
    pub fn advance(&mut self, dt: Duration) -> Vec<Event> {
        let until = query::now(&self.world).saturating_add(dt);
        let mut events = Vec::new();
        let mut flushed = None;

        while let Some(due) = query::next_due(&self.world) {
            let now = query::now(&self.world);
            if due >= until || (due <= now && flushed == Some(now)) {
                break;
            }
            flushed = Some(now);
            events.extend(self.pump(Command::Tick {
                dt: due.saturating_sub(now),
            }));
        }

        let rest = until.saturating_sub(query::now(&self.world));
        events.extend(self.pump(Command::Tick { dt: rest }));
        events
    }

    fn pump(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        let mut pending = VecDeque::from([command]);
        let mut generated = Vec::new();
        let mut responses = Vec::new();

        while let Some(command) = pending.pop_front() {
            generated.clear();
            world::apply(&mut self.world, command, &mut generated);
            if generated.is_empty() {
                continue;
            }

            let grid = query::grid_view(&self.world);
            let slots = query::slot_view(&self.world);
            let state = query::game_state(&self.world);

            responses.clear();
            self.targeting.handle(&generated, &grid, &mut responses);
            self.outcome.handle(&generated, state, &grid, &slots, &mut responses);
            if !responses.is_empty() {
                debug!(commands = responses.len(), "system_responses");
            }
            pending.extend(responses.drain(..));
            events.append(&mut generated);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lane_blast_core::{AgentSpec, Color, Event, GameState, LevelLayout};

    use super::Simulation;

    #[test]
    fn restart_without_a_level_does_nothing() {
        let mut simulation = Simulation::default();

        assert!(simulation.restart().is_empty());
        assert_eq!(simulation.state(), GameState::Playing);
    }

    #[test]
    fn ready_agent_fires_within_the_same_step() {
        let mut simulation = Simulation::default();
        let _ = simulation.load(LevelLayout::new(
            vec![vec![Color::Red]],
            vec![vec![AgentSpec {
                color: Color::Red,
                ammo: 1,
                hidden: false,
            }]],
        ));
        let _ = simulation.request_dock(0);

        let events = simulation.advance(Duration::from_millis(250));
        let ready = events
            .iter()
            .position(|event| matches!(event, Event::AgentReady { .. }))
            .expect("agent became ready");
        let fired = events
            .iter()
            .position(|event| matches!(event, Event::ProjectileFired { .. }))
            .expect("agent fired");

        assert!(fired > ready);
    }
}
