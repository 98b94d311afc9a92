#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks round-robin targets for agents that are ready to fire.

use std::collections::{BTreeMap, BTreeSet};

use lane_blast_core::{AgentId, CellCoord, CellId, Color, Command, Event, GridView};

/// Targeting system that keeps a scan cursor per docked agent.
#[derive(Debug, Default)]
pub struct Targeting {
    cursors: BTreeMap<AgentId, u32>,
    claimed: BTreeSet<CellId>,
}

impl Targeting {
    /// Creates a new targeting system with no cursors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits a fire or hold command per ready agent.
    ///
    /// Each scan starts at the agent's cursor and sweeps the front row once,
    /// skipping inactive, reserved and differently coloured cells as well as
    /// cells already claimed earlier in the same batch.
    pub fn handle(&mut self, events: &[Event], grid: &GridView, out: &mut Vec<Command>) {
        self.claimed.clear();

        for event in events {
            match event {
                Event::LevelLoaded { .. } => self.cursors.clear(),
                Event::AgentExited { agent } => {
                    let _ = self.cursors.remove(agent);
                }
                Event::AgentReady { agent, color } => {
                    let command = match self.scan(*agent, *color, grid) {
                        Some(target) => Command::FireProjectile {
                            agent: *agent,
                            target,
                        },
                        None => Command::HoldFire { agent: *agent },
                    };
                    out.push(command);
                }
                _ => {}
            }
        }
    }

    /// Current scan cursor of the agent.
    #[must_use]
    pub fn cursor(&self, agent: AgentId) -> u32 {
        self.cursors.get(&agent).copied().unwrap_or(0)
    }

    fn scan(&mut self, agent: AgentId, color: Color, grid: &GridView) -> Option<CellId> {
        let (lanes, _) = grid.dimensions();
        if lanes == 0 {
            return None;
        }

        let start = self.cursor(agent) % lanes;
        for offset in 0..lanes {
            let lane = (start + offset) % lanes;
            let Some(cell) = grid.cell(CellCoord::new(lane, 0)) else {
                continue;
            };
            if !cell.active || cell.reserved || cell.color != color {
                continue;
            }
            if !self.claimed.insert(cell.id) {
                continue;
            }

            let _ = self.cursors.insert(agent, (lane + 1) % lanes);
            return Some(cell.id);
        }
        None
    }
}
