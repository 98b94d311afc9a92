#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Blast.
//!
//! The world owns the grid, the lane queues, the slot pool, every agent and
//! every projectile in flight. All delayed behaviour runs on a single
//! [`Timeline`] advanced by [`Command::Tick`]; nothing outside [`apply`]
//! mutates the state.

mod grid;
mod lanes;
pub mod level;
mod pool;
mod projectiles;
mod slots;

use std::collections::BTreeMap;

use lane_blast_core::{
    AgentId, AgentPhase, Amplitude, CellId, Command, Event, GameState, LevelLayout, PoolKind,
    PooledInstance, ProjectileId, ResourcePool, Scheduler, TaskHandle, Tuning,
};
use lane_blast_scheduler::Timeline;
use lane_blast_system_wave::{WaveImpulse, WavePropagation};
use tracing::{debug, info, warn};

use grid::{ClearOutcome, Grid};
use lanes::{Agent, LaneQueues};
use projectiles::{travel_time, Projectile, ProjectileTracker};
use slots::SlotAllocator;

pub use pool::RecyclingPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WorldTask {
    DockArrival { agent: AgentId },
    FireCooldown { agent: AgentId },
    ScanBackoff { agent: AgentId },
    ProjectileArrival { projectile: ProjectileId },
    WaveImpulse { cell: CellId, amplitude: Amplitude },
    ExitComplete { agent: AgentId },
    EffectExpired,
    LosePoll,
}

/// Represents the authoritative Lane Blast world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    wave: WavePropagation,
    timeline: Timeline<WorldTask>,
    pool: Box<dyn ResourcePool>,
    grid: Grid,
    lanes: LaneQueues,
    agents: BTreeMap<AgentId, Agent>,
    slots: SlotAllocator,
    projectiles: ProjectileTracker,
    impulses: BTreeMap<CellId, Vec<TaskHandle>>,
    effects: BTreeMap<TaskHandle, PooledInstance>,
    lose_poll: Option<TaskHandle>,
    state: GameState,
    next_agent: u32,
    wave_scratch: Vec<WaveImpulse>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with default tuning. Load a level before playing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates an empty world using the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self::with_pool(tuning, Box::new(RecyclingPool::new()))
    }

    /// Creates an empty world that borrows projectiles and effects from `pool`.
    #[must_use]
    pub fn with_pool(tuning: Tuning, pool: Box<dyn ResourcePool>) -> Self {
        Self {
            wave: WavePropagation::new(tuning.wave),
            slots: SlotAllocator::new(tuning.slot_count),
            tuning,
            timeline: Timeline::new(),
            pool,
            grid: Grid::default(),
            lanes: LaneQueues::default(),
            agents: BTreeMap::new(),
            projectiles: ProjectileTracker::default(),
            impulses: BTreeMap::new(),
            effects: BTreeMap::new(),
            lose_poll: None,
            state: GameState::Playing,
            next_agent: 0,
            wave_scratch: Vec::new(),
        }
    }

    fn load_level(&mut self, layout: &LevelLayout, out_events: &mut Vec<Event>) {
        self.teardown();

        self.grid = Grid::from_rows(layout.rows());
        let (lanes, agents) = LaneQueues::populate(layout.lanes(), &mut self.next_agent);
        self.lanes = lanes;
        self.agents = agents;
        self.slots = SlotAllocator::new(self.tuning.slot_count);
        self.state = GameState::Playing;

        let (lanes, rows) = self.grid.dimensions();
        info!(lanes, rows, agents = self.agents.len(), "level_loaded");
        out_events.push(Event::LevelLoaded {
            lanes,
            rows,
            slots: self.slots.capacity(),
        });

        for lane in 0..self.lanes.lane_count() {
            self.reveal_front(lane, out_events);
        }
    }

    /// Cancels every scheduled task and returns borrowed instances to the pool.
    fn teardown(&mut self) {
        self.timeline.clear();
        self.lose_poll = None;
        self.impulses.clear();

        for projectile in self.projectiles.drain() {
            self.grid.release_reservation(projectile.target);
            self.pool.release(PoolKind::Projectile, projectile.instance);
        }
        for (_, instance) in std::mem::take(&mut self.effects) {
            self.pool.release(PoolKind::Effect, instance);
        }
    }

    fn reveal_front(&mut self, lane: u32, out_events: &mut Vec<Event>) {
        let Some(front) = self.lanes.front(lane) else {
            return;
        };
        let Some(agent) = self.agents.get_mut(&front) else {
            return;
        };
        agent.concealed = false;
        out_events.push(Event::AgentRevealed {
            agent: front,
            lane,
            color: agent.color,
            ammo: agent.ammo,
        });
    }

    fn request_dock(&mut self, lane: u32, out_events: &mut Vec<Event>) {
        let Some(front) = self.lanes.front(lane) else {
            warn!(lane, "dock_request_for_empty_lane");
            return;
        };
        let Some(phase) = self.agents.get(&front).map(|agent| agent.phase) else {
            return;
        };
        if phase != AgentPhase::Queued {
            warn!(lane, agent = front.get(), ?phase, "duplicate_dock_request");
            return;
        }

        if self.dock(front, out_events) {
            return;
        }

        if self.slots.defer(front) {
            if let Some(agent) = self.agents.get_mut(&front) {
                agent.phase = AgentPhase::AwaitingSlot;
            }
            debug!(lane, agent = front.get(), "dock_deferred");
            out_events.push(Event::DockDeferred { agent: front, lane });
        }
    }

    /// Assigns the first free slot to the agent. Returns `false` when none is free.
    fn dock(&mut self, id: AgentId, out_events: &mut Vec<Event>) -> bool {
        let Some(slot) = self.slots.try_dock(id) else {
            return false;
        };
        let Some(agent) = self.agents.get_mut(&id) else {
            let _ = self.slots.release(slot);
            return false;
        };

        agent.phase = AgentPhase::Docking;
        agent.slot = Some(slot);
        let lane = agent.lane;
        let _ = self
            .timeline
            .after(self.tuning.dock_travel, WorldTask::DockArrival { agent: id });
        out_events.push(Event::AgentDocked {
            agent: id,
            slot,
            lane,
        });

        if self.slots.all_occupied() {
            self.start_lose_poll();
        }
        true
    }

    fn start_lose_poll(&mut self) {
        if self.lose_poll.is_none() {
            debug!("lose_poll_started");
            self.lose_poll = Some(
                self.timeline
                    .every(self.tuning.lose_poll_interval, WorldTask::LosePoll),
            );
        }
    }

    fn stop_lose_poll(&mut self) {
        if let Some(handle) = self.lose_poll.take() {
            debug!("lose_poll_stopped");
            let _ = self.timeline.cancel(handle);
        }
    }

    fn fire(&mut self, id: AgentId, target: CellId, out_events: &mut Vec<Event>) {
        let Some(agent) = self.agents.get(&id) else {
            warn!(agent = id.get(), "fire_from_unknown_agent");
            return;
        };
        let Some(slot) = agent.slot.filter(|_| {
            agent.phase == AgentPhase::Scanning && agent.ammo > 0
        }) else {
            warn!(agent = id.get(), phase = ?agent.phase, ammo = agent.ammo, "fire_rejected");
            return;
        };

        let color = agent.color;
        let coord = match self.grid.snapshot(target) {
            Some(cell)
                if cell.active
                    && !cell.reserved
                    && cell.coord.row() == 0
                    && cell.color == color =>
            {
                cell.coord
            }
            _ => {
                debug!(agent = id.get(), cell = target.get(), "stale_target");
                self.back_off(id);
                return;
            }
        };
        if !self.grid.reserve(target) {
            self.back_off(id);
            return;
        }

        let instance = self.pool.acquire(PoolKind::Projectile);
        let projectile = self.projectiles.launch(Projectile {
            agent: id,
            target,
            instance,
        });
        let (lanes, _) = self.grid.dimensions();
        let travel = travel_time(&self.tuning, lanes, slot, coord);
        let _ = self
            .timeline
            .after(travel, WorldTask::ProjectileArrival { projectile });

        let effect = self.pool.acquire(PoolKind::Effect);
        let expiry = self
            .timeline
            .after(self.tuning.effect_lifetime, WorldTask::EffectExpired);
        let _ = self.effects.insert(expiry, effect);

        let _ = self
            .timeline
            .after(self.tuning.fire_interval, WorldTask::FireCooldown { agent: id });
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.ammo -= 1;
            agent.phase = AgentPhase::Firing;
        }

        out_events.push(Event::ProjectileFired {
            projectile,
            agent: id,
            target,
            coord,
        });
    }

    fn hold_fire(&mut self, id: AgentId) {
        match self.agents.get(&id).map(|agent| agent.phase) {
            Some(AgentPhase::Scanning) => self.back_off(id),
            phase => warn!(agent = id.get(), ?phase, "hold_fire_rejected"),
        }
    }

    fn back_off(&mut self, id: AgentId) {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.phase = AgentPhase::Idle;
            let _ = self
                .timeline
                .after(self.tuning.scan_backoff, WorldTask::ScanBackoff { agent: id });
        }
    }

    /// Moves an agent into the scanning phase, or toward the exit once it ran dry.
    fn resume(&mut self, id: AgentId, expected: AgentPhase, out_events: &mut Vec<Event>) {
        let Some(agent) = self.agents.get_mut(&id) else {
            debug!(agent = id.get(), "stale_agent_task");
            return;
        };
        if agent.phase != expected {
            debug!(agent = id.get(), phase = ?agent.phase, "stale_agent_task");
            return;
        }

        if agent.ammo == 0 {
            self.begin_exit(id, out_events);
            return;
        }
        agent.phase = AgentPhase::Scanning;
        out_events.push(Event::AgentReady {
            agent: id,
            color: agent.color,
        });
    }

    fn begin_exit(&mut self, id: AgentId, out_events: &mut Vec<Event>) {
        let Some(agent) = self.agents.get_mut(&id) else {
            return;
        };
        agent.phase = AgentPhase::Exiting;
        let lane = agent.lane;
        let released = agent.slot.take();

        if let Some(slot) = released {
            if self.slots.release(slot) == Some(id) {
                out_events.push(Event::SlotReleased { slot, agent: id });
            } else {
                warn!(agent = id.get(), slot = slot.get(), "release_of_unoccupied_slot");
            }
            self.stop_lose_poll();
        }

        let _ = self
            .timeline
            .after(self.tuning.exit_travel, WorldTask::ExitComplete { agent: id });

        if let Some(front) = self.lanes.advance(lane, id) {
            out_events.push(Event::LaneAdvanced { lane, front });
            self.reveal_front(lane, out_events);
        }

        if released.is_some() {
            self.offer_slot(out_events);
        }
    }

    /// Hands a freed slot to the longest-waiting dock request.
    fn offer_slot(&mut self, out_events: &mut Vec<Event>) {
        while let Some(candidate) = self.slots.next_waiting() {
            let waiting = self
                .agents
                .get(&candidate)
                .is_some_and(|agent| agent.phase == AgentPhase::AwaitingSlot);
            if !waiting {
                continue;
            }
            if !self.dock(candidate, out_events) {
                warn!(agent = candidate.get(), "waiting_agent_not_docked");
            }
            break;
        }
    }

    fn land(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let Some(landed) = self.projectiles.land(projectile) else {
            debug!(projectile = projectile.get(), "stale_projectile");
            return;
        };
        self.pool.release(PoolKind::Projectile, landed.instance);

        if self.grid.is_active(landed.target) {
            self.hit(landed.target, out_events);
        } else {
            debug!(
                projectile = projectile.get(),
                agent = landed.agent.get(),
                "projectile_missed"
            );
            out_events.push(Event::ProjectileMissed {
                projectile,
                target: landed.target,
            });
        }
    }

    /// Clears the cell, collapses its lane and schedules the wave.
    fn hit(&mut self, cell: CellId, out_events: &mut Vec<Event>) {
        let (coord, color) = match self.grid.clear(cell) {
            ClearOutcome::Cleared { coord, color } => (coord, color),
            ClearOutcome::AlreadyCleared => {
                warn!(cell = cell.get(), "duplicate_hit");
                return;
            }
            ClearOutcome::Unknown => {
                warn!(cell = cell.get(), "hit_on_unknown_cell");
                return;
            }
        };

        if let Some(handles) = self.impulses.remove(&cell) {
            for handle in handles {
                let _ = self.timeline.cancel(handle);
            }
        }
        out_events.push(Event::CellHit { cell, coord, color });

        let lane = coord.lane();
        let snapshots = self.grid.lane_snapshots(lane);
        self.wave.plan(&snapshots, coord.row(), &mut self.wave_scratch);

        let active = self.grid.collapse_lane(lane, coord.row());
        out_events.push(Event::LaneCollapsed { lane, active });

        for impulse in &self.wave_scratch {
            let handle = self.timeline.after(
                impulse.delay,
                WorldTask::WaveImpulse {
                    cell: impulse.cell,
                    amplitude: impulse.amplitude,
                },
            );
            self.impulses.entry(impulse.cell).or_default().push(handle);
        }
    }

    fn run_task(&mut self, handle: TaskHandle, task: WorldTask, out_events: &mut Vec<Event>) {
        match task {
            WorldTask::DockArrival { agent } => {
                self.resume(agent, AgentPhase::Docking, out_events);
            }
            WorldTask::FireCooldown { agent } => {
                self.resume(agent, AgentPhase::Firing, out_events);
            }
            WorldTask::ScanBackoff { agent } => {
                self.resume(agent, AgentPhase::Idle, out_events);
            }
            WorldTask::ProjectileArrival { projectile } => self.land(projectile, out_events),
            WorldTask::WaveImpulse { cell, amplitude } => {
                if let Some(handles) = self.impulses.get_mut(&cell) {
                    handles.retain(|pending| *pending != handle);
                    if handles.is_empty() {
                        let _ = self.impulses.remove(&cell);
                    }
                }
                match self.grid.snapshot(cell) {
                    Some(snapshot) if snapshot.active => {
                        out_events.push(Event::WaveImpulseFired {
                            cell,
                            coord: snapshot.coord,
                            amplitude,
                        });
                    }
                    _ => debug!(cell = cell.get(), "wave_impulse_skipped"),
                }
            }
            WorldTask::ExitComplete { agent } => {
                if self.agents.remove(&agent).is_some() {
                    out_events.push(Event::AgentExited { agent });
                }
            }
            WorldTask::EffectExpired => {
                if let Some(instance) = self.effects.remove(&handle) {
                    self.pool.release(PoolKind::Effect, instance);
                }
            }
            WorldTask::LosePoll => out_events.push(Event::LosePollElapsed),
        }
    }

    fn resolve(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if !state.is_terminal() {
            warn!(?state, "resolve_to_non_terminal_state");
            return;
        }

        self.state = state;
        self.teardown();
        info!(?state, "game_resolved");
        out_events.push(Event::GameStateChanged { state });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game reached a terminal state only [`Command::LoadLevel`] and
/// [`Command::Tick`] have an effect.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.state.is_terminal()
        && !matches!(command, Command::LoadLevel { .. } | Command::Tick { .. })
    {
        debug!(?command, "command_ignored_after_resolution");
        return;
    }

    match command {
        Command::LoadLevel { layout } => world.load_level(&layout, out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            let until = world.timeline.now().saturating_add(dt);
            while let Some((handle, task)) = world.timeline.pop_due(until) {
                world.run_task(handle, task, out_events);
            }
            world.timeline.advance_to(until);
        }
        Command::RequestDock { lane } => world.request_dock(lane, out_events),
        Command::FireProjectile { agent, target } => world.fire(agent, target, out_events),
        Command::HoldFire { agent } => world.hold_fire(agent),
        Command::ApplyHit { cell } => world.hit(cell, out_events),
        Command::ResolveGame { state } => world.resolve(state, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use lane_blast_core::{
        AgentId, AgentSnapshot, CellCoord, CellSnapshot, GameState, GridView, LaneView,
        SlotId, SlotOccupant, SlotView, Tuning,
    };

    /// Current game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Position of the simulation clock.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.timeline.now()
    }

    /// Captures a read-only view of every grid cell.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView {
        let (lanes, rows) = world.grid.dimensions();
        GridView::from_snapshots(lanes, rows, world.grid.snapshots())
    }

    /// Snapshot of the cell at the coordinate, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(world: &World, coord: CellCoord) -> Option<CellSnapshot> {
        world
            .grid
            .cell_at(coord)
            .and_then(|id| world.grid.snapshot(id))
    }

    /// Captures a read-only view of the docking slots, including how many
    /// shots are still in flight.
    #[must_use]
    pub fn slot_view(world: &World) -> SlotView {
        let slots = (0..world.slots.capacity())
            .map(|index| {
                world
                    .slots
                    .occupant(SlotId::new(index))
                    .and_then(|id| world.agents.get(&id))
                    .map(|agent| SlotOccupant {
                        agent: agent.id,
                        color: agent.color,
                        ammo: agent.ammo,
                    })
            })
            .collect();
        SlotView::from_slots(slots).with_shots_in_flight(world.projectiles.len())
    }

    /// Number of agent lanes on the board.
    #[must_use]
    pub fn lane_count(world: &World) -> u32 {
        world.lanes.lane_count()
    }

    /// Captures the queue of one lane, front first. Unknown lanes are empty.
    #[must_use]
    pub fn lane_view(world: &World, lane: u32) -> LaneView {
        let agents = world
            .lanes
            .agents(lane)
            .filter_map(|id| agent(world, id))
            .collect();
        LaneView::from_snapshots(agents)
    }

    /// Snapshot of one agent, including agents walking to the exit.
    #[must_use]
    pub fn agent(world: &World, id: AgentId) -> Option<AgentSnapshot> {
        world
            .agents
            .get(&id)
            .map(|agent| agent.snapshot(world.lanes.position(agent.lane, id)))
    }

    /// Snapshots of every agent on the board sorted by identifier.
    #[must_use]
    pub fn agents(world: &World) -> Vec<AgentSnapshot> {
        world
            .agents
            .values()
            .map(|agent| agent.snapshot(world.lanes.position(agent.lane, agent.id)))
            .collect()
    }

    /// Agents waiting for a slot, longest-waiting first.
    #[must_use]
    pub fn waiting_agents(world: &World) -> Vec<AgentId> {
        world.slots.waiting().collect()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn projectiles_in_flight(world: &World) -> usize {
        world.projectiles.len()
    }

    /// Number of transient effects that have not expired.
    #[must_use]
    pub fn live_effects(world: &World) -> usize {
        world.effects.len()
    }

    /// Number of wave impulses that have not fired.
    #[must_use]
    pub fn pending_impulses(world: &World) -> usize {
        world.impulses.values().map(Vec::len).sum()
    }

    /// Due time of the earliest task on the world's timeline.
    #[must_use]
    pub fn next_due(world: &World) -> Option<Duration> {
        world.timeline.next_due()
    }

    /// Number of tasks on the world's timeline.
    #[must_use]
    pub fn scheduled_tasks(world: &World) -> usize {
        world.timeline.len()
    }

    /// Reports whether the lose condition is being polled.
    #[must_use]
    pub fn lose_poll_active(world: &World) -> bool {
        world.lose_poll.is_some()
    }
}
