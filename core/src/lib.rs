#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Blast engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to deterministically. Systems consume event
//! streams, query immutable views, and respond exclusively with new command
//! batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid, agents, slots and game state with a fresh level.
    LoadLevel {
        /// Validated layout describing the grid colors and the agent board.
        layout: LevelLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the front agent of a lane docks into a free slot.
    RequestDock {
        /// Lane whose front agent should dock.
        lane: u32,
    },
    /// Requests that a scanning agent fires at the provided cell.
    FireProjectile {
        /// Agent that fires the projectile.
        agent: AgentId,
        /// Cell selected as the projectile's target.
        target: CellId,
    },
    /// Reports that a scanning agent found no target and should back off.
    HoldFire {
        /// Agent that found nothing to shoot at.
        agent: AgentId,
    },
    /// Applies a main-target hit directly to a cell.
    ApplyHit {
        /// Identity of the cell to hit.
        cell: CellId,
    },
    /// Requests a terminal transition of the game state.
    ResolveGame {
        /// Terminal state that should become active.
        state: GameState,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a level was loaded and every previous entity torn down.
    LevelLoaded {
        /// Number of lanes (grid columns) in the level.
        lanes: u32,
        /// Number of rows in every lane.
        rows: u32,
        /// Number of docking slots available to agents.
        slots: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a main-target hit cleared a cell.
    CellHit {
        /// Identifier of the cleared cell.
        cell: CellId,
        /// Position the cell occupied when it was hit.
        coord: CellCoord,
        /// Color of the cleared cell.
        color: Color,
    },
    /// Announces that a lane shifted its remaining cells toward the front.
    LaneCollapsed {
        /// Lane that collapsed.
        lane: u32,
        /// Number of active cells left in the lane.
        active: u32,
    },
    /// Announces that a wave impulse reached a still-active cell.
    WaveImpulseFired {
        /// Identifier of the cell that received the impulse.
        cell: CellId,
        /// Position of the cell when the impulse arrived.
        coord: CellCoord,
        /// Strength of the impulse.
        amplitude: Amplitude,
    },
    /// Announces that an agent reached the front of its lane and is visible.
    AgentRevealed {
        /// Agent that became the lane front.
        agent: AgentId,
        /// Lane the agent waits in.
        lane: u32,
        /// Color of the agent's projectiles.
        color: Color,
        /// Remaining ammunition.
        ammo: u32,
    },
    /// Confirms that an agent was assigned a docking slot.
    AgentDocked {
        /// Agent that docked.
        agent: AgentId,
        /// Slot the agent occupies.
        slot: SlotId,
        /// Lane the agent belongs to.
        lane: u32,
    },
    /// Reports that a dock request waits in the pre-dock queue for a free slot.
    DockDeferred {
        /// Agent waiting for a slot.
        agent: AgentId,
        /// Lane the agent belongs to.
        lane: u32,
    },
    /// Signals that a docked agent is ready to scan for a target.
    AgentReady {
        /// Agent ready to scan.
        agent: AgentId,
        /// Color the agent is able to shoot.
        color: Color,
    },
    /// Confirms that a projectile left an agent.
    ProjectileFired {
        /// Identifier of the projectile in flight.
        projectile: ProjectileId,
        /// Agent that fired.
        agent: AgentId,
        /// Cell the projectile travels toward.
        target: CellId,
        /// Position of the target when the projectile was fired.
        coord: CellCoord,
    },
    /// Reports that a projectile reached a target that was no longer active.
    ProjectileMissed {
        /// Identifier of the projectile that missed.
        projectile: ProjectileId,
        /// Cell the projectile was aimed at.
        target: CellId,
    },
    /// Confirms that an exhausted agent left its slot.
    SlotReleased {
        /// Slot that became free.
        slot: SlotId,
        /// Agent that left the slot.
        agent: AgentId,
    },
    /// Announces that a lane queue shifted forward by one position.
    LaneAdvanced {
        /// Lane that advanced.
        lane: u32,
        /// New front agent, if the lane still holds agents.
        front: Option<AgentId>,
    },
    /// Confirms that an agent finished its exit traversal and was removed.
    AgentExited {
        /// Agent that left the board.
        agent: AgentId,
    },
    /// Periodic signal emitted while every slot is occupied.
    LosePollElapsed,
    /// Announces a game state transition.
    GameStateChanged {
        /// Newly active state.
        state: GameState,
    },
}

/// Colors shared by grid cells and agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Red, level code `R`.
    Red,
    /// Blue, level code `B`.
    Blue,
    /// Green, level code `G`.
    Green,
    /// Yellow, level code `Y`.
    Yellow,
    /// Orange, level code `O`.
    Orange,
}

impl Color {
    /// Every color in code order.
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
    ];

    /// Parses a single-letter level code.
    ///
    /// Unknown or empty codes fall back to [`Color::Red`] so that a typo in a
    /// level file never prevents it from loading.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "B" => Self::Blue,
            "G" => Self::Green,
            "Y" => Self::Yellow,
            "O" => Self::Orange,
            _ => Self::Red,
        }
    }

    /// Single-letter code used by level files.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Blue => 'B',
            Self::Green => 'G',
            Self::Yellow => 'Y',
            Self::Orange => 'O',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Location of a grid cell expressed as lane and row.
///
/// Row zero is the front row that agents shoot at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    lane: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(lane: u32, row: u32) -> Self {
        Self { lane, row }
    }

    /// Zero-based lane (column) index.
    #[must_use]
    pub const fn lane(&self) -> u32 {
        self.lane
    }

    /// Zero-based row index, zero being the front.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Stable identity of a grid cell within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a shooter agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a docking slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle identifying a scheduled task so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Creates a new task handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Fixed-point scale applied to [`Amplitude`] values.
pub const AMPLITUDE_FIXED_POINT_SCALE: u32 = 1 << 16;

/// Strength of a hit impulse stored as a fixed-point fraction of unit amplitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amplitude(u32);

impl Amplitude {
    /// Full-strength impulse delivered by a main-target hit.
    pub const UNIT: Amplitude = Amplitude(AMPLITUDE_FIXED_POINT_SCALE);

    /// Creates an amplitude from its raw fixed-point representation.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Quantises a floating-point amplitude. Negative and NaN inputs map to zero.
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        if !(value > 0.0) {
            return Self(0);
        }
        let scaled = f64::from(value) * f64::from(AMPLITUDE_FIXED_POINT_SCALE);
        Self(scaled.round().min(f64::from(u32::MAX)) as u32)
    }

    /// Raw fixed-point representation.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Floating-point view of the amplitude.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / AMPLITUDE_FIXED_POINT_SCALE as f32
    }
}

/// Overall state of a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The level is in progress.
    #[default]
    Playing,
    /// Every cell was cleared.
    Won,
    /// Every slot is occupied and no agent can make a legal shot.
    Lost,
}

impl GameState {
    /// Reports whether the state accepts no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Lifecycle phase of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentPhase {
    /// Waiting in its lane queue, not docked.
    Queued,
    /// Front agent whose dock request waits for a free slot.
    AwaitingSlot,
    /// Walking toward its assigned slot.
    Docking,
    /// Docked and looking for a target.
    Scanning,
    /// Docked, found no target and waits before rescanning.
    Idle,
    /// Fired and waits for the fire-rate interval to elapse.
    Firing,
    /// Out of ammunition and walking to the exit.
    Exiting,
}

impl AgentPhase {
    /// Reports whether the agent currently occupies a slot.
    #[must_use]
    pub const fn is_docked(self) -> bool {
        matches!(
            self,
            Self::Docking | Self::Scanning | Self::Idle | Self::Firing
        )
    }
}

/// Description of a single agent in a level's agent board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Color of the agent's projectiles.
    pub color: Color,
    /// Number of projectiles the agent carries.
    pub ammo: u32,
    /// Whether color and ammo stay concealed until the agent reaches the front.
    pub hidden: bool,
}

/// Validated level data consumed by [`Command::LoadLevel`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelLayout {
    rows: Vec<Vec<Color>>,
    lanes: Vec<Vec<AgentSpec>>,
}

impl LevelLayout {
    /// Creates a layout from grid rows (front row first) and lane queues.
    ///
    /// Callers are expected to provide rectangular rows; the world's level
    /// loader enforces this before constructing a layout.
    #[must_use]
    pub fn new(rows: Vec<Vec<Color>>, lanes: Vec<Vec<AgentSpec>>) -> Self {
        Self { rows, lanes }
    }

    /// Grid rows, row zero first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Color>] {
        &self.rows
    }

    /// Agent queues, one per lane, front agent first.
    #[must_use]
    pub fn lanes(&self) -> &[Vec<AgentSpec>] {
        &self.lanes
    }

    /// Number of grid lanes (columns).
    #[must_use]
    pub fn width(&self) -> u32 {
        self.rows.first().map_or(0, |row| row.len() as u32)
    }

    /// Number of grid rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// Immutable representation of a single cell used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    /// Stable identity of the cell.
    pub id: CellId,
    /// Current position of the cell.
    pub coord: CellCoord,
    /// Color of the cell.
    pub color: Color,
    /// Whether the cell is still part of the grid.
    pub active: bool,
    /// Whether a projectile is already on its way to the cell.
    pub reserved: bool,
}

/// Read-only snapshot describing every cell of the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridView {
    lanes: u32,
    rows: u32,
    cells: Vec<CellSnapshot>,
}

impl GridView {
    /// Creates a view from lane-major snapshots (`lane * rows + row`).
    #[must_use]
    pub fn from_snapshots(lanes: u32, rows: u32, cells: Vec<CellSnapshot>) -> Self {
        debug_assert_eq!(cells.len(), (lanes as usize) * (rows as usize));
        Self { lanes, rows, cells }
    }

    /// Provides the `(lanes, rows)` dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.lanes, self.rows)
    }

    /// Returns the snapshot at the coordinate, or `None` when out of range.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&CellSnapshot> {
        if coord.lane() >= self.lanes || coord.row() >= self.rows {
            return None;
        }
        let index = coord.lane() as usize * self.rows as usize + coord.row() as usize;
        self.cells.get(index)
    }

    /// Cells of one lane ordered from the front row upward.
    #[must_use]
    pub fn lane(&self, lane: u32) -> Option<&[CellSnapshot]> {
        if lane >= self.lanes {
            return None;
        }
        let rows = self.rows as usize;
        let start = lane as usize * rows;
        self.cells.get(start..start + rows)
    }

    /// Iterator over the front row, one entry per lane in lane order.
    pub fn front_row(&self) -> impl Iterator<Item = &CellSnapshot> + '_ {
        (0..self.lanes).filter_map(move |lane| self.cell(CellCoord::new(lane, 0)))
    }

    /// Iterator over every cell in lane-major order.
    pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
        self.cells.iter()
    }

    /// Counts the active cells across the grid.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.active).count()
    }

    /// Reports whether every cell was cleared.
    ///
    /// An empty grid never counts as cleared, so a level that failed to load
    /// cannot be won.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|cell| !cell.active)
    }

    /// Reports whether an active front-row cell has the provided color.
    #[must_use]
    pub fn front_row_has(&self, color: Color) -> bool {
        self.front_row().any(|cell| cell.active && cell.color == color)
    }
}

/// Agent currently occupying a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotOccupant {
    /// Agent in the slot.
    pub agent: AgentId,
    /// Color of the agent's projectiles.
    pub color: Color,
    /// Remaining ammunition.
    pub ammo: u32,
}

/// Read-only snapshot of the docking slots and the shots they have in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotView {
    slots: Vec<Option<SlotOccupant>>,
    shots_in_flight: usize,
}

impl SlotView {
    /// Creates a view from per-slot occupancy in slot order.
    #[must_use]
    pub fn from_slots(slots: Vec<Option<SlotOccupant>>) -> Self {
        Self {
            slots,
            shots_in_flight: 0,
        }
    }

    /// Records the number of projectiles that have not landed yet.
    #[must_use]
    pub fn with_shots_in_flight(mut self, shots: usize) -> Self {
        self.shots_in_flight = shots;
        self
    }

    /// Number of projectiles that have not landed yet.
    #[must_use]
    pub fn shots_in_flight(&self) -> usize {
        self.shots_in_flight
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupant of the slot, or `None` when free or out of range.
    #[must_use]
    pub fn occupant(&self, slot: SlotId) -> Option<&SlotOccupant> {
        self.slots.get(slot.get() as usize).and_then(Option::as_ref)
    }

    /// Iterator over occupied slots in slot order.
    pub fn occupants(&self) -> impl Iterator<Item = &SlotOccupant> {
        self.slots.iter().flatten()
    }

    /// Number of free slots.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Reports whether every slot is occupied. A pool without slots is never full.
    #[must_use]
    pub fn all_occupied(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Option::is_some)
    }
}

/// Immutable representation of a single agent used for queries.
///
/// Hidden agents withhold their color and ammunition until they reach the
/// front of their lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentSnapshot {
    /// Identifier of the agent.
    pub id: AgentId,
    /// Lane the agent belongs to.
    pub lane: u32,
    /// Position inside the lane queue, zero being the front; `None` once exiting.
    pub position: Option<u32>,
    /// Color of the agent, `None` while concealed.
    pub color: Option<Color>,
    /// Remaining ammunition, `None` while concealed.
    pub ammo: Option<u32>,
    /// Lifecycle phase.
    pub phase: AgentPhase,
    /// Slot occupied by the agent, if docked.
    pub slot: Option<SlotId>,
}

/// Read-only snapshot of one lane queue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaneView {
    agents: Vec<AgentSnapshot>,
}

impl LaneView {
    /// Creates a view from agents ordered front first.
    #[must_use]
    pub fn from_snapshots(agents: Vec<AgentSnapshot>) -> Self {
        Self { agents }
    }

    /// Front agent of the lane, if any.
    #[must_use]
    pub fn front(&self) -> Option<&AgentSnapshot> {
        self.agents.first()
    }

    /// Iterator over the lane's agents, front first.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.agents.iter()
    }

    /// Number of agents in the lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Reports whether the lane holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Parameters controlling wave propagation after a main-target hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTuning {
    /// Delay added per step of the walk up the lane.
    pub base_delay: Duration,
    /// Amplitude carried by the main hit; impulse k receives `base * decay^k`.
    pub base_amplitude: f32,
    /// Multiplicative decay applied per step.
    pub decay: f32,
    /// Propagation stops before an impulse whose amplitude would drop below this.
    pub cutoff: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(30),
            base_amplitude: 1.0,
            decay: 0.5,
            cutoff: 0.05,
        }
    }
}

/// Aggregated timing and geometry knobs for a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Number of docking slots shared by every lane.
    pub slot_count: u32,
    /// Wait between two shots of the same agent.
    pub fire_interval: Duration,
    /// Wait before an agent rescans after finding no target.
    pub scan_backoff: Duration,
    /// Time an agent needs to walk into its slot.
    pub dock_travel: Duration,
    /// Time an exhausted agent needs to leave the board.
    pub exit_travel: Duration,
    /// Interval between lose-condition checks while every slot is occupied.
    pub lose_poll_interval: Duration,
    /// Lifetime of the transient muzzle effect spawned per shot.
    pub effect_lifetime: Duration,
    /// Projectile speed in cells per second.
    pub projectile_speed: f32,
    /// Horizontal distance between neighbouring slots, in cells.
    pub slot_spacing: f32,
    /// Distance between the slot row and grid row zero, in cells.
    pub slot_distance: f32,
    /// Wave propagation parameters.
    pub wave: WaveTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            slot_count: 5,
            fire_interval: Duration::from_millis(100),
            scan_backoff: Duration::from_millis(100),
            dock_travel: Duration::from_millis(250),
            exit_travel: Duration::from_millis(500),
            lose_poll_interval: Duration::from_millis(300),
            effect_lifetime: Duration::from_millis(500),
            projectile_speed: 20.0,
            slot_spacing: 1.5,
            slot_distance: 4.0,
            wave: WaveTuning::default(),
        }
    }
}

/// Single logical timeline that issues delayed and periodic callbacks.
///
/// Tasks are plain data; the owner decides what a fired task means.
pub trait Scheduler<T> {
    /// Current position of the timeline.
    fn now(&self) -> Duration;

    /// Schedules `task` to fire once after `delay`.
    fn after(&mut self, delay: Duration, task: T) -> TaskHandle;

    /// Schedules `task` to fire every `interval`, first after one interval.
    fn every(&mut self, interval: Duration, task: T) -> TaskHandle;

    /// Cancels a scheduled task. Returns `false` when the handle was unknown.
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

/// Kinds of transient objects borrowed from the host's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoolKind {
    /// Projectile body.
    Projectile,
    /// Short-lived visual effect.
    Effect,
}

/// Opaque instance handed out by a [`ResourcePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PooledInstance(u32);

impl PooledInstance {
    /// Wraps a pool-specific instance number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the pool-specific instance number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Pool service that owns projectile and effect instances.
pub trait ResourcePool: fmt::Debug {
    /// Borrows an instance of the provided kind.
    fn acquire(&mut self, kind: PoolKind) -> PooledInstance;

    /// Returns a borrowed instance to the pool.
    fn release(&mut self, kind: PoolKind, instance: PooledInstance);
}
