use std::ops::{Index, IndexMut};

use rand::Rng;
use serde::Serialize;

use super::config::TerritoryConfig;
use super::powerups::PowerUpManager;

/// A position on the game grid
///
/// (0,0) is the top-left corner,
/// x increases to the right, y increases downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// One of the two fixed match participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgentId {
    Blue,
    Green,
}

impl AgentId {
    pub const BOTH: [AgentId; 2] = [AgentId::Blue, AgentId::Green];

    pub fn opponent(self) -> AgentId {
        match self {
            AgentId::Blue => AgentId::Green,
            AgentId::Green => AgentId::Blue,
        }
    }
}

/// A value held once per agent, indexable by `AgentId`.
///
/// A two-field struct instead of a map keyed by agent: lookups cannot miss
/// and a new agent variant forces every use site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerAgent<T> {
    pub blue: T,
    pub green: T,
}

impl<T> PerAgent<T> {
    pub fn new(blue: T, green: T) -> Self {
        Self { blue, green }
    }
}

impl<T> Index<AgentId> for PerAgent<T> {
    type Output = T;

    fn index(&self, id: AgentId) -> &T {
        match id {
            AgentId::Blue => &self.blue,
            AgentId::Green => &self.green,
        }
    }
}

impl<T> IndexMut<AgentId> for PerAgent<T> {
    fn index_mut(&mut self, id: AgentId) -> &mut T {
        match id {
            AgentId::Blue => &mut self.blue,
            AgentId::Green => &mut self.green,
        }
    }
}

/// Cell ownership for the whole grid.
///
/// Single source of truth for territory control; only the movement resolver
/// writes to it during a match.
pub struct OwnershipGrid {
    /// Side length of the square grid
    size: u32,
    /// Ownership data: None = unclaimed, Some(id) = owned by that agent
    cells: Vec<Option<AgentId>>,
}

impl OwnershipGrid {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![None; (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn in_bounds(&self, pos: &GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.size && (pos.y as u32) < self.size
    }

    fn pos_to_index(&self, pos: &GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y as u32 * self.size + pos.x as u32) as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: &GridPos) -> Option<AgentId> {
        self.pos_to_index(pos).and_then(|idx| self.cells[idx])
    }

    pub fn set(&mut self, pos: &GridPos, owner: Option<AgentId>) {
        if let Some(idx) = self.pos_to_index(pos) {
            self.cells[idx] = owner;
        }
    }

    pub fn count_owned_by(&self, id: AgentId) -> usize {
        self.cells.iter().filter(|&&c| c == Some(id)).count()
    }

    /// Row-major ownership data, `y * size + x` indexing.
    pub fn cells(&self) -> &[Option<AgentId>] {
        &self.cells
    }
}

impl std::fmt::Debug for OwnershipGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipGrid")
            .field("size", &self.size)
            .field(
                "claimed_cells",
                &self.cells.iter().filter(|c| c.is_some()).count(),
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    /// Current position on the grid
    pub position: GridPos,
    /// Net territory score, floored at zero
    pub score: u32,
    /// Tick at which the current freeze effect ends (0 = never frozen)
    pub frozen_until: u64,
    /// Display color (RGBA packed as u32), kept for customization only
    pub color: u32,
}

impl Agent {
    pub fn new(position: GridPos, color: u32) -> Self {
        Self {
            position,
            score: 1,
            frozen_until: 0,
            color,
        }
    }

    pub fn is_frozen(&self, now: u64) -> bool {
        self.frozen_until > now
    }

    pub fn frozen_ticks_left(&self, now: u64) -> u64 {
        self.frozen_until.saturating_sub(now)
    }
}

/// Elapsed-time tracking for one Playing session.
///
/// Reads the game's monotonic tick counter; never reset mid-match.
#[derive(Debug, Clone, Copy)]
pub struct MatchClock {
    epoch: u64,
}

impl MatchClock {
    pub fn start(now: u64) -> Self {
        Self { epoch: now }
    }

    pub fn elapsed_ticks(&self, now: u64) -> u64 {
        now.saturating_sub(self.epoch)
    }

    pub fn is_expired(&self, now: u64, limit_ticks: u64) -> bool {
        self.elapsed_ticks(now) >= limit_ticks
    }
}

/// All mutable state of one match. Built fresh on every transition into
/// Playing and dropped on the way out, so nothing leaks across resets.
#[derive(Debug)]
pub struct MatchState {
    pub grid: OwnershipGrid,
    pub agents: PerAgent<Agent>,
    pub power_ups: PowerUpManager,
    pub clock: MatchClock,
}

impl MatchState {
    /// Set up the starting position: agents at opposite corners, each owning
    /// its start cell with score 1, and 2-3 initial power-up spawn attempts.
    pub fn new<R: Rng>(
        config: &TerritoryConfig,
        colors: PerAgent<u32>,
        now: u64,
        rng: &mut R,
    ) -> Self {
        let size = config.grid_size as i32;
        let blue_start = GridPos::new(1, 1);
        let green_start = GridPos::new(size - 2, size - 2);

        let mut grid = OwnershipGrid::new(config.grid_size);
        grid.set(&blue_start, Some(AgentId::Blue));
        grid.set(&green_start, Some(AgentId::Green));

        let agents = PerAgent::new(
            Agent::new(blue_start, colors.blue),
            Agent::new(green_start, colors.green),
        );

        let mut power_ups = PowerUpManager::new(config, now);
        for _ in 0..rng.gen_range(2..=3) {
            power_ups.try_spawn(&grid, &agents, rng);
        }

        Self {
            grid,
            agents,
            power_ups,
            clock: MatchClock::start(now),
        }
    }
}
