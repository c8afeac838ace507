use std::time::Duration;

use serde::Serialize;

/// Who controls each agent for the match.
///
/// Blue is the human seat in `HumanVsAi`; both seats are scripted in `AiVsAi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    HumanVsAi,
    AiVsAi,
}

/// Difficulty drives the AI move cadence and its smartness probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Normal,
    Hard,
}

impl Difficulty {
    /// AI moves per 60 ticks. The cadence threshold is `tick_rate / speed`.
    pub fn agent_speed(self) -> u32 {
        match self {
            Difficulty::Normal => 7,
            Difficulty::Hard => 12,
        }
    }

    /// Probability of the heuristic taking its "smart" branch.
    pub fn smartness(self) -> f64 {
        match self {
            Difficulty::Normal => 0.7,
            Difficulty::Hard => 0.9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerritoryConfig {
    /// Side length of the square grid in cells
    pub grid_size: u32,
    /// Simulation tick rate in Hz (ticks per second)
    pub tick_rate_hz: u32,
    /// Match length in seconds
    pub time_limit_secs: u64,
    /// Maximum number of live power-ups
    pub powerup_cap: usize,
    /// Periodic power-up spawn interval in seconds
    pub powerup_spawn_interval_secs: u64,
    /// Delay before the one-shot respawn after a collection, in seconds
    pub powerup_respawn_delay_secs: u64,
    /// Randomized placements attempted per spawn call
    pub spawn_retry_budget: u32,
    /// Power-ups must land more than this many cells from an agent on at
    /// least one axis (per-axis check, intentionally not a radius)
    pub spawn_exclusion_range: i32,
    /// How long a freeze power-up locks the opponent, in seconds
    pub freeze_duration_secs: u64,
    /// Score granted by a points power-up
    pub points_bonus: u32,
}

impl TerritoryConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(1000 / self.tick_rate_hz as u64)
    }

    pub fn time_limit_ticks(&self) -> u64 {
        self.time_limit_secs * self.tick_rate_hz as u64
    }

    pub fn freeze_ticks(&self) -> u64 {
        self.freeze_duration_secs * self.tick_rate_hz as u64
    }

    pub fn spawn_interval_ticks(&self) -> u64 {
        self.powerup_spawn_interval_secs * self.tick_rate_hz as u64
    }

    pub fn respawn_delay_ticks(&self) -> u64 {
        self.powerup_respawn_delay_secs * self.tick_rate_hz as u64
    }

    /// Ticks between AI moves at the given difficulty.
    ///
    /// Integer division matches the original tuning: 8 ticks at normal,
    /// 5 at hard, for a 60 Hz tick.
    pub fn ai_move_delay(&self, difficulty: Difficulty) -> u32 {
        self.tick_rate_hz / difficulty.agent_speed()
    }
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_rate_hz: 60,
            time_limit_secs: 60,
            powerup_cap: 3,
            powerup_spawn_interval_secs: 5,
            powerup_respawn_delay_secs: 2,
            spawn_retry_budget: 10,
            spawn_exclusion_range: 2,
            freeze_duration_secs: 5,
            points_bonus: 20,
        }
    }
}

/// Customization palette (RGBA packed as u32).
pub const AGENT_PALETTE: [u32; 5] = [
    0x4682B4FF, // Pastel blue
    0xB4FFC8FF, // Pastel green
    0xFFFFB4FF, // Pastel yellow
    0xDCB4FFFF, // Pastel purple
    0xFF3296FF, // Hot pink
];

pub const DEFAULT_BLUE_COLOR: u32 = AGENT_PALETTE[0];
pub const DEFAULT_GREEN_COLOR: u32 = AGENT_PALETTE[1];

pub fn palette_color(index: usize) -> Option<u32> {
    AGENT_PALETTE.get(index).copied()
}
