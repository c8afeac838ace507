use serde::Serialize;

use super::config::{Difficulty, GameMode, TerritoryConfig};
use super::powerups::{PowerUp, PowerUpKind};
use super::state::{Agent, AgentId, GridPos, MatchState};
use super::{MatchOutcome, MatchPhase};

#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    pub position: GridPos,
    pub score: u32,
    /// Whole seconds of freeze remaining, rounded up for display
    pub frozen_secs_left: u64,
    /// RGBA packed as u32
    pub color: u32,
}

impl AgentSnapshot {
    fn capture(agent: &Agent, now: u64, tick_rate_hz: u32) -> Self {
        Self {
            position: agent.position,
            score: agent.score,
            frozen_secs_left: agent.frozen_ticks_left(now).div_ceil(tick_rate_hz as u64),
            color: agent.color,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PowerUpSnapshot {
    pub position: GridPos,
    pub kind: PowerUpKind,
}

impl From<&PowerUp> for PowerUpSnapshot {
    fn from(power_up: &PowerUp) -> Self {
        Self {
            position: power_up.position,
            kind: power_up.kind,
        }
    }
}

/// The live playfield, present while a match exists (Playing and GameOver).
#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    pub grid_size: u32,
    /// Row-major ownership, `y * grid_size + x` indexing
    pub cells: Vec<Option<AgentId>>,
    pub blue: AgentSnapshot,
    pub green: AgentSnapshot,
    pub power_ups: Vec<PowerUpSnapshot>,
    pub elapsed_secs: u64,
    /// Clamped at zero, the way the sidebar displays it
    pub time_left_secs: u64,
}

impl FieldSnapshot {
    pub(super) fn capture(state: &MatchState, now: u64, config: &TerritoryConfig) -> Self {
        let elapsed_secs = state.clock.elapsed_ticks(now) / config.tick_rate_hz as u64;
        Self {
            grid_size: state.grid.size(),
            cells: state.grid.cells().to_vec(),
            blue: AgentSnapshot::capture(&state.agents.blue, now, config.tick_rate_hz),
            green: AgentSnapshot::capture(&state.agents.green, now, config.tick_rate_hz),
            power_ups: state.power_ups.live().iter().map(Into::into).collect(),
            elapsed_secs,
            time_left_secs: config.time_limit_secs.saturating_sub(elapsed_secs),
        }
    }
}

/// Read-only view of the whole game for the presentation layer.
///
/// Presentation renders this and performs no simulation logic of its own.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub outcome: Option<MatchOutcome>,
    pub field: Option<FieldSnapshot>,
}
