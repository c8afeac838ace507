use super::config::TerritoryConfig;
use super::powerups::PowerUpKind;
use super::state::{AgentId, Direction, GridPos, MatchState, OwnershipGrid};

/// Bounds-checked pass-through for a human directional intent.
///
/// Returns the destination cell, or None when the move would leave the grid.
pub fn step(pos: GridPos, direction: Direction, grid: &OwnershipGrid) -> Option<GridPos> {
    let dest = pos.moved(direction);
    grid.in_bounds(&dest).then_some(dest)
}

/// Suspend an agent's movement until `now + duration`. Re-freezing
/// overwrites the deadline; effects never stack.
pub fn freeze(state: &mut MatchState, agent: AgentId, now: u64, duration: u64) {
    state.agents[agent].frozen_until = now + duration;
    tracing::debug!(?agent, until = now + duration, "agent frozen");
}

/// Apply a validated move intent: ownership transfer, score deltas, position
/// update, then power-up collection.
///
/// Callers filter frozen agents and out-of-bounds destinations already; if
/// one slips through this degrades to a no-op rather than an error. A "stay"
/// is likewise a no-op.
///
/// Returns the collected power-up kind, if the destination held one.
pub fn apply_move(
    state: &mut MatchState,
    agent: AgentId,
    dest: GridPos,
    now: u64,
    config: &TerritoryConfig,
) -> Option<PowerUpKind> {
    if state.agents[agent].is_frozen(now) {
        return None;
    }
    if !state.grid.in_bounds(&dest) || dest == state.agents[agent].position {
        return None;
    }

    let prior_owner = state.grid.get(&dest);
    if prior_owner != Some(agent) {
        state.agents[agent].score += 1;
        if prior_owner.is_some() {
            let opponent = agent.opponent();
            // Territory loss never drives a score negative
            if state.agents[opponent].score > 0 {
                state.agents[opponent].score -= 1;
            }
        }
    }

    state.grid.set(&dest, Some(agent));
    state.agents[agent].position = dest;

    let collected = state.power_ups.collect(&dest);
    if let Some(kind) = collected {
        match kind {
            PowerUpKind::Freeze => {
                freeze(state, agent.opponent(), now, config.freeze_ticks());
            }
            PowerUpKind::Points => {
                state.agents[agent].score += config.points_bonus;
            }
        }
        state.power_ups.schedule_respawn(now + config.respawn_delay_ticks());
        tracing::debug!(?agent, ?kind, "power-up collected");
    }

    collected
}
