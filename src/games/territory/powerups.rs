use rand::Rng;
use serde::Serialize;

use super::config::TerritoryConfig;
use super::state::{Agent, GridPos, OwnershipGrid, PerAgent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    /// Freezes the opponent of whoever collects it
    Freeze,
    /// Instant score bonus for the collector
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub position: GridPos,
    pub kind: PowerUpKind,
}

/// Spawns, tracks and removes collectible power-ups.
///
/// Owns its two spawn cadences as plain tick counters polled once per tick:
/// a periodic spawn and a one-shot respawn armed after each collection.
/// Collection itself is position-keyed removal; everything else is placement
/// policy.
#[derive(Debug)]
pub struct PowerUpManager {
    live: Vec<PowerUp>,
    cap: usize,
    retry_budget: u32,
    exclusion_range: i32,
    /// Tick of the last periodic spawn attempt
    last_periodic: u64,
    spawn_interval: u64,
    /// Tick at which the pending one-shot respawn fires, if armed
    pending_respawn: Option<u64>,
}

impl PowerUpManager {
    pub fn new(config: &TerritoryConfig, now: u64) -> Self {
        Self {
            live: Vec::new(),
            cap: config.powerup_cap,
            retry_budget: config.spawn_retry_budget,
            exclusion_range: config.spawn_exclusion_range,
            last_periodic: now,
            spawn_interval: config.spawn_interval_ticks(),
            pending_respawn: None,
        }
    }

    pub fn live(&self) -> &[PowerUp] {
        &self.live
    }

    pub fn at(&self, pos: &GridPos) -> Option<PowerUpKind> {
        self.live
            .iter()
            .find(|p| p.position == *pos)
            .map(|p| p.kind)
    }

    /// Attempt one spawn within the retry budget.
    ///
    /// A placement must be unowned, free of power-ups and agents, and far
    /// enough from both agents. "Far enough" is a per-axis check: one axis
    /// difference over the range is sufficient, which deliberately allows
    /// spawns diagonally closer than a true radius would.
    pub fn try_spawn<R: Rng>(
        &mut self,
        grid: &OwnershipGrid,
        agents: &PerAgent<Agent>,
        rng: &mut R,
    ) -> Option<PowerUp> {
        if self.live.len() >= self.cap {
            return None;
        }

        let size = grid.size() as i32;
        for _ in 0..self.retry_budget {
            let pos = GridPos::new(rng.gen_range(0..size), rng.gen_range(0..size));

            if grid.get(&pos).is_some() || self.at(&pos).is_some() {
                continue;
            }
            if pos == agents.blue.position || pos == agents.green.position {
                continue;
            }
            if !self.clear_of(&pos, &agents.blue.position)
                || !self.clear_of(&pos, &agents.green.position)
            {
                continue;
            }

            let kind = if rng.gen_bool(0.5) {
                PowerUpKind::Freeze
            } else {
                PowerUpKind::Points
            };
            let power_up = PowerUp {
                position: pos,
                kind,
            };
            self.live.push(power_up);
            tracing::debug!(?kind, x = pos.x, y = pos.y, "power-up spawned");
            return Some(power_up);
        }

        // Retry budget exhausted; the grid just carries fewer power-ups.
        None
    }

    fn clear_of(&self, pos: &GridPos, agent_pos: &GridPos) -> bool {
        (pos.x - agent_pos.x).abs() > self.exclusion_range
            || (pos.y - agent_pos.y).abs() > self.exclusion_range
    }

    /// Remove and return the power-up at `pos`, if any. First match wins.
    pub fn collect(&mut self, pos: &GridPos) -> Option<PowerUpKind> {
        let idx = self.live.iter().position(|p| p.position == *pos)?;
        Some(self.live.remove(idx).kind)
    }

    /// Arm the one-shot respawn, overwriting any pending one.
    pub fn schedule_respawn(&mut self, at: u64) {
        self.pending_respawn = Some(at);
    }

    #[cfg(test)]
    pub(crate) fn pending_respawn(&self) -> Option<u64> {
        self.pending_respawn
    }

    #[cfg(test)]
    pub(crate) fn place_for_test(&mut self, position: GridPos, kind: PowerUpKind) {
        self.live.push(PowerUp { position, kind });
    }

    /// Fire whichever cadences are due this tick and return what spawned.
    pub fn poll<R: Rng>(
        &mut self,
        now: u64,
        grid: &OwnershipGrid,
        agents: &PerAgent<Agent>,
        rng: &mut R,
    ) -> Vec<PowerUp> {
        let mut spawned = Vec::new();

        if now.saturating_sub(self.last_periodic) >= self.spawn_interval {
            // The interval restarts whether or not placement succeeded.
            self.last_periodic = now;
            spawned.extend(self.try_spawn(grid, agents, rng));
        }

        if let Some(at) = self.pending_respawn {
            if now >= at {
                self.pending_respawn = None;
                spawned.extend(self.try_spawn(grid, agents, rng));
            }
        }

        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::territory::state::AgentId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (OwnershipGrid, PerAgent<Agent>, PowerUpManager, ChaCha8Rng) {
        let config = TerritoryConfig::default();
        let grid = OwnershipGrid::new(config.grid_size);
        let agents = PerAgent::new(
            Agent::new(GridPos::new(1, 1), 0),
            Agent::new(GridPos::new(18, 18), 0),
        );
        let manager = PowerUpManager::new(&config, 0);
        (grid, agents, manager, ChaCha8Rng::seed_from_u64(42))
    }

    #[test]
    fn test_spawn_respects_cap() {
        let (grid, agents, mut manager, mut rng) = setup();

        for _ in 0..10 {
            manager.try_spawn(&grid, &agents, &mut rng);
        }
        assert_eq!(manager.live().len(), 3);

        assert_eq!(manager.try_spawn(&grid, &agents, &mut rng), None);
        assert_eq!(manager.live().len(), 3);
    }

    #[test]
    fn test_spawn_avoids_owned_cells_and_agents() {
        let (mut grid, agents, mut manager, mut rng) = setup();

        // Claim a band of cells so successful spawns must dodge them
        for x in 0..20 {
            grid.set(&GridPos::new(x, 10), Some(AgentId::Blue));
        }

        for _ in 0..50 {
            manager = PowerUpManager::new(&TerritoryConfig::default(), 0);
            if let Some(p) = manager.try_spawn(&grid, &agents, &mut rng) {
                assert_eq!(grid.get(&p.position), None);
                assert_ne!(p.position, agents.blue.position);
                assert_ne!(p.position, agents.green.position);
            }
        }
    }

    #[test]
    fn test_spawn_exclusion_is_per_axis() {
        let (grid, agents, mut manager, mut rng) = setup();

        for _ in 0..100 {
            manager.collect_all_for_test();
            if let Some(p) = manager.try_spawn(&grid, &agents, &mut rng) {
                for agent_pos in [&agents.blue.position, &agents.green.position] {
                    let dx = (p.position.x - agent_pos.x).abs();
                    let dy = (p.position.y - agent_pos.y).abs();
                    assert!(dx > 2 || dy > 2, "spawned at ({},{})", p.position.x, p.position.y);
                }
            }
        }
    }

    #[test]
    fn test_spawn_declines_when_no_room() {
        let config = TerritoryConfig::default();
        let mut grid = OwnershipGrid::new(config.grid_size);
        for y in 0..20 {
            for x in 0..20 {
                grid.set(&GridPos::new(x, y), Some(AgentId::Green));
            }
        }
        let agents = PerAgent::new(
            Agent::new(GridPos::new(1, 1), 0),
            Agent::new(GridPos::new(18, 18), 0),
        );
        let mut manager = PowerUpManager::new(&config, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(manager.try_spawn(&grid, &agents, &mut rng), None);
        assert!(manager.live().is_empty());
    }

    #[test]
    fn test_collect_removes_and_returns() {
        let (grid, agents, mut manager, mut rng) = setup();

        let spawned = manager.try_spawn(&grid, &agents, &mut rng).unwrap();
        let collected = manager.collect(&spawned.position);
        assert_eq!(collected, Some(spawned.kind));
        assert!(manager.live().is_empty());

        // Collecting at an empty cell is a silent no-op
        assert_eq!(manager.collect(&spawned.position), None);
    }

    #[test]
    fn test_periodic_cadence() {
        let (grid, agents, mut manager, mut rng) = setup();

        assert!(manager.poll(299, &grid, &agents, &mut rng).is_empty());
        assert_eq!(manager.poll(300, &grid, &agents, &mut rng).len(), 1);
        // Interval restarts from the fire tick
        assert!(manager.poll(599, &grid, &agents, &mut rng).is_empty());
        assert_eq!(manager.poll(600, &grid, &agents, &mut rng).len(), 1);
    }

    #[test]
    fn test_one_shot_respawn() {
        let (grid, agents, mut manager, mut rng) = setup();

        manager.schedule_respawn(120);
        assert!(manager.poll(119, &grid, &agents, &mut rng).is_empty());
        assert_eq!(manager.poll(120, &grid, &agents, &mut rng).len(), 1);
        // One-shot: does not fire again
        assert!(manager.poll(121, &grid, &agents, &mut rng).is_empty());
    }

    #[test]
    fn test_respawn_rearm_overwrites() {
        let (grid, agents, mut manager, mut rng) = setup();

        manager.schedule_respawn(100);
        manager.schedule_respawn(200);
        assert!(manager.poll(100, &grid, &agents, &mut rng).is_empty());
        assert_eq!(manager.poll(200, &grid, &agents, &mut rng).len(), 1);
    }

    impl PowerUpManager {
        fn collect_all_for_test(&mut self) {
            self.live.clear();
        }
    }
}
