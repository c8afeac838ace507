pub mod ai;
pub mod config;
pub mod powerups;
pub mod snapshot;
pub mod state;
pub mod systems;

use std::cmp::Ordering;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::game::traits::{Game, GameError};

pub use config::{Difficulty, GameMode, TerritoryConfig};
pub use powerups::{PowerUp, PowerUpKind};
pub use snapshot::{FieldSnapshot, MatchSnapshot};
pub use state::{Agent, AgentId, Direction, GridPos, MatchState, PerAgent};

/// Where the game currently is in its menu/match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchPhase {
    Menu,
    ModeSelect,
    DifficultySelect,
    Customization,
    Playing,
    GameOver,
}

/// Menu and selection events produced by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Menu -> ModeSelect
    Play,
    /// Menu -> Customization
    Customize,
    /// ModeSelect -> DifficultySelect
    SelectMode(GameMode),
    /// DifficultySelect -> Playing, with a full reset
    SelectDifficulty(Difficulty),
    /// Pick a palette color for an agent (Customization only)
    SetColor(AgentId, usize),
    /// One step back in the menu flow
    Back,
    /// GameOver -> Playing
    PlayAgain,
    /// Return to the main menu; aborts a running match
    ToMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    /// Directional intent for the human-controlled agent
    Move(Direction),
    Menu(MenuAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Winner(AgentId),
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    PowerUpSpawned {
        position: GridPos,
        kind: PowerUpKind,
    },
    PowerUpCollected {
        agent: AgentId,
        kind: PowerUpKind,
    },
    AgentFrozen {
        agent: AgentId,
        until: u64,
    },
    MatchOver {
        outcome: MatchOutcome,
    },
}

/// The territory-capture game: menu flow, match lifecycle, and the
/// 60 Hz simulation tick.
///
/// Everything a match mutates lives in one owned `MatchState`, built on
/// entry to Playing and dropped on the way out. The tick counter is global
/// and monotonic; all timers are comparisons against it.
pub struct TerritoryGame {
    config: TerritoryConfig,
    phase: MatchPhase,
    mode: GameMode,
    difficulty: Difficulty,
    /// Customization selections, persisted across matches for the session
    colors: PerAgent<u32>,
    match_state: Option<MatchState>,
    outcome: Option<MatchOutcome>,
    /// Monotonic tick counter, advanced once per `tick` call
    tick: u64,
    /// Ticks accumulated toward the next AI move
    ai_turn_timer: u32,
    /// Events produced outside `tick` (human moves), drained on the next tick
    pending_events: Vec<MatchEvent>,
    rng: StdRng,
}

impl TerritoryGame {
    pub fn new() -> Self {
        Self::with_config(TerritoryConfig::default())
    }

    pub fn with_config(config: TerritoryConfig) -> Self {
        Self::build(config, StdRng::from_entropy())
    }

    /// Deterministic construction for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(TerritoryConfig::default(), StdRng::seed_from_u64(seed))
    }

    fn build(config: TerritoryConfig, rng: StdRng) -> Self {
        Self {
            config,
            phase: MatchPhase::Menu,
            mode: GameMode::HumanVsAi,
            difficulty: Difficulty::Normal,
            colors: PerAgent::new(config::DEFAULT_BLUE_COLOR, config::DEFAULT_GREEN_COLOR),
            match_state: None,
            outcome: None,
            tick: 0,
            ai_turn_timer: 0,
            pending_events: Vec::new(),
            rng,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.match_state.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> Option<&mut MatchState> {
        self.match_state.as_mut()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            mode: self.mode,
            difficulty: self.difficulty,
            outcome: self.outcome,
            field: self
                .match_state
                .as_ref()
                .map(|s| FieldSnapshot::capture(s, self.tick, &self.config)),
        }
    }

    /// Full reset into Playing: fresh match state, cleared outcome and
    /// cadence counters.
    fn start_match(&mut self) {
        let state = MatchState::new(&self.config, self.colors, self.tick, &mut self.rng);
        tracing::info!(
            mode = ?self.mode,
            difficulty = ?self.difficulty,
            power_ups = state.power_ups.live().len(),
            "match started"
        );
        self.match_state = Some(state);
        self.outcome = None;
        self.ai_turn_timer = 0;
        self.pending_events.clear();
        self.phase = MatchPhase::Playing;
    }

    /// Drop any running match so no stale timer can fire, then show the menu.
    fn return_to_menu(&mut self) {
        if self.match_state.take().is_some() {
            tracing::info!("match abandoned");
        }
        self.outcome = None;
        self.ai_turn_timer = 0;
        self.pending_events.clear();
        self.phase = MatchPhase::Menu;
    }

    fn handle_menu(&mut self, action: MenuAction) -> Result<(), GameError> {
        use MatchPhase as P;
        use MenuAction as A;

        match (self.phase, action) {
            (P::Menu, A::Play) => self.phase = P::ModeSelect,
            (P::Menu, A::Customize) => self.phase = P::Customization,
            (P::ModeSelect, A::SelectMode(mode)) => {
                self.mode = mode;
                self.phase = P::DifficultySelect;
            }
            (P::ModeSelect, A::Back) => self.phase = P::Menu,
            (P::DifficultySelect, A::SelectDifficulty(difficulty)) => {
                self.difficulty = difficulty;
                self.start_match();
            }
            (P::DifficultySelect, A::Back) => self.phase = P::ModeSelect,
            (P::Customization, A::SetColor(agent, index)) => {
                let color = config::palette_color(index).ok_or_else(|| {
                    GameError::InvalidInput(format!("palette index {} out of range", index))
                })?;
                self.colors[agent] = color;
            }
            (P::Customization, A::Back) => self.phase = P::Menu,
            (P::GameOver, A::PlayAgain) => self.start_match(),
            (P::GameOver | P::Playing, A::ToMenu) => self.return_to_menu(),
            (phase, action) => {
                // Should be unreachable with a well-behaved presentation
                // layer; reject loudly instead of guessing a transition.
                tracing::warn!(?phase, ?action, "menu action does not apply in this phase");
                return Err(GameError::InvalidState(format!(
                    "{:?} does not apply in {:?}",
                    action, phase
                )));
            }
        }
        Ok(())
    }

    fn handle_move(&mut self, direction: Direction) -> Result<(), GameError> {
        if self.phase != MatchPhase::Playing {
            return Err(GameError::InvalidState(
                "no match in progress".to_string(),
            ));
        }
        if self.mode != GameMode::HumanVsAi {
            return Err(GameError::InvalidInput(
                "no human-controlled agent in AI vs AI".to_string(),
            ));
        }

        let now = self.tick;
        let Some(state) = self.match_state.as_mut() else {
            return Err(GameError::InvalidState("no match in progress".to_string()));
        };

        // Input while frozen is dropped, same as holding a key mid-freeze
        if state.agents[AgentId::Blue].is_frozen(now) {
            return Ok(());
        }
        let Some(dest) = systems::step(state.agents[AgentId::Blue].position, direction, &state.grid)
        else {
            return Ok(());
        };

        if let Some(kind) = systems::apply_move(state, AgentId::Blue, dest, now, &self.config) {
            self.pending_events.push(MatchEvent::PowerUpCollected {
                agent: AgentId::Blue,
                kind,
            });
            if kind == PowerUpKind::Freeze {
                self.pending_events.push(MatchEvent::AgentFrozen {
                    agent: AgentId::Green,
                    until: state.agents[AgentId::Green].frozen_until,
                });
            }
        }
        Ok(())
    }
}

impl Default for TerritoryGame {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_outcome(agents: &PerAgent<Agent>) -> MatchOutcome {
    match agents.blue.score.cmp(&agents.green.score) {
        Ordering::Greater => MatchOutcome::Winner(AgentId::Blue),
        Ordering::Less => MatchOutcome::Winner(AgentId::Green),
        Ordering::Equal => MatchOutcome::Tie,
    }
}

impl Game for TerritoryGame {
    type Input = GameInput;
    type Event = MatchEvent;

    fn tick(&mut self) -> Vec<MatchEvent> {
        self.tick += 1;
        let mut events = std::mem::take(&mut self.pending_events);

        if self.phase != MatchPhase::Playing {
            return events;
        }
        let now = self.tick;

        let Some(state) = self.match_state.as_mut() else {
            // Defect: Playing without a live match. Fail loudly and recover
            // to the menu rather than limp on.
            tracing::error!("playing phase with no live match state, forcing menu");
            self.phase = MatchPhase::Menu;
            return events;
        };

        if state.clock.is_expired(now, self.config.time_limit_ticks()) {
            let outcome = resolve_outcome(&state.agents);
            tracing::info!(
                ?outcome,
                blue = state.agents.blue.score,
                green = state.agents.green.score,
                "time expired"
            );
            self.outcome = Some(outcome);
            self.phase = MatchPhase::GameOver;
            events.push(MatchEvent::MatchOver { outcome });
            return events;
        }

        self.ai_turn_timer += 1;
        if self.ai_turn_timer >= self.config.ai_move_delay(self.difficulty) {
            self.ai_turn_timer = 0;
            let movers = match self.mode {
                GameMode::HumanVsAi => &[AgentId::Green][..],
                GameMode::AiVsAi => &[AgentId::Blue, AgentId::Green][..],
            };
            for &agent in movers {
                if state.agents[agent].is_frozen(now) {
                    continue;
                }
                let Some(dest) = ai::choose_move(
                    agent,
                    state.agents[agent].position,
                    &state.grid,
                    &state.power_ups,
                    self.difficulty.smartness(),
                    &mut self.rng,
                ) else {
                    continue;
                };
                if let Some(kind) = systems::apply_move(state, agent, dest, now, &self.config) {
                    events.push(MatchEvent::PowerUpCollected { agent, kind });
                    if kind == PowerUpKind::Freeze {
                        let opponent = agent.opponent();
                        events.push(MatchEvent::AgentFrozen {
                            agent: opponent,
                            until: state.agents[opponent].frozen_until,
                        });
                    }
                }
            }
        }

        for spawned in state
            .power_ups
            .poll(now, &state.grid, &state.agents, &mut self.rng)
        {
            events.push(MatchEvent::PowerUpSpawned {
                position: spawned.position,
                kind: spawned.kind,
            });
        }

        events
    }

    fn handle_input(&mut self, input: GameInput) -> Result<(), GameError> {
        match input {
            GameInput::Move(direction) => self.handle_move(direction),
            GameInput::Menu(action) => self.handle_menu(action),
        }
    }

    fn tick_rate(&self) -> Duration {
        self.config.tick_duration()
    }

    fn is_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }
}
