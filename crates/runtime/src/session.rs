//! Session orchestration over the deterministic core.
//!
//! A [`GameSession`] owns the authoritative [`GameState`] and everything
//! needed to advance it: the command mailbox, the interaction rules, and
//! the rng oracle. Input surfaces submit commands at any rate; the host
//! drives [`tick`](GameSession::tick) and polls the read accessors, so the
//! core never blocks on, or calls back into, the outside world.

use std::sync::Arc;

use game_core::{
    Command, EnginePhase, GameConfig, GameEngine, GameState, InteractionResolver, PcgRng, Position,
    RejectedMove, ResourceMeter, StandardRules, StepOutcome, TileView, TurnReport, WorldEvent,
    mapgen,
};

use crate::error::{Result, RuntimeError};
use crate::events::EventLog;
use crate::mailbox::CommandSlot;

/// What a single [`tick`](GameSession::tick) did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No command was waiting; nothing changed.
    Idle,
    /// The pending command was consumed but refused. The turn counter did
    /// not advance.
    Rejected(RejectedMove),
    /// A full turn resolved.
    Turn(TurnReport),
    /// The run is over. Pending commands are left untouched.
    GameOver,
}

/// A single playthrough: state, rules, and the command channel feeding it.
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    slot: Arc<CommandSlot>,
    rules: Box<dyn InteractionResolver>,
    rng: PcgRng,
    events: EventLog,
}

impl GameSession {
    /// Validates the config, generates a map from its seed, and opens a
    /// session on the realized state.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let rng = PcgRng;
        let blueprint = mapgen::generate(&config, &rng);
        let state = blueprint
            .into_state(config.random_seed)
            .map_err(RuntimeError::InitialState)?;

        tracing::info!(
            "session ready: {}x{} map, seed {}",
            config.map_width,
            config.map_height,
            config.random_seed
        );
        Ok(Self::from_state(config, state))
    }

    /// Opens a session on a pre-built state instead of a generated map.
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        Self {
            events: EventLog::with_capacity(config.event_log_capacity),
            config,
            state,
            slot: Arc::new(CommandSlot::new()),
            rules: Box::new(StandardRules),
            rng: PcgRng,
        }
    }

    /// Swaps the interaction ruleset. Intended for hosts with custom bump
    /// or entry behavior.
    pub fn with_rules(mut self, rules: Box<dyn InteractionResolver>) -> Self {
        self.rules = rules;
        self
    }

    /// Parses a command name from an input surface and queues it.
    ///
    /// Unknown names fail without touching the queue; a recognized command
    /// replaces whatever was still waiting.
    pub fn submit_command(&self, name: &str) -> Result<Command> {
        let command = name
            .parse::<Command>()
            .map_err(|_| RuntimeError::InvalidCommand {
                name: name.to_string(),
            })?;
        self.submit(command);
        Ok(command)
    }

    /// Queues an already-typed command.
    pub fn submit(&self, command: Command) {
        if let Some(displaced) = self.slot.submit(command) {
            tracing::debug!("{} displaced pending {}", command.name(), displaced.name());
        }
    }

    /// Shared handle to the command mailbox, for producers that outlive a
    /// borrow of the session (input threads, callback registries).
    pub fn command_slot(&self) -> Arc<CommandSlot> {
        Arc::clone(&self.slot)
    }

    /// Consumes at most one pending command and resolves it into a turn.
    ///
    /// With an empty mailbox this is a no-op, so hosts may drive it from a
    /// timer or render loop at any rate. After the run ends it stops
    /// consuming commands and reports [`TickOutcome::GameOver`] forever.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        match self.state.turn.phase {
            EnginePhase::GameOver => return Ok(TickOutcome::GameOver),
            EnginePhase::Processing => return Err(RuntimeError::ReentrantTick),
            EnginePhase::Idle => {}
        }

        let Some(command) = self.slot.take() else {
            return Ok(TickOutcome::Idle);
        };

        let mut engine = GameEngine::new(
            &mut self.state,
            &self.config,
            self.rules.as_ref(),
            &self.rng,
        );
        let outcome = engine.step(command)?;

        match outcome {
            StepOutcome::Rejected(rejection) => {
                tracing::debug!(
                    "{} refused at {:?}: {}",
                    rejection.command.name(),
                    rejection.destination,
                    rejection.reason.as_str()
                );
                Ok(TickOutcome::Rejected(rejection))
            }
            StepOutcome::Turn(report) => {
                if let Err(violation) = self.state.verify_consistency() {
                    // Close the phase gate so later ticks cannot run on a
                    // state that already failed its own checks.
                    self.state.turn.phase = EnginePhase::Processing;
                    tracing::error!("halting session: {violation}");
                    return Err(RuntimeError::Invariant(violation));
                }
                tracing::debug!(
                    "turn {} resolved with {} event(s)",
                    report.turn,
                    report.events.len()
                );
                self.events.extend(report.events.iter().copied());
                Ok(TickOutcome::Turn(report))
            }
        }
    }

    pub fn player_position(&self) -> Position {
        self.state.entities.player.position
    }

    pub fn player_hp(&self) -> ResourceMeter {
        self.state.entities.player.hp
    }

    /// Completed turns since the session opened.
    pub fn turn(&self) -> u64 {
        self.state.turn.counter
    }

    pub fn phase(&self) -> EnginePhase {
        self.state.turn.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.turn.phase == EnginePhase::GameOver
    }

    pub fn map_width(&self) -> u32 {
        self.state.world.terrain.width()
    }

    pub fn map_height(&self) -> u32 {
        self.state.world.terrain.height()
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.state.world.terrain.is_walkable(position)
    }

    /// Terrain plus occupancy for one tile, for renderers.
    pub fn tile_view(&self, position: Position) -> TileView {
        self.state.world.tile_view(position)
    }

    /// Read-only view of the full authoritative state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether a command is waiting to be consumed by the next tick.
    pub fn has_pending_command(&self) -> bool {
        self.slot.is_pending()
    }

    /// Removes and returns every event logged since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain()
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("turn", &self.state.turn.counter)
            .field("phase", &self.state.turn.phase)
            .field("player", &self.state.entities.player.position)
            .field("pending", &self.slot.is_pending())
            .finish_non_exhaustive()
    }
}
