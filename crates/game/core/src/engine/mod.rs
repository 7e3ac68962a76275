//! Turn pipeline: one command in, one resolved turn out.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! validates the player's command, drives the resulting transitions through
//! the three-phase pipeline, lets hostile actors respond, and reports what
//! happened as [`WorldEvent`]s. A refused move is a first-class outcome
//! rather than an error: the world must not change and the turn must not
//! advance when the player walks into a wall.

mod errors;
mod events;
mod transition;

pub use errors::{EngineError, TransitionPhase, TransitionPhaseError};
pub use events::WorldEvent;

use crate::action::{
    ActionTransition, AttackAction, AttackOutcome, MoveAction, MoveError, PickupAction,
};
use crate::ai;
use crate::command::Command;
use crate::config::GameConfig;
use crate::rng::RngOracle;
use crate::rules::{Interaction, InteractionResolver};
use crate::state::{EnginePhase, EntityId, GameState, Position};

/// Why a movement command was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// The destination lies outside the map.
    OutOfBounds,
    /// The destination terrain is not walkable.
    Impassable,
    /// A blocking entity holds the destination and refused entry.
    Occupied,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::OutOfBounds => "out_of_bounds",
            RejectReason::Impassable => "impassable",
            RejectReason::Occupied => "occupied",
        }
    }
}

/// A movement command the world refused. Nothing changed and the turn
/// counter did not advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectedMove {
    pub command: Command,
    pub destination: Position,
    pub reason: RejectReason,
}

/// A fully resolved turn: the player acted and every activated hostile
/// responded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    /// Turn counter value after this turn resolved.
    pub turn: u64,
    /// Everything observable that happened, in occurrence order.
    pub events: Vec<WorldEvent>,
}

/// Outcome of stepping the engine with one command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    /// The command was refused; the world is untouched.
    Rejected(RejectedMove),
    /// The command executed and the turn advanced.
    Turn(TurnReport),
}

/// Drives one transition and, on success, charges it to the action nonce.
///
/// Every executed action advances the nonce exactly once so later rolls
/// draw from fresh seeds. Failed transitions leave the nonce alone.
pub(crate) fn run_action<T>(
    action: &T,
    state: &mut GameState,
    rng: &dyn RngOracle,
) -> Result<T::Outcome, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    let outcome = transition::drive_transition(action, state, rng)?;
    state.turn.action_nonce += 1;
    Ok(outcome)
}

/// Records the observable result of a resolved attack.
pub(crate) fn push_attack_events(
    attacker: EntityId,
    defender: EntityId,
    outcome: AttackOutcome,
    state: &GameState,
    events: &mut Vec<WorldEvent>,
) {
    match outcome {
        AttackOutcome::Miss => events.push(WorldEvent::Missed { attacker, defender }),
        AttackOutcome::Hit { damage, lethal } => {
            events.push(WorldEvent::Attacked {
                attacker,
                defender,
                damage,
            });
            if lethal && let Some(actor) = state.entities.actor(defender) {
                events.push(WorldEvent::Died {
                    entity: defender,
                    position: actor.position,
                });
            }
        }
    }
}

/// Maps a failed move to the reason the player sees, if the failure is an
/// ordinary refusal. Validation failures stay rejections; anything past
/// `pre_validate` means the state may be corrupt and must surface as an
/// [`EngineError`] instead.
fn rejection_reason(error: &TransitionPhaseError<MoveError>) -> Option<RejectReason> {
    if error.phase != TransitionPhase::PreValidate {
        return None;
    }
    match error.error {
        MoveError::OutOfBounds { .. } => Some(RejectReason::OutOfBounds),
        MoveError::Blocked { .. } => Some(RejectReason::Impassable),
        MoveError::Occupied { .. } => Some(RejectReason::Occupied),
        MoveError::ActorNotFound(_)
        | MoveError::OccupancyDesync { .. }
        | MoveError::MissingOccupant { .. } => None,
    }
}

/// Turn engine over a mutable game state.
///
/// One [`step`](GameEngine::step) resolves one full turn: the player's
/// command, any interactions it triggers, and the response of every
/// activated hostile. The engine enforces the phase gate; callers never
/// step a session that is mid-turn or finished.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
    rules: &'a dyn InteractionResolver,
    rng: &'a dyn RngOracle,
}

impl<'a> GameEngine<'a> {
    pub fn new(
        state: &'a mut GameState,
        config: &'a GameConfig,
        rules: &'a dyn InteractionResolver,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self {
            state,
            config,
            rules,
            rng,
        }
    }

    /// Resolves one command into one turn.
    ///
    /// Returns [`StepOutcome::Rejected`] when the command was an ordinary
    /// refusal (wall, edge, blocked tile). Returns an error when the engine
    /// was not idle or a transition failed mid-flight; in the latter case
    /// the phase stays at `Processing` and the state must not be trusted.
    pub fn step(&mut self, command: Command) -> Result<StepOutcome, EngineError> {
        match self.state.turn.phase {
            EnginePhase::Idle => {}
            phase => return Err(EngineError::NotIdle { phase }),
        }
        self.state.turn.phase = EnginePhase::Processing;

        let mut events = Vec::new();
        if let Some(rejection) = self.player_action(command, &mut events)? {
            self.state.turn.phase = EnginePhase::Idle;
            return Ok(StepOutcome::Rejected(rejection));
        }

        ai::hostile_turns(self.state, self.config, self.rng, &mut events)?;

        self.state.turn.counter += 1;
        if self.state.entities.player.is_alive() {
            self.state.turn.phase = EnginePhase::Idle;
        } else {
            events.push(WorldEvent::GameOver);
            self.state.turn.phase = EnginePhase::GameOver;
        }

        Ok(StepOutcome::Turn(TurnReport {
            turn: self.state.turn.counter,
            events,
        }))
    }

    /// Executes the player's half of the turn. `Ok(Some(_))` is a refusal
    /// that aborts the turn before hostiles act.
    fn player_action(
        &mut self,
        command: Command,
        events: &mut Vec<WorldEvent>,
    ) -> Result<Option<RejectedMove>, EngineError> {
        let Some((dx, dy)) = command.delta() else {
            // Wait holds position but still spends the turn.
            self.state.turn.action_nonce += 1;
            events.push(WorldEvent::Waited {
                entity: EntityId::PLAYER,
            });
            return Ok(None);
        };

        let origin = self.state.entities.player.position;
        let destination = origin.offset(dx, dy);

        if let Some(target) = self.state.blocking_entity_at(destination) {
            return match self.rules.on_bump(self.state, EntityId::PLAYER, target) {
                Interaction::Attack => {
                    self.player_attack(target, events)?;
                    Ok(None)
                }
                // A blocking occupant either fights or refuses entry.
                _ => Ok(Some(RejectedMove {
                    command,
                    destination,
                    reason: RejectReason::Occupied,
                })),
            };
        }

        let action = MoveAction::new(EntityId::PLAYER, destination);
        if let Err(error) = run_action(&action, self.state, self.rng) {
            return match rejection_reason(&error) {
                Some(reason) => Ok(Some(RejectedMove {
                    command,
                    destination,
                    reason,
                })),
                None => Err(EngineError::Move(error)),
            };
        }
        events.push(WorldEvent::Moved {
            entity: EntityId::PLAYER,
            from: origin,
            to: destination,
        });

        self.resolve_entry(destination, events)?;
        Ok(None)
    }

    fn player_attack(
        &mut self,
        defender: EntityId,
        events: &mut Vec<WorldEvent>,
    ) -> Result<(), EngineError> {
        let action = AttackAction::new(EntityId::PLAYER, defender);
        let outcome = run_action(&action, self.state, self.rng).map_err(EngineError::Attack)?;
        push_attack_events(EntityId::PLAYER, defender, outcome, self.state, events);
        Ok(())
    }

    /// Consults the ruleset about every other entity sharing the tile the
    /// player just entered.
    fn resolve_entry(
        &mut self,
        position: Position,
        events: &mut Vec<WorldEvent>,
    ) -> Result<(), EngineError> {
        let targets: Vec<EntityId> = self
            .state
            .world
            .tile_map
            .occupants(&position)
            .map(|slots| {
                slots
                    .iter()
                    .copied()
                    .filter(|id| !id.is_player())
                    .collect()
            })
            .unwrap_or_default();

        for target in targets {
            if self.rules.on_enter(self.state, EntityId::PLAYER, target) == Interaction::Pickup {
                let action = PickupAction::new(EntityId::PLAYER, target);
                let healed =
                    run_action(&action, self.state, self.rng).map_err(EngineError::Pickup)?;
                events.push(WorldEvent::PickedUp {
                    entity: EntityId::PLAYER,
                    item: target,
                    healed,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::rules::StandardRules;
    use crate::state::{ActorState, ResourceMeter, TerrainGrid};

    /// Oracle returning the same raw value for every draw, pinning combat
    /// rolls in tests.
    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn open_state(seed: u64, side: u32, player_at: Position) -> GameState {
        let terrain = TerrainGrid::filled(side, side, true);
        GameState::new(seed, terrain, ActorState::player(player_at)).unwrap()
    }

    fn test_config(seed: u64) -> GameConfig {
        GameConfig::new(5, 5, seed)
    }

    #[test]
    fn moves_execute_and_advance_the_turn() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        match engine.step(Command::MoveUp).unwrap() {
            StepOutcome::Turn(report) => {
                assert_eq!(report.turn, 1);
                assert!(report.events.contains(&WorldEvent::Moved {
                    entity: EntityId::PLAYER,
                    from: Position::new(2, 2),
                    to: Position::new(2, 1),
                }));
            }
            other => panic!("expected a turn, got {other:?}"),
        }

        match engine.step(Command::MoveLeft).unwrap() {
            StepOutcome::Turn(report) => assert_eq!(report.turn, 2),
            other => panic!("expected a turn, got {other:?}"),
        }

        assert_eq!(state.entities.player.position, Position::new(1, 1));
        assert_eq!(state.turn.counter, 2);
        assert_eq!(state.turn.phase, EnginePhase::Idle);
    }

    #[test]
    fn edge_moves_are_refused_without_spending_the_turn() {
        let mut state = open_state(7, 5, Position::new(0, 0));
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        match engine.step(Command::MoveLeft).unwrap() {
            StepOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::OutOfBounds);
                assert_eq!(rejection.destination, Position::new(-1, 0));
            }
            other => panic!("expected a rejection, got {other:?}"),
        }

        assert_eq!(state.entities.player.position, Position::new(0, 0));
        assert_eq!(state.turn.counter, 0);
        assert_eq!(state.turn.phase, EnginePhase::Idle);
    }

    #[test]
    fn wall_bumps_are_refused_as_impassable() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        state.world.terrain.set_walkable(Position::new(2, 1), false);
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        match engine.step(Command::MoveUp).unwrap() {
            StepOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::Impassable);
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
        assert_eq!(state.turn.counter, 0);
    }

    #[test]
    fn prop_bumps_are_refused_as_occupied() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        state
            .spawn_prop("Boulder", Position::new(2, 3), true)
            .unwrap();
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        match engine.step(Command::MoveDown).unwrap() {
            StepOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::Occupied);
                assert_eq!(rejection.destination, Position::new(2, 3));
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
        assert_eq!(state.entities.player.position, Position::new(2, 2));
        assert_eq!(state.turn.counter, 0);
    }

    #[test]
    fn bumping_a_monster_attacks_in_place() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        let goblin = state
            .spawn_npc("Goblin", Position::new(3, 2), 16, 4, 1)
            .unwrap();
        let config = test_config(7);
        let rules = StandardRules;
        // Raw 2 everywhere: d100 reads 3 (hit), player d5 reads 3, goblin d4 reads 3.
        let rng = FixedRng(2);
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        let report = match engine.step(Command::MoveRight).unwrap() {
            StepOutcome::Turn(report) => report,
            other => panic!("expected a turn, got {other:?}"),
        };

        assert_eq!(report.turn, 1);
        assert!(report.events.contains(&WorldEvent::Attacked {
            attacker: EntityId::PLAYER,
            defender: goblin,
            damage: 2,
        }));
        assert!(report.events.contains(&WorldEvent::Attacked {
            attacker: goblin,
            defender: EntityId::PLAYER,
            damage: 1,
        }));

        // Attacking never displaces the attacker.
        assert_eq!(state.entities.player.position, Position::new(2, 2));
        assert_eq!(state.entities.actor(goblin).unwrap().hp.current, 14);
        assert_eq!(state.entities.player.hp.current, 29);
    }

    #[test]
    fn slain_monsters_stop_blocking_their_tile() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        let goblin = state
            .spawn_npc("Goblin", Position::new(3, 2), 1, 4, 1)
            .unwrap();
        let config = test_config(7);
        let rules = StandardRules;
        // Raw 4: d100 reads 5 (hit), player d5 reads 5, damage 5 - 1 kills a 1 hp goblin.
        let rng = FixedRng(4);
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        let report = match engine.step(Command::MoveRight).unwrap() {
            StepOutcome::Turn(report) => report,
            other => panic!("expected a turn, got {other:?}"),
        };
        assert!(report.events.contains(&WorldEvent::Died {
            entity: goblin,
            position: Position::new(3, 2),
        }));

        match engine.step(Command::MoveRight).unwrap() {
            StepOutcome::Turn(report) => {
                assert_eq!(report.turn, 2);
                assert!(report.events.contains(&WorldEvent::Moved {
                    entity: EntityId::PLAYER,
                    from: Position::new(2, 2),
                    to: Position::new(3, 2),
                }));
            }
            other => panic!("expected a turn, got {other:?}"),
        }
        assert_eq!(state.entities.player.position, Position::new(3, 2));
    }

    #[test]
    fn waiting_spends_the_turn() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        match engine.step(Command::Wait).unwrap() {
            StepOutcome::Turn(report) => {
                assert_eq!(report.turn, 1);
                assert_eq!(
                    report.events,
                    vec![WorldEvent::Waited {
                        entity: EntityId::PLAYER,
                    }]
                );
            }
            other => panic!("expected a turn, got {other:?}"),
        }
        assert_eq!(state.turn.action_nonce, 1);
    }

    #[test]
    fn lethal_retaliation_ends_the_game() {
        let terrain = TerrainGrid::filled(5, 5, true);
        let player = ActorState::new(
            EntityId::PLAYER,
            "Player",
            Position::new(2, 2),
            ResourceMeter::new(1, 30),
            5,
            2,
        );
        let mut state = GameState::new(7, terrain, player).unwrap();
        let orc = state
            .spawn_npc("Orc", Position::new(3, 2), 16, 4, 1)
            .unwrap();
        let config = test_config(7);
        let rules = StandardRules;
        // Raw 3: d100 reads 4 (hit), orc d4 reads 4, damage 4 - 2 kills a 1 hp player.
        let rng = FixedRng(3);
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        let report = match engine.step(Command::Wait).unwrap() {
            StepOutcome::Turn(report) => report,
            other => panic!("expected a turn, got {other:?}"),
        };
        assert!(report.events.contains(&WorldEvent::Attacked {
            attacker: orc,
            defender: EntityId::PLAYER,
            damage: 2,
        }));
        assert_eq!(report.events.last(), Some(&WorldEvent::GameOver));
        assert_eq!(state.turn.phase, EnginePhase::GameOver);

        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);
        assert_eq!(
            engine.step(Command::Wait),
            Err(EngineError::NotIdle {
                phase: EnginePhase::GameOver,
            })
        );
    }

    #[test]
    fn stepping_a_mid_turn_state_is_refused() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        state.turn.phase = EnginePhase::Processing;
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        assert_eq!(
            engine.step(Command::MoveUp),
            Err(EngineError::NotIdle {
                phase: EnginePhase::Processing,
            })
        );
    }

    #[test]
    fn walking_over_an_item_picks_it_up() {
        let mut state = open_state(7, 5, Position::new(2, 2));
        state.entities.player.hp = ResourceMeter::new(20, 30);
        let medkit = state.spawn_item("Medkit", Position::new(2, 1), 8).unwrap();
        let config = test_config(7);
        let rules = StandardRules;
        let rng = PcgRng;
        let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);

        let report = match engine.step(Command::MoveUp).unwrap() {
            StepOutcome::Turn(report) => report,
            other => panic!("expected a turn, got {other:?}"),
        };
        assert!(report.events.contains(&WorldEvent::PickedUp {
            entity: EntityId::PLAYER,
            item: medkit,
            healed: 8,
        }));
        assert_eq!(state.entities.player.hp.current, 28);
        assert!(state.entities.items.is_empty());
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let script = [
            Command::MoveRight,
            Command::MoveRight,
            Command::Wait,
            Command::MoveUp,
        ];

        let run = |seed: u64| {
            let mut state = open_state(seed, 5, Position::new(1, 2));
            state
                .spawn_npc("Orc", Position::new(4, 2), 16, 4, 1)
                .unwrap();
            let config = test_config(seed);
            let rules = StandardRules;
            let rng = PcgRng;
            let mut engine = GameEngine::new(&mut state, &config, &rules, &rng);
            let mut outcomes = Vec::new();
            for command in script {
                outcomes.push(engine.step(command).unwrap());
            }
            (state, outcomes)
        };

        assert_eq!(run(41), run(41));
    }
}
