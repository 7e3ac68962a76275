//! End-to-end session behavior driven the way a host drives it: submit a
//! command name, tick, poll the read accessors.

use game_core::{
    ActorState, Command, EnginePhase, EntityId, GameConfig, GameState, Position, RejectReason,
    ResourceMeter, TerrainGrid, WorldEvent,
};
use runtime::{GameSession, RuntimeError, TickOutcome};

fn hall_config(seed: u64) -> GameConfig {
    GameConfig::new(5, 5, seed)
}

/// A fully walkable 5x5 hall with only the player in it.
fn hall_state(seed: u64, player_at: Position) -> GameState {
    let terrain = TerrainGrid::filled(5, 5, true);
    let player = ActorState::player(player_at);
    GameState::new(seed, terrain, player).expect("player fits on open terrain")
}

fn hall_session(player_at: Position) -> GameSession {
    GameSession::from_state(hall_config(7), hall_state(7, player_at))
}

#[test]
fn scripted_walk_follows_the_grid() {
    let mut session = hall_session(Position::new(2, 2));

    session.submit_command("MoveUp").expect("known command");
    let outcome = session.tick().expect("turn resolves");
    let TickOutcome::Turn(report) = outcome else {
        panic!("expected a resolved turn, got {outcome:?}");
    };
    assert_eq!(report.turn, 1);
    assert_eq!(session.player_position(), Position::new(2, 1));

    session.submit_command("MoveLeft").expect("known command");
    session.tick().expect("turn resolves");

    assert_eq!(session.turn(), 2);
    assert_eq!(session.player_position(), Position::new(1, 1));
    assert_eq!(session.phase(), EnginePhase::Idle);

    assert_eq!(
        session.drain_events(),
        vec![
            WorldEvent::Moved {
                entity: EntityId::PLAYER,
                from: Position::new(2, 2),
                to: Position::new(2, 1),
            },
            WorldEvent::Moved {
                entity: EntityId::PLAYER,
                from: Position::new(2, 1),
                to: Position::new(1, 1),
            },
        ]
    );
}

#[test]
fn border_moves_are_refused_in_place() {
    let mut session = hall_session(Position::new(0, 0));

    session.submit_command("MoveLeft").expect("known command");
    let outcome = session.tick().expect("tick succeeds");

    let TickOutcome::Rejected(rejection) = outcome else {
        panic!("expected a rejection, got {outcome:?}");
    };
    assert_eq!(rejection.command, Command::MoveLeft);
    assert_eq!(rejection.destination, Position::new(-1, 0));
    assert_eq!(rejection.reason, RejectReason::OutOfBounds);

    assert_eq!(session.player_position(), Position::new(0, 0));
    assert_eq!(session.turn(), 0);
    assert!(session.drain_events().is_empty());
}

#[test]
fn unknown_names_never_reach_the_queue() {
    let mut session = hall_session(Position::new(2, 2));

    let err = session.submit_command("MoveNorth").unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::InvalidCommand { ref name } if name == "MoveNorth"
    ));
    assert!(!session.has_pending_command());

    // Names are exact; no case folding at the boundary.
    assert!(session.submit_command("moveup").is_err());

    assert_eq!(session.tick().expect("tick succeeds"), TickOutcome::Idle);
    assert_eq!(session.turn(), 0);
}

#[test]
fn empty_mailbox_ticks_are_idle() {
    let mut session = hall_session(Position::new(2, 2));

    for _ in 0..3 {
        assert_eq!(session.tick().expect("tick succeeds"), TickOutcome::Idle);
    }
    assert_eq!(session.turn(), 0);
    assert_eq!(session.player_position(), Position::new(2, 2));
}

#[test]
fn rapid_submissions_keep_only_the_newest() {
    let mut session = hall_session(Position::new(2, 2));

    session.submit(Command::MoveUp);
    session.submit(Command::MoveDown);
    session.submit(Command::MoveRight);

    session.tick().expect("turn resolves");
    assert_eq!(session.player_position(), Position::new(3, 2));
    assert_eq!(session.turn(), 1);

    // The displaced submissions are gone, not queued behind it.
    assert_eq!(session.tick().expect("tick succeeds"), TickOutcome::Idle);
    assert_eq!(session.turn(), 1);
}

#[test]
fn waiting_passes_the_turn_in_place() {
    let mut session = hall_session(Position::new(2, 2));

    session.submit_command("Wait").expect("known command");
    session.tick().expect("turn resolves");

    assert_eq!(session.turn(), 1);
    assert_eq!(session.player_position(), Position::new(2, 2));
    assert_eq!(
        session.drain_events(),
        vec![WorldEvent::Waited {
            entity: EntityId::PLAYER,
        }]
    );
}

#[test]
fn walking_onto_a_medkit_heals() {
    let mut state = hall_state(7, Position::new(2, 2));
    state.entities.player.hp = ResourceMeter::new(20, 30);
    let medkit = state
        .spawn_item("Medkit", Position::new(3, 2), 8)
        .expect("open tile");

    let mut session = GameSession::from_state(hall_config(7), state);
    session.submit(Command::MoveRight);
    session.tick().expect("turn resolves");

    assert_eq!(session.player_hp().current, 28);
    assert!(session.state().entities.item(medkit).is_none());
    assert!(session.drain_events().contains(&WorldEvent::PickedUp {
        entity: EntityId::PLAYER,
        item: medkit,
        healed: 8,
    }));
}

#[test]
fn a_lethal_beating_ends_the_run() {
    let mut state = hall_state(11, Position::new(2, 2));
    state.entities.player.hp = ResourceMeter::new(1, 30);
    state
        .spawn_npc("Orc", Position::new(3, 2), 16, 4, 1)
        .expect("open tile");

    let mut session = GameSession::from_state(hall_config(11), state);

    // At 1 hp next to an orc, some wait ends in a landed blow.
    for _ in 0..100 {
        session.submit(Command::Wait);
        session.tick().expect("tick succeeds");
        if session.is_game_over() {
            break;
        }
    }
    assert!(session.is_game_over());
    assert_eq!(session.drain_events().last(), Some(&WorldEvent::GameOver));

    // A finished run stops consuming input.
    let turns_survived = session.turn();
    session.submit(Command::MoveUp);
    assert_eq!(session.tick().expect("tick succeeds"), TickOutcome::GameOver);
    assert_eq!(session.turn(), turns_survived);
    assert!(session.has_pending_command());
}

#[test]
fn a_mid_turn_state_refuses_to_tick() {
    let mut state = hall_state(7, Position::new(2, 2));
    state.turn.phase = EnginePhase::Processing;

    let mut session = GameSession::from_state(hall_config(7), state);
    session.submit(Command::MoveUp);

    assert!(matches!(session.tick(), Err(RuntimeError::ReentrantTick)));
}

#[test]
fn engine_failures_poison_the_session() {
    let mut state = hall_state(7, Position::new(2, 2));
    // Desync the occupancy index so the move fails mid-resolution.
    state
        .world
        .tile_map
        .remove_occupant(&Position::new(2, 2), EntityId::PLAYER);

    let mut session = GameSession::from_state(hall_config(7), state);
    session.submit(Command::MoveUp);
    assert!(matches!(session.tick(), Err(RuntimeError::Engine(_))));

    // The phase gate stays closed afterwards.
    session.submit(Command::MoveUp);
    assert!(matches!(session.tick(), Err(RuntimeError::ReentrantTick)));
}

#[test]
fn identical_seeds_replay_identically() {
    let script = [
        Command::MoveRight,
        Command::MoveDown,
        Command::Wait,
        Command::MoveLeft,
        Command::MoveUp,
        Command::MoveUp,
        Command::MoveRight,
        Command::MoveDown,
    ];

    let run = |seed: u64| {
        let mut session =
            GameSession::new(GameConfig::new(48, 32, seed)).expect("config is valid");
        let mut outcomes = Vec::new();
        for command in script {
            session.submit(command);
            outcomes.push(session.tick().expect("tick succeeds"));
        }
        (outcomes, session.state().clone())
    };

    assert_eq!(run(2024), run(2024));
}

#[test]
fn rejected_config_never_opens_a_session() {
    let config = GameConfig::new(2, 5, 7);
    assert!(matches!(
        GameSession::new(config),
        Err(RuntimeError::Config(_))
    ));
}
