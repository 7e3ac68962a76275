use crate::action::ActionTransition;
use crate::combat;
use crate::rng::{RngOracle, compute_seed, seed_context};
use crate::state::{EntityId, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("actor {0} is dead")]
    DeadActor(EntityId),

    #[error("{attacker} cannot reach {defender}")]
    NotAdjacent {
        attacker: EntityId,
        defender: EntityId,
    },

    #[error("occupancy desync for actor {actor} at {position}")]
    OccupancyDesync { actor: EntityId, position: Position },
}

/// What an attack did to the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Miss,
    Hit { damage: u32, lethal: bool },
}

/// Melee swing against an adjacent actor.
///
/// The attacker stays on its tile; bumping into an enemy spends the turn
/// on this action instead of a move. A lethal hit removes the defender
/// from the occupancy index, freeing the tile, while the actor record
/// itself is kept for inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackAction {
    pub attacker: EntityId,
    pub defender: EntityId,
}

impl AttackAction {
    pub fn new(attacker: EntityId, defender: EntityId) -> Self {
        Self { attacker, defender }
    }
}

impl ActionTransition for AttackAction {
    type Error = AttackError;
    type Outcome = AttackOutcome;

    fn actor(&self) -> EntityId {
        self.attacker
    }

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let attacker = state
            .entities
            .actor(self.attacker)
            .ok_or(AttackError::ActorNotFound(self.attacker))?;
        if !attacker.is_alive() {
            return Err(AttackError::DeadActor(self.attacker));
        }

        let defender = state
            .entities
            .actor(self.defender)
            .ok_or(AttackError::ActorNotFound(self.defender))?;
        if !defender.is_alive() {
            return Err(AttackError::DeadActor(self.defender));
        }

        if attacker.position.manhattan_distance(defender.position) != 1 {
            return Err(AttackError::NotAdjacent {
                attacker: self.attacker,
                defender: self.defender,
            });
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        rng: &dyn RngOracle,
    ) -> Result<AttackOutcome, Self::Error> {
        let attacker = state
            .entities
            .actor(self.attacker)
            .ok_or(AttackError::ActorNotFound(self.attacker))?;
        let power = attacker.power;

        let hit_seed = compute_seed(
            state.game_seed,
            state.turn.action_nonce,
            self.attacker.0,
            seed_context::HIT_ROLL,
        );
        if !combat::check_hit(rng.roll_d100(hit_seed)) {
            return Ok(AttackOutcome::Miss);
        }

        let damage_seed = compute_seed(
            state.game_seed,
            state.turn.action_nonce,
            self.attacker.0,
            seed_context::DAMAGE_ROLL,
        );
        let power_roll = rng.roll_die(damage_seed, power.max(1));

        let defender = state
            .entities
            .actor_mut(self.defender)
            .ok_or(AttackError::ActorNotFound(self.defender))?;
        let damage = combat::melee_damage(power_roll, defender.defense);
        defender.hp.deplete(damage);
        let lethal = !defender.is_alive();
        let position = defender.position;

        if lethal && !state.world.tile_map.remove_occupant(&position, self.defender) {
            return Err(AttackError::OccupancyDesync {
                actor: self.defender,
                position,
            });
        }

        Ok(AttackOutcome::Hit { damage, lethal })
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let defender = state
            .entities
            .actor(self.defender)
            .ok_or(AttackError::ActorNotFound(self.defender))?;
        let listed = state
            .world
            .tile_map
            .occupants(&defender.position)
            .is_some_and(|slots| slots.contains(&self.defender));

        // A dead defender must have vacated its tile; a living one must
        // still be indexed there.
        if listed == defender.is_alive() {
            Ok(())
        } else {
            Err(AttackError::OccupancyDesync {
                actor: self.defender,
                position: defender.position,
            })
        }
    }
}
