/// Lifecycle of the turn engine.
///
/// `Processing` only exists inside a single [`step`](crate::engine::GameEngine::step)
/// call; observing it from outside means a step aborted part-way, and the
/// state can no longer be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnginePhase {
    #[default]
    Idle,
    Processing,
    GameOver,
}

/// Turn bookkeeping: how many turns have completed and where the engine is
/// in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Completed turns. Only advances when a command is actually consumed
    /// into a legal action; rejected moves leave it untouched.
    pub counter: u64,

    /// Sequential action identifier incremented for every executed action,
    /// player and hostile alike. Mixed into derived RNG seeds so each
    /// action's rolls are independent yet replayable.
    pub action_nonce: u64,

    /// Current lifecycle phase.
    pub phase: EnginePhase,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }
}
