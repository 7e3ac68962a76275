//! Single-slot command channel between input surfaces and the session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use game_core::Command;

/// Last-write-wins mailbox holding at most one pending [`Command`].
///
/// Producers may submit from any thread at any rate; a newer command simply
/// replaces the one still waiting. The session drains the slot with
/// [`take`](CommandSlot::take) at the start of each tick, so at most one
/// command is consumed per turn.
///
/// The lock only ever guards a plain `Option` store, so a poisoned lock
/// still holds a coherent value and is recovered instead of propagated.
#[derive(Debug, Default)]
pub struct CommandSlot {
    pending: Mutex<Option<Command>>,
}

impl CommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a command, returning the one it displaced, if any.
    pub fn submit(&self, command: Command) -> Option<Command> {
        self.lock().replace(command)
    }

    /// Removes and returns the pending command.
    pub fn take(&self) -> Option<Command> {
        self.lock().take()
    }

    /// Whether a command is waiting, without consuming it.
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Command>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
