//! Host-facing session layer for the turn engine.
//!
//! Where `game-core` is a pure state machine, this crate supplies the
//! plumbing a real host needs around it:
//!
//! - [`GameSession`]: owns the authoritative state and advances it one
//!   polled tick at a time
//! - [`CommandSlot`]: the last-write-wins mailbox input surfaces write into
//! - [`EventLog`]: a bounded buffer of world events for slow consumers
//!
//! The layer is deliberately synchronous. Hosts that need concurrency put
//! the session behind their own loop and hand out [`CommandSlot`] handles.

pub mod error;
pub mod events;
pub mod mailbox;
pub mod session;

pub use error::{Result, RuntimeError};
pub use events::EventLog;
pub use mailbox::CommandSlot;
pub use session::{GameSession, TickOutcome};
