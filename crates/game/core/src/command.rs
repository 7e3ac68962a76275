//! Player intent vocabulary.
//!
//! A [`Command`] is the complete set of inputs the engine accepts from a
//! host: the four cardinal moves plus an explicit wait. There is no "none"
//! variant; an empty command slot already expresses the absence of intent.

/// Discrete player intent consumed by the engine, at most one per tick.
///
/// Variant names double as the wire names accepted at the host boundary
/// (`"MoveUp"`, `"MoveDown"`, `"MoveLeft"`, `"MoveRight"`, `"Wait"`), so
/// parsing is a plain [`FromStr`](std::str::FromStr) call.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Pass the turn without moving. Hostiles still act.
    Wait,
}

impl Command {
    /// Grid delta for movement commands, `None` for [`Command::Wait`].
    ///
    /// The y axis grows downward, so `MoveUp` is `(0, -1)`.
    pub fn delta(self) -> Option<(i32, i32)> {
        match self {
            Command::MoveUp => Some((0, -1)),
            Command::MoveDown => Some((0, 1)),
            Command::MoveLeft => Some((-1, 0)),
            Command::MoveRight => Some((1, 0)),
            Command::Wait => None,
        }
    }

    /// The boundary name of this command.
    pub fn name(self) -> &'static str {
        self.into()
    }
}
