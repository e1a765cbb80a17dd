//! Commands accepted by the game
//!
//! This is everything the input collaborator can ask of the core. Key
//! bindings live elsewhere; the core only sees these.

use slice4d_math::RotationDirection;

use crate::player::{Step, Turn};

/// Level editing, only honoured when edit mode is enabled
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditCommand {
    /// Put content at the player's cell, replacing whatever is there
    Place(String),
    /// Empty the player's cell
    Remove,
    /// Move the player up or down by whole cells
    VerticalNudge(i32),
    /// Rebuild the section under the unchanged basis, showing pending edits
    Refresh,
    /// Write the edited level to the configured save path
    SaveLevel,
}

/// A request from the player
#[derive(Clone, Debug, PartialEq)]
pub enum GameCommand {
    /// Walk one cell relative to the facing
    Step(Step),
    /// Quarter turn in place
    Turn(Turn),
    /// Raw section-frame movement, `[right, up, forward]`
    Move([f32; 3]),
    /// 90° hyperplane rotation around the facing axis
    Rotate(RotationDirection),
    Edit(EditCommand),
}

impl GameCommand {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            GameCommand::Step(_) => "step",
            GameCommand::Turn(_) => "turn",
            GameCommand::Move(_) => "move",
            GameCommand::Rotate(_) => "rotate",
            GameCommand::Edit(EditCommand::Place(_)) => "place",
            GameCommand::Edit(EditCommand::Remove) => "remove",
            GameCommand::Edit(EditCommand::VerticalNudge(_)) => "nudge",
            GameCommand::Edit(EditCommand::Refresh) => "refresh",
            GameCommand::Edit(EditCommand::SaveLevel) => "save",
        }
    }
}
