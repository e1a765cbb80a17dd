//! Key bindings
//!
//! Play keys, on an AZERTY layout:
//!
//! | key | action |
//! |---|---|
//! | Z / S | step forward / backward |
//! | Q / D | step left / right |
//! | A / E | turn left / right |
//! | W / C | rotate the 4D basis + / - |
//! | Escape | quit |
//!
//! Edit keys, only mapped while edit mode is on:
//!
//! | key | action |
//! |---|---|
//! | ArrowUp / ArrowDown | nudge the player up / down one cell |
//! | Numpad1-3 | place a green / orange / red half cube |
//! | Numpad4-6 | place a green / orange / red cube |
//! | Numpad7-9 | place a palm tree / conifer / broadleaf |
//! | L | place a light |
//! | R | remove the cell under the player |
//! | M | save the level |
//! | F5 | refresh the section |

use slice4d_core::{EditCommand, GameCommand, RotationDirection, Step, Turn};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// What a key press asks for
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Forward to the game
    Game(GameCommand),
    /// Leave the session
    Quit,
}

/// Maps key events to actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyBindings {
    edit_mode: bool,
}

impl KeyBindings {
    pub fn new(edit_mode: bool) -> Self {
        Self { edit_mode }
    }

    /// Map a keyboard event to an action
    ///
    /// Only presses count. Returns `None` for releases and unbound keys, and
    /// for edit keys while edit mode is off.
    pub fn map_keyboard(&self, key: KeyCode, state: ElementState) -> Option<InputAction> {
        if state != ElementState::Pressed {
            return None;
        }
        Self::map_play(key)
            .or_else(|| {
                self.edit_mode
                    .then(|| Self::map_edit(key))
                    .flatten()
                    .map(GameCommand::Edit)
                    .map(InputAction::Game)
            })
    }

    fn map_play(key: KeyCode) -> Option<InputAction> {
        let command = match key {
            KeyCode::Escape => return Some(InputAction::Quit),
            KeyCode::KeyZ => GameCommand::Step(Step::Forward),
            KeyCode::KeyS => GameCommand::Step(Step::Backward),
            KeyCode::KeyQ => GameCommand::Step(Step::Left),
            KeyCode::KeyD => GameCommand::Step(Step::Right),
            KeyCode::KeyA => GameCommand::Turn(Turn::Left),
            KeyCode::KeyE => GameCommand::Turn(Turn::Right),
            KeyCode::KeyW => GameCommand::Rotate(RotationDirection::Positive),
            KeyCode::KeyC => GameCommand::Rotate(RotationDirection::Negative),
            _ => return None,
        };
        Some(InputAction::Game(command))
    }

    fn map_edit(key: KeyCode) -> Option<EditCommand> {
        let place = |content: &str| Some(EditCommand::Place(content.to_string()));
        match key {
            KeyCode::ArrowUp => Some(EditCommand::VerticalNudge(1)),
            KeyCode::ArrowDown => Some(EditCommand::VerticalNudge(-1)),
            KeyCode::Numpad1 => place("halfGreenCube"),
            KeyCode::Numpad2 => place("halfOrangeCube"),
            KeyCode::Numpad3 => place("halfRedCube"),
            KeyCode::Numpad4 => place("greenCube"),
            KeyCode::Numpad5 => place("orangeCube"),
            KeyCode::Numpad6 => place("redCube"),
            KeyCode::Numpad7 => place("ground_palmtree"),
            KeyCode::Numpad8 => place("ground_conifer"),
            KeyCode::Numpad9 => place("ground_broadleaf"),
            KeyCode::KeyL => place("pointLight"),
            KeyCode::KeyR => Some(EditCommand::Remove),
            KeyCode::KeyM => Some(EditCommand::SaveLevel),
            KeyCode::F5 => Some(EditCommand::Refresh),
            _ => None,
        }
    }
}

/// Look a key code up by name
///
/// Accepts the `winit` variant name (`"KeyZ"`, `"ArrowUp"`, `"Numpad4"`) or,
/// for letters and digits, the bare character (`"z"`, `"4"` for `Numpad4`).
/// Used by hosts without a window that read keys as text.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return match c.to_ascii_lowercase() {
            'a' => Some(KeyCode::KeyA),
            'c' => Some(KeyCode::KeyC),
            'd' => Some(KeyCode::KeyD),
            'e' => Some(KeyCode::KeyE),
            'l' => Some(KeyCode::KeyL),
            'm' => Some(KeyCode::KeyM),
            'q' => Some(KeyCode::KeyQ),
            'r' => Some(KeyCode::KeyR),
            's' => Some(KeyCode::KeyS),
            'w' => Some(KeyCode::KeyW),
            'z' => Some(KeyCode::KeyZ),
            '1' => Some(KeyCode::Numpad1),
            '2' => Some(KeyCode::Numpad2),
            '3' => Some(KeyCode::Numpad3),
            '4' => Some(KeyCode::Numpad4),
            '5' => Some(KeyCode::Numpad5),
            '6' => Some(KeyCode::Numpad6),
            '7' => Some(KeyCode::Numpad7),
            '8' => Some(KeyCode::Numpad8),
            '9' => Some(KeyCode::Numpad9),
            _ => None,
        };
    }
    let key = match name {
        "Escape" => KeyCode::Escape,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "F5" => KeyCode::F5,
        "KeyA" => KeyCode::KeyA,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyW" => KeyCode::KeyW,
        "KeyZ" => KeyCode::KeyZ,
        "Numpad1" => KeyCode::Numpad1,
        "Numpad2" => KeyCode::Numpad2,
        "Numpad3" => KeyCode::Numpad3,
        "Numpad4" => KeyCode::Numpad4,
        "Numpad5" => KeyCode::Numpad5,
        "Numpad6" => KeyCode::Numpad6,
        "Numpad7" => KeyCode::Numpad7,
        "Numpad8" => KeyCode::Numpad8,
        "Numpad9" => KeyCode::Numpad9,
        _ => return None,
    };
    Some(key)
}
