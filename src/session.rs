//! Headless game session
//!
//! Runs the game without a window: key presses and waits are read as text,
//! renderer calls are logged, and HUD output goes to stdout. Script lines:
//!
//! - `wait <secs>` - let game time pass
//! - `quit` - leave the session
//! - anything else - a key name (`z`, `KeyW`, `ArrowUp`, `F5`, ...)
//!
//! Blank lines and lines starting with `#` are ignored.

use std::collections::HashMap;

use slice4d_core::{
    Compass, ContentRegistry, Game, GameError, Hud, Level, LevelLoadError, LevelStatus,
    Orientation, RenderHandle, SectionAnimation, SectionId, SectionRenderer,
};
use slice4d_input::{key_from_name, InputAction, KeyBindings};
use winit::event::ElementState;

use crate::config::AppConfig;
use crate::systems::SimulationSystem;

/// Upper bound on ticks spent draining a transition before a level swap
const MAX_DRAIN_TICKS: u32 = 100_000;

/// Renderer that only keeps track of live handles and logs every call
#[derive(Debug, Default)]
pub struct LogRenderer {
    next_handle: u64,
    live: HashMap<RenderHandle, (SectionId, String)>,
    player: Option<[f32; 3]>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instantiated, not yet destroyed objects
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Last camera position handed over
    pub fn player(&self) -> Option<[f32; 3]> {
        self.player
    }
}

impl SectionRenderer for LogRenderer {
    fn instantiate(
        &mut self,
        section: SectionId,
        content: &str,
        local_position: [f32; 3],
        orientation: Orientation,
        instant: bool,
    ) -> RenderHandle {
        self.next_handle += 1;
        let handle = RenderHandle::new(self.next_handle);
        log::trace!(
            "instantiate {:?} '{}' in {:?} at {:?} (yaw {}, scale {:?}, instant {})",
            handle,
            content,
            section,
            local_position,
            orientation.yaw_degrees(),
            orientation.scale(),
            instant
        );
        self.live.insert(handle, (section, content.to_string()));
        handle
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        log::trace!("set_visible {:?} {}", handle, visible);
    }

    fn destroy(&mut self, handle: RenderHandle) {
        match self.live.remove(&handle) {
            Some((section, content)) => log::trace!("destroy {:?} '{}' of {:?}", handle, content, section),
            None => log::warn!("destroy of unknown handle {:?}", handle),
        }
    }

    fn animate(&mut self, handle: RenderHandle, animation: SectionAnimation, instant: bool) {
        log::trace!("animate {:?} {:?} (instant {})", handle, animation, instant);
    }

    fn place_player(&mut self, position: [f32; 3]) {
        log::debug!("place_player {:?}", position);
        self.player = Some(position);
    }

    fn translate_section(&mut self, section: SectionId, delta: [f32; 3]) {
        log::debug!("translate_section {:?} by {:?}", section, delta);
    }
}

/// HUD printing to stdout
#[derive(Debug, Default)]
pub struct LogHud {
    message: Option<String>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message currently on screen
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Hud for LogHud {
    fn show_message(&mut self, text: &str, duration_secs: f32) {
        println!("[panel] {}", text);
        log::debug!("Panel shown for {}s", duration_secs);
        self.message = Some(text.to_string());
    }

    fn hide_message(&mut self) {
        log::debug!("Panel hidden");
        self.message = None;
    }

    fn update_compass(&mut self, compass: &Compass) {
        println!("[compass] {}", compass);
    }
}

/// Session that could not go on
#[derive(Debug)]
pub enum SessionError {
    /// A level failed to load
    Level {
        path: std::path::PathBuf,
        error: LevelLoadError,
    },
    /// A transition never finished
    Stalled,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Level { path, error } => write!(f, "{:?}: {}", path, error),
            SessionError::Stalled => write!(f, "Section transition never finished"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Level { error, .. } => Some(error),
            SessionError::Stalled => None,
        }
    }
}

/// What the caller should do after a script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Quit requested, or the last level was finished
    Stop,
}

/// A running headless session
pub struct Session {
    config: AppConfig,
    registry: ContentRegistry,
    bindings: KeyBindings,
    simulation: SimulationSystem,
    game: Game<LogRenderer, LogHud>,
    levels_played: u32,
}

impl Session {
    /// Load the configured first level and start playing it
    pub fn start(config: AppConfig) -> Result<Self, SessionError> {
        let registry = ContentRegistry::standard();
        let path = config.first_level_path();
        let level = load_level(&path, &registry)?;
        let game = Game::new(
            level,
            registry.clone(),
            config.to_game_settings(),
            LogRenderer::new(),
            LogHud::new(),
        );
        Ok(Self {
            bindings: KeyBindings::new(config.edit.enabled),
            simulation: SimulationSystem::new(config.timing.tick_rate),
            config,
            registry,
            game,
            levels_played: 1,
        })
    }

    pub fn game(&self) -> &Game<LogRenderer, LogHud> {
        &self.game
    }

    /// Number of levels started so far, the current one included
    pub fn levels_played(&self) -> u32 {
        self.levels_played
    }

    /// Execute one script line
    pub fn run_line(&mut self, line: &str) -> Result<Flow, SessionError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("quit"), None) => return Ok(Flow::Stop),
            (Some("wait"), Some(secs)) => {
                return match secs.parse::<f32>() {
                    Ok(secs) if secs.is_finite() && secs >= 0.0 => self.wait(secs),
                    _ => {
                        log::warn!("Not a duration: '{}'", secs);
                        Ok(Flow::Continue)
                    }
                };
            }
            _ => {}
        }

        let Some(key) = key_from_name(line) else {
            log::warn!("Unknown key '{}'", line);
            return Ok(Flow::Continue);
        };
        match self.bindings.map_keyboard(key, ElementState::Pressed) {
            Some(InputAction::Quit) => Ok(Flow::Stop),
            Some(InputAction::Game(command)) => {
                if let Err(e) = self.game.handle_command(command) {
                    self.report(e);
                }
                Ok(Flow::Continue)
            }
            None => {
                log::debug!("Key {:?} is not bound", key);
                Ok(Flow::Continue)
            }
        }
    }

    /// Let `secs` of game time pass, moving on to the next level when one completes
    pub fn wait(&mut self, secs: f32) -> Result<Flow, SessionError> {
        let mut budget = self.simulation.ticks_for(secs);
        while budget > 0 {
            let result = self.simulation.run_ticks(&mut self.game, budget);
            budget -= result.ticks;
            if let LevelStatus::Complete { next_level } = result.status {
                if self.next_level(&next_level)? == Flow::Stop {
                    return Ok(Flow::Stop);
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn next_level(&mut self, file_name: &str) -> Result<Flow, SessionError> {
        if file_name.is_empty() {
            println!("[session] last level finished");
            return Ok(Flow::Stop);
        }
        let path = self.config.level.path_of(file_name);
        let level = load_level(&path, &self.registry)?;

        let mut drained = 0;
        while self.game.holds_input() {
            if drained == MAX_DRAIN_TICKS {
                return Err(SessionError::Stalled);
            }
            self.game.tick(self.simulation.tick_secs());
            drained += 1;
        }
        if let Err(e) = self.game.load_level(level) {
            self.report(e);
            return Err(SessionError::Stalled);
        }
        self.levels_played += 1;
        println!("[session] level {} ({:?})", self.levels_played, path);
        Ok(Flow::Continue)
    }

    fn report(&self, error: GameError) {
        match error {
            GameError::Transition(_) | GameError::EditDisabled => log::debug!("{}", error),
            _ => log::warn!("{}", error),
        }
    }
}

fn load_level(path: &std::path::Path, registry: &ContentRegistry) -> Result<Level, SessionError> {
    Level::load(path, registry).map_err(|error| SessionError::Level {
        path: path.to_path_buf(),
        error,
    })
}
