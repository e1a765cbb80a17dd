//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`S4D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use slice4d_core::{GameSettings, ProjectionSettings};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where levels live and which one comes first
    #[serde(default)]
    pub level: LevelConfig,
    /// Section layout
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Delays and tick rate
    #[serde(default)]
    pub timing: TimingConfig,
    /// Level editing
    #[serde(default)]
    pub edit: EditConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`S4D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // S4D_EDIT__ENABLED=true -> edit.enabled = true
        figment = figment.merge(Env::prefixed("S4D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Path of the first level to play
    pub fn first_level_path(&self) -> PathBuf {
        self.level.path_of(&self.level.first)
    }

    /// Settings handed to the game core
    ///
    /// Negative delays clamp to zero. Delays that are not a valid duration
    /// (infinite, NaN or too large) fall back to the default with a warning.
    pub fn to_game_settings(&self) -> GameSettings {
        let defaults = TimingConfig::default();
        let timing = &self.timing;
        GameSettings {
            projection: self.projection.to_projection_settings(),
            transition_delay: secs(
                "transition_delay_secs",
                timing.transition_delay_secs,
                defaults.transition_delay_secs,
            ),
            panel_duration: secs(
                "panel_duration_secs",
                timing.panel_duration_secs,
                defaults.panel_duration_secs,
            ),
            level_complete_delay: secs(
                "level_complete_delay_secs",
                timing.level_complete_delay_secs,
                defaults.level_complete_delay_secs,
            ),
            edit_enabled: self.edit.enabled,
            save_path: self.edit.save_path.clone(),
        }
    }
}

fn secs(key: &str, value: f32, default: f32) -> Duration {
    if value.is_nan() {
        log::warn!("timing.{} is NaN, using {}", key, default);
        return Duration::from_secs_f32(default);
    }
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or_else(|e| {
        log::warn!("timing.{} = {} is not a duration ({}), using {}", key, value, e, default);
        Duration::from_secs_f32(default)
    })
}

/// Level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Directory level file names are resolved against
    pub directory: PathBuf,
    /// File name of the first level
    pub first: String,
}

impl LevelConfig {
    /// Resolve a level file name (as found in `next_level_file_name`)
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("levels"),
            first: "tutorial.ron".to_string(),
        }
    }
}

/// Projection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Side of one grid cell in scene units
    pub cell_size: f32,
    /// Height of the player's eye above its cell origin
    pub eye_height: f32,
}

impl ProjectionConfig {
    pub fn to_projection_settings(&self) -> ProjectionSettings {
        ProjectionSettings {
            cell_size: self.cell_size,
            eye_height: self.eye_height,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let settings = ProjectionSettings::default();
        Self {
            cell_size: settings.cell_size,
            eye_height: settings.eye_height,
        }
    }
}

/// Timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Length of the disappear/appear animations
    pub transition_delay_secs: f32,
    /// How long info messages stay up
    pub panel_duration_secs: f32,
    /// Pause after "Level complete!" before the next level
    pub level_complete_delay_secs: f32,
    /// Fixed simulation ticks per second
    pub tick_rate: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_delay_secs: 2.0,
            panel_duration_secs: 2.0,
            level_complete_delay_secs: 2.0,
            tick_rate: 60,
        }
    }
}

/// Edit mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditConfig {
    /// Enable edit commands and edit keys
    pub enabled: bool,
    /// Where `SaveLevel` writes the edited level
    pub save_path: PathBuf,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            save_path: PathBuf::from("levels/edited.ron"),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
