//! Game orchestration
//!
//! [`Game`] owns the level, the basis, the player and the section transition,
//! and drives the renderer and HUD collaborators. The host calls
//! [`Game::tick`] once per fixed step and forwards player input through
//! [`Game::handle_command`]; nothing in here assumes a particular engine.

use std::path::PathBuf;
use std::time::Duration;

use slice4d_math::{BasisError, Basis, IVec4, RotationDirection, Vec4};

use crate::command::{EditCommand, GameCommand};
use crate::compass::Compass;
use crate::level::{Level, LevelSaveError};
use crate::player::PlayerPositionTracker;
use crate::ports::{Hud, SectionRenderer};
use crate::projector::{ProjectionSettings, Projector};
use crate::registry::{ContentKind, ContentRegistry};
use crate::scheduler::{Scheduler, TimerKey};
use crate::transition::{LevelTransitionController, TransitionError};
use crate::Cell;

/// Tunables of a game session
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub projection: ProjectionSettings,
    /// How long the disappear/appear animations run before the swap completes
    pub transition_delay: Duration,
    /// How long an info message stays on screen
    pub panel_duration: Duration,
    /// Pause between "level complete" and reporting completion
    pub level_complete_delay: Duration,
    pub edit_enabled: bool,
    pub save_path: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            projection: ProjectionSettings::default(),
            transition_delay: Duration::from_secs(2),
            panel_duration: Duration::from_secs(2),
            level_complete_delay: Duration::from_secs(2),
            edit_enabled: false,
            save_path: PathBuf::from("levels/edited.ron"),
        }
    }
}

/// Progress through the current level
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelStatus {
    Playing,
    /// Enough collectibles were picked up; `next_level` should be loaded
    Complete { next_level: String },
}

/// Deferred work queued on the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    HidePanel,
    FinishTransition,
    LevelComplete,
}

/// A command the game refused
#[derive(Debug)]
pub enum GameError {
    /// Input is held while a section transition runs
    Transition(TransitionError),
    /// Rotation with a facing aligned to no horizontal axis
    Basis(BasisError),
    /// Edit command while edit mode is off
    EditDisabled,
    /// Placement of content the registry does not know
    UnknownContent(String),
    Save(LevelSaveError),
}

impl From<TransitionError> for GameError {
    fn from(e: TransitionError) -> Self {
        GameError::Transition(e)
    }
}

impl From<BasisError> for GameError {
    fn from(e: BasisError) -> Self {
        GameError::Basis(e)
    }
}

impl From<LevelSaveError> for GameError {
    fn from(e: LevelSaveError) -> Self {
        GameError::Save(e)
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Transition(e) => write!(f, "{}", e),
            GameError::Basis(e) => write!(f, "{}", e),
            GameError::EditDisabled => write!(f, "Edit mode is disabled"),
            GameError::UnknownContent(content) => write!(f, "Unknown content '{}'", content),
            GameError::Save(e) => write!(f, "Failed to save level: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Transition(e) => Some(e),
            GameError::Basis(e) => Some(e),
            GameError::Save(e) => Some(e),
            _ => None,
        }
    }
}

/// A running game session
pub struct Game<R, H> {
    settings: GameSettings,
    registry: ContentRegistry,
    level: Level,
    basis: Basis,
    player: PlayerPositionTracker,
    projector: Projector,
    transition: LevelTransitionController,
    scheduler: Scheduler<GameEvent>,
    panel_timer: Option<TimerKey>,
    compass: Compass,
    collected: u32,
    completing: bool,
    status: LevelStatus,
    looked_at: Option<IVec4>,
    renderer: R,
    hud: H,
}

impl<R: SectionRenderer, H: Hud> Game<R, H> {
    /// Start a session on `level` and show its first section
    ///
    /// Input is held until the first section finished appearing.
    pub fn new(level: Level, registry: ContentRegistry, settings: GameSettings, renderer: R, hud: H) -> Self {
        let projector = Projector::new(settings.projection);
        let transition = LevelTransitionController::new(settings.projection);
        let mut game = Self {
            player: PlayerPositionTracker::new(level.start_position),
            basis: Basis::CANONICAL,
            compass: Compass::from_basis(&Basis::CANONICAL),
            settings,
            registry,
            level,
            projector,
            transition,
            scheduler: Scheduler::new(),
            panel_timer: None,
            collected: 0,
            completing: false,
            status: LevelStatus::Playing,
            looked_at: None,
            renderer,
            hud,
        };
        game.start_level();
        game
    }

    /// Replace the level with another one, starting from scratch
    pub fn load_level(&mut self, level: Level) -> Result<(), GameError> {
        self.ensure_idle("load level")?;
        self.level = level;
        self.player.reset(self.level.start_position);
        self.basis = Basis::CANONICAL;
        self.collected = 0;
        self.completing = false;
        self.status = LevelStatus::Playing;
        self.start_level();
        Ok(())
    }

    fn start_level(&mut self) {
        log::info!(
            "Starting level: {} cells, player at {:?}, {} collectible(s) to finish",
            self.level.grid.len(),
            self.player.position(),
            self.level.collectible_target
        );
        if let Some(bounds) = self.level.grid.bounds() {
            log::info!(
                "Level bounds {} .. {}, world size {}",
                bounds.min,
                bounds.max,
                bounds.world_size()
            );
        }
        self.compass = Compass::from_basis(&self.basis);
        self.hud.update_compass(&self.compass);
        if let Err(e) = self.rebuild_section() {
            log::error!("Could not build the first section: {}", e);
        }
    }

    /// Advance time by `dt` seconds and run everything that became due
    pub fn tick(&mut self, dt: f32) -> LevelStatus {
        // NaN clamps to zero; infinite or out-of-range steps are dropped
        let dt = Duration::try_from_secs_f32(dt.max(0.0)).unwrap_or_else(|_| {
            log::warn!("Ignoring tick of {} seconds", dt);
            Duration::ZERO
        });
        for event in self.scheduler.advance(dt) {
            self.handle_event(event);
        }
        if !self.transition.holds_input() && self.status == LevelStatus::Playing {
            self.check_collectible();
            self.check_question_marks();
        }
        self.status.clone()
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::HidePanel => {
                self.panel_timer = None;
                self.hud.hide_message();
            }
            GameEvent::FinishTransition => {
                if let Err(e) = self.transition.finish(&mut self.renderer) {
                    log::error!("Transition could not finish: {}", e);
                }
            }
            GameEvent::LevelComplete => {
                log::info!("Level complete, next level '{}'", self.level.next_level);
                self.status = LevelStatus::Complete {
                    next_level: self.level.next_level.clone(),
                };
            }
        }
    }

    /// Apply one player command
    ///
    /// Everything is refused while a transition runs. A refused command
    /// leaves the game untouched.
    pub fn handle_command(&mut self, command: GameCommand) -> Result<(), GameError> {
        self.ensure_idle(command.name())?;
        match command {
            GameCommand::Step(step) => {
                self.player.step(step, &self.basis);
                self.sync_player();
            }
            GameCommand::Turn(turn) => {
                let facing = self.player.turn(turn);
                log::debug!("Player now facing {:?}", facing);
            }
            GameCommand::Move(delta) => {
                self.player.move_by(delta, &self.basis);
                self.sync_player();
            }
            GameCommand::Rotate(direction) => self.rotate(direction)?,
            GameCommand::Edit(edit) => self.edit(edit)?,
        }
        Ok(())
    }

    fn ensure_idle(&self, what: &str) -> Result<(), TransitionError> {
        if self.transition.holds_input() {
            let err = TransitionError::InProgress {
                state: self.transition.state(),
            };
            log::warn!("Rejected {}: {}", what, err);
            return Err(err);
        }
        Ok(())
    }

    fn rotate(&mut self, direction: RotationDirection) -> Result<(), GameError> {
        let facing = self.player.facing().direction();
        if let Err(e) = self.basis.rotate_facing(facing, direction) {
            log::error!("Rotation ignored: {}", e);
            return Err(e.into());
        }
        log::debug!("Basis rotated {:?}: {}", direction, self.basis);

        let compass = Compass::from_basis(&self.basis);
        log::debug!("Compass {} ({:?})", compass, self.compass.diff(&compass));
        self.compass = compass;
        self.hud.update_compass(&self.compass);

        self.rebuild_section()?;
        Ok(())
    }

    fn rebuild_section(&mut self) -> Result<(), TransitionError> {
        let id = self.transition.begin()?;
        let facing = self.player.facing().axis();
        let section = self.projector.project(
            id,
            &self.level.grid,
            &self.registry,
            &self.basis,
            self.player.position(),
            facing,
        );
        if let Err(e) = self.transition.commit(section, self.player.position(), facing, &mut self.renderer) {
            self.transition.abort();
            return Err(e);
        }
        self.looked_at = None;
        self.scheduler
            .schedule(self.settings.transition_delay, GameEvent::FinishTransition);
        Ok(())
    }

    fn edit(&mut self, edit: EditCommand) -> Result<(), GameError> {
        if !self.settings.edit_enabled {
            log::warn!("Edit command {:?} ignored: edit mode is disabled", edit);
            return Err(GameError::EditDisabled);
        }
        let position = self.player.rounded();
        match edit {
            EditCommand::Place(content) => {
                if !self.registry.contains(&content) {
                    return Err(GameError::UnknownContent(content));
                }
                log::debug!("Edit: place '{}' at {}", content, position);
                self.level.grid.set(position, Cell::new(content));
            }
            EditCommand::Remove => {
                let removed = self.level.grid.clear(position);
                log::debug!("Edit: remove at {} ({:?})", position, removed.map(|c| c.content));
            }
            EditCommand::VerticalNudge(delta) => {
                self.player.vertical_nudge(delta);
                log::debug!("Edit: nudge by {} to {:?}", delta, self.player.position());
                self.sync_player();
            }
            EditCommand::Refresh => {
                log::debug!("Edit: refresh");
                self.rebuild_section()?;
            }
            EditCommand::SaveLevel => {
                let mut document = self.level.to_document();
                document.start_player_position = self.player.position();
                document.save(&self.settings.save_path)?;
                log::info!(
                    "Saved level ({} cells) to {:?}",
                    self.level.grid.len(),
                    self.settings.save_path
                );
            }
        }
        Ok(())
    }

    /// Keep the renderer's camera on the player's cell
    fn sync_player(&mut self) {
        let position = self.transition.current().player_scene_position(self.player.position());
        self.renderer.place_player(position);
    }

    /// Show `text` on the HUD, replacing any message still on screen
    pub fn show_panel(&mut self, text: &str) {
        let duration = self.settings.panel_duration;
        self.hud.show_message(text, duration.as_secs_f32());
        self.scheduler
            .reschedule(&mut self.panel_timer, duration, GameEvent::HidePanel);
    }

    fn check_collectible(&mut self) {
        let position = self.player.rounded();
        let is_collectible = self
            .level
            .grid
            .get(position)
            .and_then(|cell| self.registry.kind(&cell.content))
            == Some(ContentKind::Collectible);
        if !is_collectible {
            return;
        }
        self.level.grid.clear(position);
        self.transition.remove_current(position, &mut self.renderer);
        self.collected += 1;
        log::info!(
            "Collectible picked up at {} ({}/{})",
            position,
            self.collected,
            self.level.collectible_target
        );
        if self.collected < self.level.collectible_target {
            let remaining = self.level.collectible_target - self.collected;
            self.show_panel(&format!("{} collectible(s) remaining!", remaining));
        }
        self.check_end_level();
    }

    fn check_end_level(&mut self) -> bool {
        if self.completing || self.collected < self.level.collectible_target {
            return false;
        }
        self.completing = true;
        self.show_panel("Level complete!");
        self.scheduler
            .schedule(self.settings.level_complete_delay, GameEvent::LevelComplete);
        true
    }

    fn check_question_marks(&mut self) {
        // Standing on one shows its text once, then hides it
        let position = self.player.rounded();
        if let Some(text) = self.question_text(position) {
            self.show_panel(&text);
            if let Some(key) = self.transition.current_key(position) {
                if let Some(placement) = self.transition.current_mut().get_mut(key) {
                    placement.hidden = true;
                    if let Some(handle) = placement.handle {
                        self.renderer.set_visible(handle, false);
                    }
                }
            }
        }

        let ahead = self.player.cell_ahead(&self.basis);
        let seen = self.question_text(ahead).map(|text| (ahead, text));
        match seen {
            Some((coord, text)) if self.looked_at != Some(coord) => {
                self.looked_at = Some(coord);
                self.show_panel(&text);
            }
            Some(_) => {}
            None => self.looked_at = None,
        }
    }

    /// Info text of a visible question mark at `coord`
    fn question_text(&self, coord: IVec4) -> Option<String> {
        let cell = self.level.grid.get(coord)?;
        if self.registry.kind(&cell.content) != Some(ContentKind::QuestionMark) {
            return None;
        }
        let key = self.transition.current_key(coord)?;
        let placement = self.transition.current().get(key)?;
        if placement.hidden {
            return None;
        }
        cell.info_text.clone()
    }

    #[inline]
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    #[inline]
    pub fn player(&self) -> &PlayerPositionTracker {
        &self.player
    }

    #[inline]
    pub fn player_position(&self) -> Vec4 {
        self.player.position()
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    #[inline]
    pub fn transition(&self) -> &LevelTransitionController {
        &self.transition
    }

    #[inline]
    pub fn holds_input(&self) -> bool {
        self.transition.holds_input()
    }

    #[inline]
    pub fn collected(&self) -> u32 {
        self.collected
    }

    #[inline]
    pub fn status(&self) -> &LevelStatus {
        &self.status
    }

    #[inline]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }
}
