//! Core of slice4d
//!
//! This crate holds the 4D world and everything needed to show a 3D slice of it:
//!
//! - [`Grid4D`] - Sparse map from integer 4D coordinates to [`Cell`]s
//! - [`Level`] / [`LevelDocument`] - Loaded level and its RON form
//! - [`ContentRegistry`] - Content identifiers the renderer can instantiate
//! - [`Projector`] / [`RenderSection`] - Cutting a 3D section out of the grid
//! - [`PlayerPositionTracker`] - The player's continuous 4D position and facing
//! - [`LevelTransitionController`] - Rebuild-then-swap of sections
//! - [`Scheduler`] - Cancellable timed events driven by fixed ticks
//! - [`Compass`] - Which canonical axes are visible, and where they point
//! - [`Game`] - Ties it all together behind `tick` and `handle_command`
//!
//! Rendering and UI are reached only through the [`SectionRenderer`] and
//! [`Hud`] traits.

mod cell;
mod grid;
mod registry;
pub mod level;
pub mod player;
pub mod projector;
pub mod ports;
pub mod scheduler;
pub mod transition;
pub mod compass;
pub mod command;
pub mod game;

pub use cell::Cell;
pub use grid::{Bounds4D, Grid4D};
pub use registry::{ContentDef, ContentKind, ContentRegistry};
pub use level::{CellDocument, LayerDocument, Level, LevelDocument, LevelLoadError, LevelSaveError};
pub use player::{Facing, PlayerPositionTracker, Step, Turn};
pub use projector::{MirrorFlags, Orientation, Placement, PlacementKey, ProjectionSettings, Projector, RenderSection};
pub use ports::{Hud, RenderHandle, SectionAnimation, SectionId, SectionRenderer};
pub use scheduler::{Scheduler, TimerKey};
pub use transition::{LevelTransitionController, TransitionError, TransitionState};
pub use compass::{AxisChange, AxisIndicator, Compass};
pub use command::{EditCommand, GameCommand};
pub use game::{Game, GameError, GameEvent, GameSettings, LevelStatus};

// Re-export the math types the core API is expressed in
pub use slice4d_math::{Axis, Basis, BasisError, IVec4, PivotAxis, RotationDirection, Vec4};
