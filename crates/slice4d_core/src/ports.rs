//! Collaborator interfaces
//!
//! The core never touches a rendering library or a UI toolkit directly. It
//! drives them through these traits and only holds the opaque handles they
//! hand back.

use crate::compass::Compass;
use crate::projector::Orientation;

/// Opaque handle to an object instantiated by a [`SectionRenderer`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(u64);

impl RenderHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Identifies one section root in the renderer
///
/// Two sections exist at once during a transition: the one disappearing and
/// the one appearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(u64);

impl SectionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Transition animation played on a section's content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionAnimation {
    Appear,
    Disappear,
}

/// Rendering collaborator
///
/// Positions are local to the section root, in `[right, up, forward]` order.
pub trait SectionRenderer {
    /// Create content under a section root
    fn instantiate(
        &mut self,
        section: SectionId,
        content: &str,
        local_position: [f32; 3],
        orientation: Orientation,
        instant: bool,
    ) -> RenderHandle;

    fn set_visible(&mut self, handle: RenderHandle, visible: bool);

    fn destroy(&mut self, handle: RenderHandle);

    /// Play a transition animation; `instant` skips straight to its end state
    fn animate(&mut self, handle: RenderHandle, animation: SectionAnimation, instant: bool);

    /// Move the player's camera rig to a position in the scene
    fn place_player(&mut self, position: [f32; 3]);

    /// Shift a whole section root
    fn translate_section(&mut self, section: SectionId, delta: [f32; 3]);
}

/// UI collaborator
pub trait Hud {
    /// Show a message panel; the core schedules hiding it itself
    fn show_message(&mut self, text: &str, duration_secs: f32);

    fn hide_message(&mut self);

    /// Called with the new compass after every basis change
    fn update_compass(&mut self, _compass: &Compass) {}
}
