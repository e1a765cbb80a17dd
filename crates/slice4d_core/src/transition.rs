//! Section transitions
//!
//! A basis change never swaps sections in one go. The controller walks
//! `Idle → Rebuilding → Swapping → Idle`:
//!
//! 1. [`LevelTransitionController::begin`] reserves an id for the next section.
//! 2. The caller projects the grid into that section and hands it to
//!    [`LevelTransitionController::commit`], which instantiates it, re-anchors
//!    the outgoing section around the player and starts both animations.
//! 3. After the transition delay, [`LevelTransitionController::finish`]
//!    destroys the outgoing section and promotes the new one.
//!
//! Input is held for the whole cycle.

use slice4d_math::{IVec4, PivotAxis, Vec4};

use crate::ports::{SectionAnimation, SectionId, SectionRenderer};
use crate::projector::{PlacementKey, ProjectionSettings, RenderSection};

/// Phase of the section swap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionState {
    #[default]
    Idle,
    Rebuilding,
    Swapping,
}

impl std::fmt::Display for TransitionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransitionState::Idle => "idle",
            TransitionState::Rebuilding => "rebuilding",
            TransitionState::Swapping => "swapping",
        };
        f.write_str(name)
    }
}

/// A transition step requested in the wrong state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// Another transition is still running
    InProgress { state: TransitionState },
    /// `commit` or `finish` called out of order
    UnexpectedState {
        expected: TransitionState,
        actual: TransitionState,
    },
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::InProgress { state } => {
                write!(f, "A section transition is already in progress ({})", state)
            }
            TransitionError::UnexpectedState { expected, actual } => write!(
                f,
                "Transition step expected state {} but was {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Owns the visible section and the one replacing it
#[derive(Debug)]
pub struct LevelTransitionController {
    state: TransitionState,
    current: RenderSection,
    next: Option<RenderSection>,
    next_id: u64,
}

impl LevelTransitionController {
    /// Start idle with an empty current section
    pub fn new(settings: ProjectionSettings) -> Self {
        Self {
            state: TransitionState::Idle,
            current: RenderSection::empty(SectionId::new(0), Default::default(), settings),
            next: None,
            next_id: 1,
        }
    }

    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether player input must be ignored
    #[inline]
    pub fn holds_input(&self) -> bool {
        self.state != TransitionState::Idle
    }

    /// The section the player is standing in
    #[inline]
    pub fn current(&self) -> &RenderSection {
        &self.current
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut RenderSection {
        &mut self.current
    }

    /// The section appearing, while swapping
    #[inline]
    pub fn next(&self) -> Option<&RenderSection> {
        self.next.as_ref()
    }

    /// Idle → Rebuilding, reserving the id of the section to build
    pub fn begin(&mut self) -> Result<SectionId, TransitionError> {
        if self.state != TransitionState::Idle {
            return Err(TransitionError::InProgress { state: self.state });
        }
        let id = SectionId::new(self.next_id);
        self.next_id += 1;
        self.state = TransitionState::Rebuilding;
        log::debug!("Transition: rebuilding section {:?}", id);
        Ok(id)
    }

    /// Rebuilding → Swapping
    ///
    /// Instantiates `section`, keeps the player visually in place by moving
    /// the outgoing section, and starts the disappear/appear animations. The
    /// outgoing section's instant flags are reclassified against the player.
    pub fn commit<R: SectionRenderer + ?Sized>(
        &mut self,
        mut section: RenderSection,
        player_position: Vec4,
        facing: PivotAxis,
        renderer: &mut R,
    ) -> Result<(), TransitionError> {
        self.expect_state(TransitionState::Rebuilding)?;

        let id = section.id();
        for (_, placement) in section.iter_mut() {
            let handle = renderer.instantiate(
                id,
                &placement.content,
                placement.local_position,
                placement.orientation,
                placement.instant,
            );
            placement.handle = Some(handle);
        }

        match section.player_position() {
            Some(target) => {
                let before = self.current.player_scene_position(player_position);
                let delta = [target[0] - before[0], target[1] - before[1], target[2] - before[2]];
                if delta != [0.0; 3] {
                    renderer.translate_section(self.current.id(), delta);
                    self.current.translate(delta);
                }
                renderer.place_player(target);
            }
            None => log::warn!(
                "Player at {:?} is outside section {:?}, leaving the camera in place",
                player_position,
                id
            ),
        }

        let player = IVec4::round_from(player_position);
        self.current.classify_instant(player, facing);
        for (_, placement) in self.current.iter() {
            if let Some(handle) = placement.handle {
                renderer.animate(handle, SectionAnimation::Disappear, placement.instant);
            }
        }
        for (_, placement) in section.iter() {
            if let Some(handle) = placement.handle {
                renderer.animate(handle, SectionAnimation::Appear, placement.instant);
            }
        }

        log::debug!(
            "Transition: swapping section {:?} ({} placements) for {:?} ({} placements)",
            self.current.id(),
            self.current.len(),
            id,
            section.len()
        );
        self.next = Some(section);
        self.state = TransitionState::Swapping;
        Ok(())
    }

    /// Swapping → Idle: discard the outgoing section and promote the new one
    pub fn finish<R: SectionRenderer + ?Sized>(&mut self, renderer: &mut R) -> Result<(), TransitionError> {
        self.expect_state(TransitionState::Swapping)?;
        let Some(next) = self.next.take() else {
            return Err(TransitionError::UnexpectedState {
                expected: TransitionState::Swapping,
                actual: self.state,
            });
        };
        let mut old = std::mem::replace(&mut self.current, next);
        for placement in old.drain() {
            if let Some(handle) = placement.handle {
                renderer.destroy(handle);
            }
        }
        self.state = TransitionState::Idle;
        log::debug!("Transition: section {:?} is now current", self.current.id());
        Ok(())
    }

    /// Abandon a rebuild that never reached `commit`
    pub fn abort(&mut self) {
        if self.state == TransitionState::Rebuilding {
            self.state = TransitionState::Idle;
        }
    }

    /// Destroy the placement cut from `coord` in the current section
    pub fn remove_current<R: SectionRenderer + ?Sized>(
        &mut self,
        coord: IVec4,
        renderer: &mut R,
    ) -> bool {
        match self.current.remove_at(coord) {
            Some(placement) => {
                if let Some(handle) = placement.handle {
                    renderer.destroy(handle);
                }
                true
            }
            None => false,
        }
    }

    /// Key of the current section's placement at `coord`
    pub fn current_key(&self, coord: IVec4) -> Option<PlacementKey> {
        self.current.key_at(coord)
    }

    fn expect_state(&self, expected: TransitionState) -> Result<(), TransitionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(TransitionError::UnexpectedState {
                expected,
                actual: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RenderHandle;
    use crate::projector::{Orientation, Projector};
    use crate::{Cell, ContentRegistry, Grid4D};
    use slice4d_math::{Basis, RotationDirection};

    #[derive(Default)]
    struct CountingRenderer {
        next_handle: u64,
        live: Vec<RenderHandle>,
        appear: usize,
        disappear: usize,
        instant: usize,
        translations: Vec<(SectionId, [f32; 3])>,
        player: Option<[f32; 3]>,
    }

    impl SectionRenderer for CountingRenderer {
        fn instantiate(&mut self, _: SectionId, _: &str, _: [f32; 3], _: Orientation, _: bool) -> RenderHandle {
            self.next_handle += 1;
            let handle = RenderHandle::new(self.next_handle);
            self.live.push(handle);
            handle
        }
        fn set_visible(&mut self, _: RenderHandle, _: bool) {}
        fn destroy(&mut self, handle: RenderHandle) {
            self.live.retain(|h| *h != handle);
        }
        fn animate(&mut self, _: RenderHandle, animation: SectionAnimation, instant: bool) {
            match animation {
                SectionAnimation::Appear => self.appear += 1,
                SectionAnimation::Disappear => self.disappear += 1,
            }
            if instant {
                self.instant += 1;
            }
        }
        fn place_player(&mut self, position: [f32; 3]) {
            self.player = Some(position);
        }
        fn translate_section(&mut self, section: SectionId, delta: [f32; 3]) {
            self.translations.push((section, delta));
        }
    }

    fn grid() -> Grid4D {
        let mut grid = Grid4D::new();
        for x in 0..3 {
            for z in 0..3 {
                grid.set(IVec4::new(x, 0, z, 0), Cell::new("greenCube"));
                grid.set(IVec4::new(x, 0, 0, z), Cell::new("redCube"));
            }
        }
        grid
    }

    fn rebuild(
        controller: &mut LevelTransitionController,
        renderer: &mut CountingRenderer,
        basis: &Basis,
        player: Vec4,
    ) {
        let id = controller.begin().unwrap();
        let section = Projector::default().project(
            id,
            &grid(),
            &ContentRegistry::standard(),
            basis,
            player,
            PivotAxis::Right,
        );
        controller.commit(section, player, PivotAxis::Right, renderer).unwrap();
    }

    #[test]
    fn test_full_cycle() {
        let mut controller = LevelTransitionController::new(ProjectionSettings::default());
        let mut renderer = CountingRenderer::default();
        let player = Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert!(!controller.holds_input());

        rebuild(&mut controller, &mut renderer, &Basis::CANONICAL, player);
        assert_eq!(controller.state(), TransitionState::Swapping);
        assert!(controller.holds_input());
        assert_eq!(renderer.live.len(), 9);
        assert_eq!(renderer.appear, 9);
        assert_eq!(renderer.disappear, 0);
        assert_eq!(renderer.player, Some([0.0, 4.0, 0.0]));

        controller.finish(&mut renderer).unwrap();
        assert_eq!(controller.state(), TransitionState::Idle);
        assert!(!controller.holds_input());
        assert_eq!(controller.current().len(), 9);
        assert!(controller.next().is_none());
    }

    #[test]
    fn test_second_transition_destroys_old_section() {
        let mut controller = LevelTransitionController::new(ProjectionSettings::default());
        let mut renderer = CountingRenderer::default();
        let player = Vec4::new(0.0, 1.0, 0.0, 0.0);
        rebuild(&mut controller, &mut renderer, &Basis::CANONICAL, player);
        controller.finish(&mut renderer).unwrap();
        let first_id = controller.current().id();

        let mut basis = Basis::CANONICAL;
        basis.rotate(PivotAxis::Right, RotationDirection::Positive);
        rebuild(&mut controller, &mut renderer, &basis, player);
        assert_eq!(renderer.disappear, 9);
        assert_eq!(renderer.live.len(), 18);

        controller.finish(&mut renderer).unwrap();
        assert_ne!(controller.current().id(), first_id);
        assert_eq!(renderer.live.len(), 9);
    }

    #[test]
    fn test_outgoing_section_is_reanchored() {
        let mut controller = LevelTransitionController::new(ProjectionSettings::default());
        let mut renderer = CountingRenderer::default();
        // player at z = 1 in the w = 0 plane
        let player = Vec4::new(1.0, 1.0, 1.0, 0.0);
        rebuild(&mut controller, &mut renderer, &Basis::CANONICAL, player);
        controller.finish(&mut renderer).unwrap();
        let old_id = controller.current().id();
        let before = renderer.player.unwrap();

        // facing along right: forward becomes -W, so the player's forward index moves
        let mut basis = Basis::CANONICAL;
        basis.rotate(PivotAxis::Right, RotationDirection::Positive);
        rebuild(&mut controller, &mut renderer, &basis, player);
        let after = renderer.player.unwrap();
        let (section, delta) = renderer.translations.last().copied().unwrap();
        assert_eq!(section, old_id);
        for i in 0..3 {
            assert!((before[i] + delta[i] - after[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_begin_rejected_while_in_progress() {
        let mut controller = LevelTransitionController::new(ProjectionSettings::default());
        let mut renderer = CountingRenderer::default();
        rebuild(&mut controller, &mut renderer, &Basis::CANONICAL, Vec4::ZERO);
        assert_eq!(
            controller.begin(),
            Err(TransitionError::InProgress { state: TransitionState::Swapping })
        );
    }

    #[test]
    fn test_out_of_order_steps() {
        let mut controller = LevelTransitionController::new(ProjectionSettings::default());
        let mut renderer = CountingRenderer::default();
        assert!(matches!(
            controller.finish(&mut renderer),
            Err(TransitionError::UnexpectedState { .. })
        ));

        let id = controller.begin().unwrap();
        controller.abort();
        assert_eq!(controller.state(), TransitionState::Idle);
        let section = RenderSection::empty(id, Basis::CANONICAL, ProjectionSettings::default());
        assert!(controller.commit(section, Vec4::ZERO, PivotAxis::Forward, &mut renderer).is_err());
    }

    #[test]
    fn test_remove_current() {
        let mut controller = LevelTransitionController::new(ProjectionSettings::default());
        let mut renderer = CountingRenderer::default();
        rebuild(&mut controller, &mut renderer, &Basis::CANONICAL, Vec4::ZERO);
        controller.finish(&mut renderer).unwrap();
        let coord = IVec4::new(2, 0, 2, 0);
        assert!(controller.current_key(coord).is_some());
        assert!(controller.remove_current(coord, &mut renderer));
        assert!(!controller.remove_current(coord, &mut renderer));
        assert_eq!(renderer.live.len(), 8);
    }
}
