//! Player position tracking
//!
//! The player lives in 4D but only ever moves inside the visible section. Its
//! position is continuous so movement animations can carry fractional values
//! (falling, for instance); every grid lookup goes through [`PlayerPositionTracker::rounded`].

use slice4d_math::{Basis, IVec4, PivotAxis, Vec4};

/// Cardinal direction the player faces, in the section's horizontal plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    #[default]
    PlusForward,
    PlusRight,
    MinusForward,
    MinusRight,
}

/// A 90° turn of the player around the section's up axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Right,
}

/// One grid step relative to the facing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Forward,
    Backward,
    Left,
    Right,
}

impl Facing {
    /// Facing after a quarter turn
    ///
    /// Turning right goes +forward → +right → -forward → -right.
    pub fn turned(self, turn: Turn) -> Self {
        use Facing::*;
        match (self, turn) {
            (PlusForward, Turn::Right) => PlusRight,
            (PlusRight, Turn::Right) => MinusForward,
            (MinusForward, Turn::Right) => MinusRight,
            (MinusRight, Turn::Right) => PlusForward,
            (PlusForward, Turn::Left) => MinusRight,
            (MinusRight, Turn::Left) => MinusForward,
            (MinusForward, Turn::Left) => PlusRight,
            (PlusRight, Turn::Left) => PlusForward,
        }
    }

    /// Unit direction in the section frame, `[right, up, forward]`
    pub fn direction(self) -> [f32; 3] {
        match self {
            Facing::PlusForward => [0.0, 0.0, 1.0],
            Facing::PlusRight => [1.0, 0.0, 0.0],
            Facing::MinusForward => [0.0, 0.0, -1.0],
            Facing::MinusRight => [-1.0, 0.0, 0.0],
        }
    }

    /// Section axis the facing runs along
    pub fn axis(self) -> PivotAxis {
        match self {
            Facing::PlusForward | Facing::MinusForward => PivotAxis::Forward,
            Facing::PlusRight | Facing::MinusRight => PivotAxis::Right,
        }
    }
}

impl Step {
    /// Section-frame delta of one step taken while facing `facing`
    pub fn delta(self, facing: Facing) -> [f32; 3] {
        match self {
            Step::Forward => facing.direction(),
            Step::Backward => facing.direction().map(|c| -c),
            Step::Right => facing.turned(Turn::Right).direction(),
            Step::Left => facing.turned(Turn::Left).direction(),
        }
    }
}

/// Continuous 4D position of the player plus its facing
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerPositionTracker {
    position: Vec4,
    facing: Facing,
}

impl PlayerPositionTracker {
    /// Start at `position`, facing +forward
    pub fn new(position: Vec4) -> Self {
        Self {
            position,
            facing: Facing::default(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec4 {
        self.position
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Integer grid coordinate of the player (ties round to even)
    #[inline]
    pub fn rounded(&self) -> IVec4 {
        IVec4::round_from(self.position)
    }

    /// Move by a section-frame delta, returning the 4D delta applied
    ///
    /// The position is accumulated unrounded. The fixed axis never moves.
    pub fn move_by(&mut self, delta: [f32; 3], basis: &Basis) -> Vec4 {
        let delta4 = basis.section_to_world(delta);
        self.position += delta4;
        log::debug!("Player moved by {:?} to {:?}", delta4, self.position);
        delta4
    }

    /// Take one grid step relative to the current facing
    pub fn step(&mut self, step: Step, basis: &Basis) -> Vec4 {
        self.move_by(step.delta(self.facing), basis)
    }

    /// Shift the grid Y coordinate by whole cells
    pub fn vertical_nudge(&mut self, delta: i32) {
        self.position.y += delta as f32;
    }

    /// Turn a quarter turn in place
    pub fn turn(&mut self, turn: Turn) -> Facing {
        self.facing = self.facing.turned(turn);
        self.facing
    }

    /// Place the player somewhere else entirely (level start)
    pub fn reset(&mut self, position: Vec4) {
        self.position = position;
        self.facing = Facing::default();
    }

    /// Grid coordinate of the cell directly ahead of the player
    pub fn cell_ahead(&self, basis: &Basis) -> IVec4 {
        let ahead = basis.section_to_world(self.facing.direction());
        IVec4::round_from(self.position + ahead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slice4d_math::RotationDirection;

    #[test]
    fn test_move_through_canonical_basis() {
        let mut player = PlayerPositionTracker::new(Vec4::new(1.0, 1.0, 1.0, 2.0));
        let delta = player.move_by([1.0, 0.0, 0.0], &Basis::CANONICAL);
        assert_eq!(delta, Vec4::X);
        assert_eq!(player.position(), Vec4::new(2.0, 1.0, 1.0, 2.0));
    }

    #[test]
    fn test_move_never_touches_fixed_axis() {
        let mut basis = Basis::CANONICAL;
        basis.rotate(PivotAxis::Right, RotationDirection::Positive);
        // forward is now -W, fixed is Z
        let mut player = PlayerPositionTracker::new(Vec4::new(0.0, 0.0, 3.0, 2.0));
        let delta = player.move_by([0.0, 0.0, 1.0], &basis);
        assert_eq!(delta, Vec4::new(0.0, 0.0, 0.0, -1.0));
        assert_eq!(player.position().z, 3.0);
        assert_eq!(player.position().w, 1.0);
    }

    #[test]
    fn test_fractional_accumulation() {
        let mut player = PlayerPositionTracker::new(Vec4::new(0.0, 2.0, 0.0, 0.0));
        player.move_by([0.0, -0.4, 0.0], &Basis::CANONICAL);
        assert!((player.position().y - 1.6).abs() < 1e-6);
        assert_eq!(player.rounded(), IVec4::new(0, 2, 0, 0));
        player.move_by([0.0, -0.4, 0.0], &Basis::CANONICAL);
        assert_eq!(player.rounded(), IVec4::new(0, 1, 0, 0));
    }

    #[test]
    fn test_rounding_ties_to_even() {
        let player = PlayerPositionTracker::new(Vec4::new(0.5, 1.5, 2.5, -0.5));
        assert_eq!(player.rounded(), IVec4::new(0, 2, 2, 0));
    }

    #[test]
    fn test_vertical_nudge() {
        let mut player = PlayerPositionTracker::new(Vec4::new(1.0, 1.25, 0.0, 0.0));
        player.vertical_nudge(-1);
        assert_eq!(player.position().y, 0.25);
        player.vertical_nudge(2);
        assert_eq!(player.rounded().y, 2);
    }

    #[test]
    fn test_turns() {
        let mut facing = Facing::PlusForward;
        for _ in 0..4 {
            facing = facing.turned(Turn::Right);
        }
        assert_eq!(facing, Facing::PlusForward);
        assert_eq!(Facing::PlusForward.turned(Turn::Right), Facing::PlusRight);
        assert_eq!(Facing::PlusForward.turned(Turn::Left), Facing::MinusRight);
        for f in [Facing::PlusForward, Facing::PlusRight, Facing::MinusForward, Facing::MinusRight] {
            assert_eq!(f.turned(Turn::Left).turned(Turn::Right), f);
        }
    }

    #[test]
    fn test_facing_axis_matches_pivot() {
        for f in [Facing::PlusForward, Facing::PlusRight, Facing::MinusForward, Facing::MinusRight] {
            assert_eq!(PivotAxis::from_facing(f.direction()).unwrap(), f.axis());
        }
    }

    #[test]
    fn test_steps_relative_to_facing() {
        let mut player = PlayerPositionTracker::new(Vec4::ZERO);
        player.turn(Turn::Right);
        assert_eq!(player.facing(), Facing::PlusRight);
        player.step(Step::Forward, &Basis::CANONICAL);
        assert_eq!(player.rounded(), IVec4::new(1, 0, 0, 0));
        player.step(Step::Left, &Basis::CANONICAL);
        assert_eq!(player.rounded(), IVec4::new(1, 0, 1, 0));
        player.step(Step::Backward, &Basis::CANONICAL);
        assert_eq!(player.rounded(), IVec4::new(0, 0, 1, 0));
        player.step(Step::Right, &Basis::CANONICAL);
        assert_eq!(player.rounded(), IVec4::new(0, 0, 0, 0));
    }

    #[test]
    fn test_cell_ahead() {
        let player = PlayerPositionTracker::new(Vec4::new(1.0, 0.0, 1.0, 0.0));
        assert_eq!(player.cell_ahead(&Basis::CANONICAL), IVec4::new(1, 0, 2, 0));
    }
}
