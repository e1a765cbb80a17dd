//! Axis-aligned 4D basis
//!
//! A [`Basis`] selects which 3D hyperplane of the 4D grid is visible. Its four
//! vectors map the section frame onto the grid:
//!
//! - `right` - the section's X direction
//! - `up` - the section's Y direction
//! - `forward` - the section's Z direction
//! - `fixed` - the hidden direction, orthogonal to the visible slice
//!
//! Every vector is a signed canonical unit vector, and the four together cover
//! X, Y, Z and W exactly once. The only way to change a basis is a 90° rotation
//! in the (forward|right, fixed) plane, pivoting on the horizontal axis the
//! player is facing along.

use crate::{Axis, IVec4, Vec4};

/// Horizontal section axis the player faces along, which stays put during a rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PivotAxis {
    /// Facing along `right`: `forward` and `fixed` are exchanged
    Right,
    /// Facing along `forward`: `right` and `fixed` are exchanged
    Forward,
}

impl PivotAxis {
    /// Pick the pivot from a facing direction expressed in the section frame
    ///
    /// `facing` is `[right, up, forward]`. A facing whose right component rounds
    /// to ±1 pivots on `right`; otherwise one whose forward component rounds to
    /// ±1 pivots on `forward`. Anything else is not a cardinal horizontal facing.
    pub fn from_facing(facing: [f32; 3]) -> Result<Self, BasisError> {
        let is_unit = |c: f32| (c.round_ties_even() as i32).abs() == 1;
        if is_unit(facing[0]) {
            Ok(PivotAxis::Right)
        } else if is_unit(facing[2]) {
            Ok(PivotAxis::Forward)
        } else {
            Err(BasisError::InvalidFacing { facing })
        }
    }
}

/// Sign of a 90° hyperplane rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    /// +90°
    Positive,
    /// -90°
    Negative,
}

/// Error produced by basis operations
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BasisError {
    /// The facing direction is aligned with neither `right` nor `forward`
    InvalidFacing {
        /// The rejected facing, `[right, up, forward]`
        facing: [f32; 3],
    },
}

impl std::fmt::Display for BasisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasisError::InvalidFacing { facing } => write!(
                f,
                "Facing ({}, {}, {}) is not aligned with the right or forward axis",
                facing[0], facing[1], facing[2]
            ),
        }
    }
}

impl std::error::Error for BasisError {}

/// The four axis vectors defining the visible 3D slice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Basis {
    right: IVec4,
    up: IVec4,
    forward: IVec4,
    fixed: IVec4,
}

impl Default for Basis {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl Basis {
    /// right = X, up = Y, forward = Z, fixed = W
    pub const CANONICAL: Self = Self {
        right: IVec4::X,
        up: IVec4::Y,
        forward: IVec4::Z,
        fixed: IVec4::W,
    };

    /// Build a basis from explicit vectors
    ///
    /// Returns `None` unless the vectors form a signed permutation of the
    /// canonical axes.
    pub fn from_axes(right: IVec4, up: IVec4, forward: IVec4, fixed: IVec4) -> Option<Self> {
        let basis = Self { right, up, forward, fixed };
        basis.is_valid().then_some(basis)
    }

    /// `(right, up, forward, fixed)`
    #[inline]
    pub fn axes(&self) -> (IVec4, IVec4, IVec4, IVec4) {
        (self.right, self.up, self.forward, self.fixed)
    }

    #[inline]
    pub fn right(&self) -> IVec4 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> IVec4 {
        self.up
    }

    #[inline]
    pub fn forward(&self) -> IVec4 {
        self.forward
    }

    #[inline]
    pub fn fixed(&self) -> IVec4 {
        self.fixed
    }

    /// Check the signed-permutation invariant
    ///
    /// Each vector must be a signed unit vector and every canonical axis must
    /// be occupied by exactly one of them.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; 4];
        for v in [self.right, self.up, self.forward, self.fixed] {
            match v.unit_axis() {
                Some(axis) if !seen[axis.index()] => seen[axis.index()] = true,
                _ => return false,
            }
        }
        true
    }

    /// Rotate 90° in the plane of `fixed` and the non-pivot horizontal axis
    ///
    /// `up` never changes, and neither does the pivot axis.
    ///
    /// | pivot | direction | effect |
    /// |---|---|---|
    /// | right | + | forward ← −fixed, fixed ← old forward |
    /// | right | − | fixed ← −forward, forward ← old fixed |
    /// | forward | + | right ← −fixed, fixed ← old right |
    /// | forward | − | fixed ← −right, right ← old fixed |
    pub fn rotate(&mut self, pivot: PivotAxis, direction: RotationDirection) {
        let swapped = match pivot {
            PivotAxis::Right => &mut self.forward,
            PivotAxis::Forward => &mut self.right,
        };
        let old = *swapped;
        match direction {
            RotationDirection::Positive => {
                *swapped = -self.fixed;
                self.fixed = old;
            }
            RotationDirection::Negative => {
                *swapped = self.fixed;
                self.fixed = -old;
            }
        }
        debug_assert!(self.is_valid());
    }

    /// Rotate around whichever horizontal axis `facing` is aligned with
    ///
    /// On [`BasisError::InvalidFacing`] the basis is left unchanged.
    pub fn rotate_facing(
        &mut self,
        facing: [f32; 3],
        direction: RotationDirection,
    ) -> Result<PivotAxis, BasisError> {
        let pivot = PivotAxis::from_facing(facing)?;
        self.rotate(pivot, direction);
        Ok(pivot)
    }

    /// Map a delta in the section frame (`[right, up, forward]`) into 4D
    ///
    /// The fixed axis never receives any of it.
    #[inline]
    pub fn section_to_world(&self, delta: [f32; 3]) -> Vec4 {
        self.right.as_vec4() * delta[0]
            + self.up.as_vec4() * delta[1]
            + self.forward.as_vec4() * delta[2]
    }

    /// Direction of a canonical axis as seen in the section frame
    ///
    /// Returns `[right, up, forward]` components; all zeros when `axis` is the
    /// fixed (hidden) axis.
    #[inline]
    pub fn project_axis(&self, axis: Axis) -> [i32; 3] {
        [self.right.get(axis), self.up.get(axis), self.forward.get(axis)]
    }

    /// The canonical axis currently hidden from view
    pub fn hidden_axis(&self) -> Axis {
        // is_valid() guarantees fixed is a unit axis vector
        self.fixed.unit_axis().unwrap_or(Axis::W)
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "right={} up={} forward={} fixed={}",
            self.right, self.up, self.forward, self.fixed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIVOTS: [PivotAxis; 2] = [PivotAxis::Right, PivotAxis::Forward];
    const DIRECTIONS: [RotationDirection; 2] =
        [RotationDirection::Positive, RotationDirection::Negative];

    #[test]
    fn test_canonical_is_valid() {
        assert!(Basis::CANONICAL.is_valid());
        assert_eq!(Basis::default(), Basis::CANONICAL);
    }

    #[test]
    fn test_from_axes_rejects_duplicates() {
        assert!(Basis::from_axes(IVec4::X, IVec4::Y, IVec4::Z, -IVec4::W).is_some());
        assert!(Basis::from_axes(IVec4::X, IVec4::Y, IVec4::Z, -IVec4::X).is_none());
        assert!(Basis::from_axes(IVec4::X, IVec4::Y, IVec4::Z, IVec4::ZERO).is_none());
        assert!(Basis::from_axes(IVec4::X, IVec4::Y, IVec4::Z, IVec4::new(0, 0, 1, 1)).is_none());
    }

    #[test]
    fn test_rotate_right_positive_on_canonical() {
        let mut basis = Basis::CANONICAL;
        basis.rotate(PivotAxis::Right, RotationDirection::Positive);

        assert_eq!(basis.right(), IVec4::X);
        assert_eq!(basis.up(), IVec4::Y);
        assert_eq!(basis.forward(), -IVec4::W);
        assert_eq!(basis.fixed(), IVec4::Z);
    }

    #[test]
    fn test_rotate_table() {
        let start = Basis::CANONICAL;

        let mut b = start;
        b.rotate(PivotAxis::Right, RotationDirection::Negative);
        assert_eq!(b.axes(), (IVec4::X, IVec4::Y, IVec4::W, -IVec4::Z));

        let mut b = start;
        b.rotate(PivotAxis::Forward, RotationDirection::Positive);
        assert_eq!(b.axes(), (-IVec4::W, IVec4::Y, IVec4::Z, IVec4::X));

        let mut b = start;
        b.rotate(PivotAxis::Forward, RotationDirection::Negative);
        assert_eq!(b.axes(), (IVec4::W, IVec4::Y, IVec4::Z, -IVec4::X));
    }

    #[test]
    fn test_rotation_keeps_invariant() {
        // Walk a long sequence of mixed rotations and check after every step
        let mut basis = Basis::CANONICAL;
        for step in 0..64 {
            let pivot = PIVOTS[step % 2];
            let direction = DIRECTIONS[(step / 3) % 2];
            basis.rotate(pivot, direction);
            assert!(basis.is_valid(), "invalid after step {}: {}", step, basis);
        }
    }

    #[test]
    fn test_inverse_law() {
        let mut start = Basis::CANONICAL;
        start.rotate(PivotAxis::Forward, RotationDirection::Positive);
        for pivot in PIVOTS {
            for direction in DIRECTIONS {
                let mut basis = start;
                basis.rotate(pivot, direction);
                assert_ne!(basis, start);
                let back = match direction {
                    RotationDirection::Positive => RotationDirection::Negative,
                    RotationDirection::Negative => RotationDirection::Positive,
                };
                basis.rotate(pivot, back);
                assert_eq!(basis, start);
            }
        }
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for pivot in PIVOTS {
            for direction in DIRECTIONS {
                let mut basis = Basis::CANONICAL;
                for _ in 0..4 {
                    basis.rotate(pivot, direction);
                }
                assert_eq!(basis, Basis::CANONICAL);
            }
        }
    }

    #[test]
    fn test_pivot_from_facing() {
        assert_eq!(PivotAxis::from_facing([1.0, 0.0, 0.0]), Ok(PivotAxis::Right));
        assert_eq!(PivotAxis::from_facing([-0.9999, 0.0, 0.0001]), Ok(PivotAxis::Right));
        assert_eq!(PivotAxis::from_facing([0.0, 0.0, -1.0]), Ok(PivotAxis::Forward));
        assert!(PivotAxis::from_facing([0.0, 1.0, 0.0]).is_err());
        assert!(PivotAxis::from_facing([0.3, 0.0, 0.3]).is_err());
    }

    #[test]
    fn test_rotate_facing_invalid_leaves_basis_unchanged() {
        let mut basis = Basis::CANONICAL;
        let err = basis
            .rotate_facing([0.0, -1.0, 0.0], RotationDirection::Positive)
            .unwrap_err();
        assert!(matches!(err, BasisError::InvalidFacing { .. }));
        assert_eq!(basis, Basis::CANONICAL);
        assert!(format!("{}", err).contains("not aligned"));
    }

    #[test]
    fn test_rotate_facing_picks_pivot() {
        let mut basis = Basis::CANONICAL;
        let pivot = basis
            .rotate_facing([0.0, 0.0, 1.0], RotationDirection::Negative)
            .unwrap();
        assert_eq!(pivot, PivotAxis::Forward);
        assert_eq!(basis.right(), IVec4::W);
        assert_eq!(basis.forward(), IVec4::Z);
    }

    #[test]
    fn test_section_to_world() {
        let mut basis = Basis::CANONICAL;
        basis.rotate(PivotAxis::Right, RotationDirection::Positive);
        // forward is now -W
        let delta = basis.section_to_world([1.0, -0.5, 1.0]);
        assert_eq!(delta, Vec4::new(1.0, -0.5, 0.0, -1.0));
    }

    #[test]
    fn test_project_axis_and_hidden_axis() {
        let mut basis = Basis::CANONICAL;
        basis.rotate(PivotAxis::Forward, RotationDirection::Positive);
        // right = -W, fixed = X
        assert_eq!(basis.hidden_axis(), Axis::X);
        assert_eq!(basis.project_axis(Axis::X), [0, 0, 0]);
        assert_eq!(basis.project_axis(Axis::W), [-1, 0, 0]);
        assert_eq!(basis.project_axis(Axis::Z), [0, 0, 1]);
    }
}
