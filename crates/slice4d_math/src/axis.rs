//! Canonical 4D axes

use serde::{Serialize, Deserialize};

use crate::IVec4;

/// One of the four canonical axes of the 4D grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    /// All four axes in canonical order
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::W];

    /// Position of this axis in `[x, y, z, w]` order
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }

    /// Positive unit vector along this axis
    #[inline]
    pub const fn unit(self) -> IVec4 {
        match self {
            Axis::X => IVec4::X,
            Axis::Y => IVec4::Y,
            Axis::Z => IVec4::Z,
            Axis::W => IVec4::W,
        }
    }

    /// Lowercase label ("x", "y", "z", "w")
    pub const fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::W => "w",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
