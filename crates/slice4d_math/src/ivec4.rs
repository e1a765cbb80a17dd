//! Integer 4D coordinate

use serde::{Serialize, Deserialize};

use crate::{Axis, Vec4};

/// Integer 4D coordinate identifying a grid cell
///
/// Also used for basis vectors, whose components are exactly 0 or ±1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IVec4 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
}

impl IVec4 {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0, w: 0 };
    pub const X: Self = Self { x: 1, y: 0, z: 0, w: 0 };
    pub const Y: Self = Self { x: 0, y: 1, z: 0, w: 0 };
    pub const Z: Self = Self { x: 0, y: 0, z: 1, w: 0 };
    pub const W: Self = Self { x: 0, y: 0, z: 0, w: 1 };

    /// Create a new IVec4
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32, w: i32) -> Self {
        Self { x, y, z, w }
    }

    /// Round a continuous position to the nearest cell (ties to even)
    #[inline]
    pub fn round_from(v: Vec4) -> Self {
        Self::new(
            v.x.round_ties_even() as i32,
            v.y.round_ties_even() as i32,
            v.z.round_ties_even() as i32,
            v.w.round_ties_even() as i32,
        )
    }

    /// Component along a canonical axis
    #[inline]
    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::W => self.w,
        }
    }

    /// Replace the component along a canonical axis
    #[inline]
    pub fn set(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::W => self.w = value,
        }
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Sum of absolute component values (1 for a signed unit axis vector)
    #[inline]
    pub fn abs_sum(self) -> i32 {
        self.x.abs() + self.y.abs() + self.z.abs() + self.w.abs()
    }

    /// True if any component is negative
    #[inline]
    pub fn has_negative_component(self) -> bool {
        self.x < 0 || self.y < 0 || self.z < 0 || self.w < 0
    }

    /// The single canonical axis this vector lies on, if it is a signed unit vector
    pub fn unit_axis(self) -> Option<Axis> {
        if self.abs_sum() != 1 {
            return None;
        }
        Axis::ALL.into_iter().find(|&axis| self.get(axis) != 0)
    }

    /// Component-wise minimum
    #[inline]
    pub fn min_components(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
            self.w.min(other.w),
        )
    }

    /// Component-wise maximum
    #[inline]
    pub fn max_components(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
            self.w.max(other.w),
        )
    }

    /// Convert to a continuous vector
    #[inline]
    pub fn as_vec4(self) -> Vec4 {
        Vec4::from(self)
    }
}

impl std::fmt::Display for IVec4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl std::ops::Add for IVec4 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl std::ops::AddAssign for IVec4 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::ops::Sub for IVec4 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl std::ops::SubAssign for IVec4 {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl std::ops::Mul<i32> for IVec4 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: i32) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }
}

impl std::ops::Neg for IVec4 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
