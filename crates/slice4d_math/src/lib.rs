//! 4D Mathematics Library
//!
//! This crate provides the 4D vector and basis types used by slice4d.
//!
//! ## Core Types
//!
//! - [`Vec4`] - 4D vector with x, y, z, w components (continuous positions)
//! - [`IVec4`] - Integer 4D coordinate (grid cells)
//! - [`Axis`] - One of the four canonical axes
//! - [`Basis`] - The right/up/forward/fixed frame selecting the visible 3D slice

mod vec4;
mod ivec4;
mod axis;
pub mod basis;

pub use vec4::Vec4;
pub use ivec4::IVec4;
pub use axis::Axis;
pub use basis::{Basis, BasisError, PivotAxis, RotationDirection};
