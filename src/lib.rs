//! slice4d - walk a 4D cell grid one 3D section at a time
//!
//! The game itself lives in `slice4d_core`; this crate adds what a runnable
//! program needs around it: configuration, the fixed-tick driver and a
//! headless session.

pub mod config;
pub mod session;
pub mod systems;
