//! Game simulation system
//!
//! Turns a span of game time into fixed game ticks:
//! - The span is converted to a whole tick budget once, up front
//! - The budget is capped
//! - Each tick runs `Game::tick` with the fixed step

use slice4d_core::{Game, Hud, LevelStatus, SectionRenderer};

/// Largest tick budget a single run accepts; anything beyond is dropped
pub const MAX_RUN_TICKS: u32 = 1_000_000;

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Number of fixed ticks actually run
    pub ticks: u32,
    /// Level status after the last tick
    pub status: LevelStatus,
}

/// Fixed-tick driver for a [`Game`]
pub struct SimulationSystem {
    tick_secs: f32,
}

impl SimulationSystem {
    /// Create a simulation running `tick_rate` ticks per second
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_secs: 1.0 / tick_rate.max(1) as f32,
        }
    }

    /// Length of one tick in seconds
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        self.tick_secs
    }

    /// Whole ticks covering `secs` of game time
    ///
    /// Rounds to the nearest tick. Negative, NaN and infinite spans give no
    /// ticks; huge spans are capped at [`MAX_RUN_TICKS`].
    pub fn ticks_for(&self, secs: f32) -> u32 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        let ticks = (f64::from(secs) / f64::from(self.tick_secs)).round();
        if ticks >= f64::from(MAX_RUN_TICKS) {
            log::warn!("Capping a {}s run at {} ticks", secs, MAX_RUN_TICKS);
            MAX_RUN_TICKS
        } else {
            ticks as u32
        }
    }

    /// Run up to `ticks` fixed ticks against `game`
    ///
    /// Stops early on the tick that leaves the level playing state so the
    /// caller can load the next level before more time passes.
    pub fn run_ticks<R: SectionRenderer, H: Hud>(
        &self,
        game: &mut Game<R, H>,
        ticks: u32,
    ) -> SimulationResult {
        let mut result = SimulationResult {
            ticks: 0,
            status: game.status().clone(),
        };
        while result.ticks < ticks {
            result.status = game.tick(self.tick_secs);
            result.ticks += 1;
            if result.status != LevelStatus::Playing {
                break;
            }
        }
        result
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_round_to_nearest() {
        let sim = SimulationSystem::new(20);
        assert_eq!(sim.ticks_for(2.5), 50);
        assert_eq!(sim.ticks_for(0.06), 1);
        assert_eq!(sim.ticks_for(0.01), 0);
        let sim = SimulationSystem::new(60);
        assert_eq!(sim.ticks_for(0.1), 6);
    }

    #[test]
    fn test_invalid_spans_give_no_ticks() {
        let sim = SimulationSystem::new(10);
        assert_eq!(sim.ticks_for(-1.0), 0);
        assert_eq!(sim.ticks_for(f32::NAN), 0);
        assert_eq!(sim.ticks_for(f32::INFINITY), 0);
        assert_eq!(sim.ticks_for(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn test_huge_span_capped() {
        let sim = SimulationSystem::new(60);
        assert_eq!(sim.ticks_for(1e9), MAX_RUN_TICKS);
        assert_eq!(sim.ticks_for(f32::MAX), MAX_RUN_TICKS);
    }

    #[test]
    fn test_default_construction() {
        let sim = SimulationSystem::default();
        assert!((sim.tick_secs() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_tick_rate_clamped() {
        let sim = SimulationSystem::new(0);
        assert_eq!(sim.tick_secs(), 1.0);
    }
}
