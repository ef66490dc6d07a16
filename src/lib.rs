//! Cage - balls bouncing inside a closed arrangement of wall segments
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swept collision kernel, cage state, tick driver)
//! - `level`: Level file reader and seeded demo level
//! - `settings`: Collision rules and run configuration

pub mod level;
pub mod settings;
pub mod sim;

pub use level::{Level, LevelError};
pub use settings::{CollisionRules, ContactOrder, Settings};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum wall contacts resolved for one ball in one tick
    pub const MAX_CONTACTS_PER_TICK: u32 = 4;
    /// Ticks between position reports in the headless runner
    pub const REPORT_INTERVAL: u64 = 60;

    /// Demo cage dimensions
    pub const CAGE_HALF_WIDTH: f32 = 300.0;
    pub const CAGE_HALF_HEIGHT: f32 = 200.0;
    /// Half-diagonal of the diamond pillar in the middle of the demo cage
    pub const PILLAR_HALF_SIZE: f32 = 60.0;

    /// Demo ball defaults
    pub const DEMO_BALL_COUNT: usize = 6;
    pub const DEMO_SPAWN_RADIUS: f32 = 140.0;
    pub const BALL_MIN_RADIUS: f32 = 5.0;
    pub const BALL_MAX_RADIUS: f32 = 15.0;
    pub const BALL_MIN_SPEED: f32 = 100.0;
    pub const BALL_MAX_SPEED: f32 = 250.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
    }
}
