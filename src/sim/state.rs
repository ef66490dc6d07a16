//! Cage state: balls and walls
//!
//! Everything needed to restart a run lives here, including the level the
//! cage was built from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::segment::{Circle, LineSegment, build_segment};
use crate::level::{BallSpec, Level};
use crate::settings::CollisionRules;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Scalar speed, preserved across bounces
    pub speed: f32,
    pub radius: f32,
}

impl Ball {
    pub fn from_spec(id: u32, spec: &BallSpec) -> Self {
        Self {
            id,
            pos: spec.pos,
            vel: spec.velocity(),
            speed: spec.speed,
            radius: spec.radius,
        }
    }

    /// Collision shape at the current position
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Stationary balls are never swept
    pub fn is_moving(&self) -> bool {
        self.speed > 0.0 && self.vel != Vec2::ZERO
    }
}

/// A fixed wall entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    pub segment: LineSegment,
}

impl Wall {
    /// True if a ball moving with `vel` is heading against the wall normal
    #[inline]
    pub fn faces(&self, vel: Vec2) -> bool {
        vel.dot(self.segment.normal) < 0.0
    }
}

/// Complete cage state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cage {
    /// Balls in id order
    pub balls: Vec<Ball>,
    /// Walls in id order; scan order for `ContactOrder::ScanOrder`
    pub walls: Vec<Wall>,
    pub rules: CollisionRules,
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ball-wall contacts resolved since the last restart
    pub contacts: u64,
    level: Level,
}

impl Cage {
    pub fn new(level: Level, rules: CollisionRules) -> Self {
        let mut cage = Self {
            balls: Vec::new(),
            walls: Vec::new(),
            rules,
            paused: false,
            time_ticks: 0,
            contacts: 0,
            level,
        };
        cage.populate();
        cage
    }

    /// Level this cage was built from
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Rebuild balls and walls from the level, keeping the rules
    pub fn restart(&mut self) {
        self.paused = false;
        self.time_ticks = 0;
        self.contacts = 0;
        self.populate();
    }

    fn populate(&mut self) {
        // Ids are assigned in level order, balls first
        let mut ids = 1u32..;

        self.balls = self
            .level
            .balls
            .iter()
            .zip(ids.by_ref())
            .map(|(spec, id)| Ball::from_spec(id, spec))
            .collect();
        self.walls = self
            .level
            .walls
            .iter()
            .zip(ids.by_ref())
            .map(|(spec, id)| Wall {
                id,
                segment: build_segment(spec.p0, spec.p1),
            })
            .collect();

        log::info!(
            "Cage ready: {} balls, {} walls",
            self.balls.len(),
            self.walls.len()
        );
    }

    /// Sum of ball speeds; bounces leave it unchanged
    pub fn total_speed(&self) -> f32 {
        self.balls.iter().map(|b| b.vel.length()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::WallSpec;

    fn small_level() -> Level {
        Level {
            balls: vec![BallSpec {
                pos: Vec2::new(1.0, 2.0),
                direction_deg: 90.0,
                speed: 50.0,
                radius: 4.0,
            }],
            walls: vec![WallSpec {
                p0: Vec2::new(-10.0, 10.0),
                p1: Vec2::new(10.0, 10.0),
            }],
        }
    }

    #[test]
    fn test_cage_from_level() {
        let cage = Cage::new(small_level(), CollisionRules::default());
        assert_eq!(cage.balls.len(), 1);
        assert_eq!(cage.walls.len(), 1);
        assert_eq!(cage.balls[0].id, 1);
        assert_eq!(cage.walls[0].id, 2);
        assert_eq!(cage.level(), &small_level());

        let ball = &cage.balls[0];
        assert!(ball.vel.x.abs() < 1e-4);
        assert!((ball.vel.y - 50.0).abs() < 1e-4);
        assert!(cage.walls[0].faces(ball.vel));
    }

    #[test]
    fn test_restart_restores_level_state() {
        let mut cage = Cage::new(small_level(), CollisionRules::default());
        cage.balls[0].pos = Vec2::new(100.0, 100.0);
        cage.time_ticks = 42;
        cage.contacts = 3;
        cage.paused = true;

        cage.restart();
        assert_eq!(cage.balls[0].pos, Vec2::new(1.0, 2.0));
        assert_eq!(cage.balls[0].id, 1);
        assert_eq!(cage.time_ticks, 0);
        assert_eq!(cage.contacts, 0);
        assert!(!cage.paused);
    }

    #[test]
    fn test_stationary_ball_is_not_moving() {
        let mut spec = BallSpec {
            pos: Vec2::ZERO,
            direction_deg: 30.0,
            speed: 0.0,
            radius: 1.0,
        };
        assert!(!Ball::from_spec(1, &spec).is_moving());

        spec.speed = 5.0;
        let ball = Ball::from_spec(2, &spec);
        assert!(ball.is_moving());
        assert!((ball.vel.length() - 5.0).abs() < 1e-5);
    }
}
