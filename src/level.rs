//! Level data: initial balls and cage walls
//!
//! Text format, whitespace separated:
//!
//! ```text
//! <ball count>
//! posX: <x> posY: <y> dir: <degrees> speed: <speed> radius: <radius>
//! <wall count>
//! P0x: <x> P0y: <y> P1x: <x> P1y: <y>
//! ```
//!
//! Labels are optional. A token that is not a number is taken as a label and
//! the value follows it.

use std::f32::consts::TAU;
use std::io;
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::polar_to_cartesian;

/// Upper bound on balls or walls in one level
pub const MAX_LEVEL_OBJECTS: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Cannot read level file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unexpected end of level data, expected {0}")]
    UnexpectedEnd(&'static str),
    #[error("Invalid number {token:?} for {field}")]
    InvalidNumber { field: &'static str, token: String },
    #[error("Invalid {field} count {token:?}")]
    InvalidCount { field: &'static str, token: String },
    #[error("Too many {field}s: {count} (max {max})")]
    TooMany {
        field: &'static str,
        count: usize,
        max: usize,
    },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("Ball {index} has non-positive radius {radius}")]
    NonPositiveRadius { index: usize, radius: f32 },
    #[error("Ball {index} has negative speed {speed}")]
    NegativeSpeed { index: usize, speed: f32 },
    #[error("Wall {index} has coincident endpoints at {point}")]
    DegenerateWall { index: usize, point: Vec2 },
}

/// Initial state of one ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub pos: Vec2,
    /// Direction of travel in degrees, counterclockwise from +x
    pub direction_deg: f32,
    pub speed: f32,
    pub radius: f32,
}

impl BallSpec {
    pub fn velocity(&self) -> Vec2 {
        polar_to_cartesian(self.speed, self.direction_deg.to_radians())
    }
}

/// A wall as two endpoints; their order picks the side balls bounce off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub p0: Vec2,
    pub p1: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub balls: Vec<BallSpec>,
    pub walls: Vec<WallSpec>,
}

/// Cursor over level tokens
struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
        }
    }

    fn token(&mut self, field: &'static str) -> Result<&'a str, LevelError> {
        self.iter.next().ok_or(LevelError::UnexpectedEnd(field))
    }

    fn count(&mut self, field: &'static str) -> Result<usize, LevelError> {
        let token = self.token(field)?;
        let count = token.parse::<usize>().map_err(|_| LevelError::InvalidCount {
            field,
            token: token.to_string(),
        })?;
        if count > MAX_LEVEL_OBJECTS {
            return Err(LevelError::TooMany {
                field,
                count,
                max: MAX_LEVEL_OBJECTS,
            });
        }
        Ok(count)
    }

    /// Next number, skipping one leading label if present
    fn value(&mut self, field: &'static str) -> Result<f32, LevelError> {
        let token = self.token(field)?;
        let value = match token.parse::<f32>() {
            Ok(value) => value,
            Err(_) => {
                let token = self.token(field)?;
                token.parse::<f32>().map_err(|_| LevelError::InvalidNumber {
                    field,
                    token: token.to_string(),
                })?
            }
        };
        if !value.is_finite() {
            return Err(LevelError::NonFinite { field });
        }
        Ok(value)
    }

    fn point(&mut self, x: &'static str, y: &'static str) -> Result<Vec2, LevelError> {
        Ok(Vec2::new(self.value(x)?, self.value(y)?))
    }

    fn remaining(&mut self) -> usize {
        self.iter.by_ref().count()
    }
}

impl Level {
    /// Read and parse a level file
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::parse(&text)?;
        log::info!(
            "Loaded level {}: {} balls, {} walls",
            path.display(),
            level.balls.len(),
            level.walls.len()
        );
        Ok(level)
    }

    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut tokens = Tokens::new(text);

        let ball_count = tokens.count("ball")?;
        let mut balls = Vec::with_capacity(ball_count);
        for index in 0..ball_count {
            let pos = tokens.point("ball x", "ball y")?;
            let direction_deg = tokens.value("ball direction")?;
            let speed = tokens.value("ball speed")?;
            let radius = tokens.value("ball radius")?;

            if radius <= 0.0 {
                return Err(LevelError::NonPositiveRadius { index, radius });
            }
            if speed < 0.0 {
                return Err(LevelError::NegativeSpeed { index, speed });
            }
            balls.push(BallSpec {
                pos,
                direction_deg,
                speed,
                radius,
            });
        }

        let wall_count = tokens.count("wall")?;
        let mut walls = Vec::with_capacity(wall_count);
        for index in 0..wall_count {
            let p0 = tokens.point("wall P0 x", "wall P0 y")?;
            let p1 = tokens.point("wall P1 x", "wall P1 y")?;
            if p0 == p1 {
                return Err(LevelError::DegenerateWall { index, point: p0 });
            }
            walls.push(WallSpec { p0, p1 });
        }

        let trailing = tokens.remaining();
        if trailing > 0 {
            log::warn!("Ignoring {} trailing tokens in level data", trailing);
        }

        Ok(Self { balls, walls })
    }

    /// Rectangular cage with a diamond pillar in the middle and seeded balls
    /// spread around a ring between the two.
    pub fn demo(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let (w, h, p) = (CAGE_HALF_WIDTH, CAGE_HALF_HEIGHT, PILLAR_HALF_SIZE);
        let outer = [
            Vec2::new(-w, -h),
            Vec2::new(-w, h),
            Vec2::new(w, h),
            Vec2::new(w, -h),
        ];
        let pillar = [
            Vec2::new(p, 0.0),
            Vec2::new(0.0, p),
            Vec2::new(-p, 0.0),
            Vec2::new(0.0, -p),
        ];

        // Clockwise outer walls face inward, counterclockwise pillar walls face outward
        let walls = [outer, pillar]
            .iter()
            .flat_map(|loop_points| {
                (0..loop_points.len()).map(move |i| WallSpec {
                    p0: loop_points[i],
                    p1: loop_points[(i + 1) % loop_points.len()],
                })
            })
            .collect();

        let balls = (0..DEMO_BALL_COUNT)
            .map(|i| {
                let slot = i as f32 * TAU / DEMO_BALL_COUNT as f32;
                let theta = slot + rng.random_range(-0.2..0.2);
                BallSpec {
                    pos: polar_to_cartesian(DEMO_SPAWN_RADIUS, theta),
                    direction_deg: rng.random_range(0.0..360.0),
                    speed: rng.random_range(BALL_MIN_SPEED..BALL_MAX_SPEED),
                    radius: rng.random_range(BALL_MIN_RADIUS..BALL_MAX_RADIUS),
                }
            })
            .collect();

        Self { balls, walls }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::segment::build_segment;

    const SAMPLE: &str = "2
        posX: 0 posY: 0 dir: 45 speed: 100 radius: 10
        posX: -50.5 posY: 20 dir: 180 speed: 0 radius: 5
        2
        P0x: -100 P0y: -100 P1x: 100 P1y: -100
        P0x: 100 P0y: 100 P1x: -100 P1y: 100";

    #[test]
    fn test_parse_labelled() {
        let level = Level::parse(SAMPLE).unwrap();
        assert_eq!(level.balls.len(), 2);
        assert_eq!(level.walls.len(), 2);

        let ball = &level.balls[1];
        assert_eq!(ball.pos, Vec2::new(-50.5, 20.0));
        assert_eq!(ball.speed, 0.0);
        assert_eq!(ball.radius, 5.0);

        let vel = level.balls[0].velocity();
        assert!((vel.x - 70.710_68).abs() < 1e-3);
        assert!((vel.y - 70.710_68).abs() < 1e-3);

        assert_eq!(level.walls[1].p0, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_parse_unlabelled_and_mixed() {
        let level = Level::parse("1 1 2 90 10 3\n1 x: 0 0 5 y1: 0").unwrap();
        assert_eq!(level.balls[0].pos, Vec2::new(1.0, 2.0));
        assert_eq!(level.balls[0].direction_deg, 90.0);
        assert_eq!(level.walls[0].p1, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_parse_empty_level() {
        let level = Level::parse("0 0").unwrap();
        assert_eq!(level, Level::default());
    }

    #[test]
    fn test_truncated_input() {
        let err = Level::parse("1 posX: 0 posY: 0 dir: 45").unwrap_err();
        assert!(matches!(err, LevelError::UnexpectedEnd("ball speed")));

        let err = Level::parse("0").unwrap_err();
        assert!(matches!(err, LevelError::UnexpectedEnd("wall")));
    }

    #[test]
    fn test_invalid_tokens() {
        let err = Level::parse("two").unwrap_err();
        assert!(matches!(err, LevelError::InvalidCount { field: "ball", .. }));

        let err = Level::parse("1 posX: abc posY: 0 dir: 0 speed: 1 radius: 1 0").unwrap_err();
        assert!(matches!(err, LevelError::InvalidNumber { field: "ball x", .. }));

        let err = Level::parse("1 posX: inf posY: 0 dir: 0 speed: 1 radius: 1 0").unwrap_err();
        assert!(matches!(err, LevelError::NonFinite { field: "ball x" }));

        let err = Level::parse("99999 ").unwrap_err();
        assert!(matches!(err, LevelError::TooMany { count: 99999, .. }));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Level::parse("1 0 0 0 10 0 0").unwrap_err();
        assert!(matches!(err, LevelError::NonPositiveRadius { index: 0, .. }));

        let err = Level::parse("1 0 0 0 -10 1 0").unwrap_err();
        assert!(matches!(err, LevelError::NegativeSpeed { index: 0, .. }));

        let err = Level::parse("0 2 0 0 1 0 3 3 3 3").unwrap_err();
        assert!(matches!(err, LevelError::DegenerateWall { index: 1, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Level::load(Path::new("/nonexistent/cage/level.txt")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
        assert!(err.to_string().contains("level.txt"));
    }

    #[test]
    fn test_sample_level_parses() {
        let level = Level::parse(include_str!("../levels/cage.txt")).unwrap();
        assert_eq!(level.balls.len(), 4);
        assert_eq!(level.walls.len(), 9);
        assert_eq!(level.balls[3].speed, 300.0);
    }

    #[test]
    fn test_demo_is_deterministic() {
        assert_eq!(Level::demo(7), Level::demo(7));
        assert_ne!(Level::demo(7).balls, Level::demo(8).balls);
    }

    #[test]
    fn test_demo_walls_face_balls() {
        let level = Level::demo(42);
        assert_eq!(level.walls.len(), 8);
        assert_eq!(level.balls.len(), DEMO_BALL_COUNT);

        for ball in &level.balls {
            // Inside the outer box, clear of every side
            for wall in &level.walls[..4] {
                let seg = build_segment(wall.p0, wall.p1);
                assert!(seg.signed_distance(ball.pos) > ball.radius);
            }

            // Clear of the pillar, and on the facing side of its nearest wall
            let nearest = level.walls[4..]
                .iter()
                .map(|wall| {
                    let edge = wall.p1 - wall.p0;
                    let along = ((ball.pos - wall.p0).dot(edge) / edge.length_squared()).clamp(0.0, 1.0);
                    (wall, (ball.pos - (wall.p0 + edge * along)).length())
                })
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .unwrap();
            assert!(nearest.1 > ball.radius);
            let seg = build_segment(nearest.0.p0, nearest.0.p1);
            assert!(seg.signed_distance(ball.pos) > 0.0);
        }
    }
}
