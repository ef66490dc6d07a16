//! Fixed timestep simulation tick
//!
//! Each tick every moving ball is advanced by `vel * dt`. The straight sweep
//! is tested against walls the ball is heading into, and each contact bends
//! the rest of the sweep by reflection.

use glam::Vec2;

use super::collision::{HitRecord, reflect, reflect_velocity, sweep};
use super::segment::Circle;
use super::state::{Ball, Cage, Wall};
use crate::settings::{CollisionRules, ContactOrder};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Rebuild the cage from its level
    pub restart: bool,
}

/// Advance the cage by one fixed timestep
pub fn tick(cage: &mut Cage, input: &TickInput, dt: f32) {
    if input.restart {
        cage.restart();
        log::info!("Cage restarted");
        return;
    }

    if input.pause {
        cage.paused = !cage.paused;
        log::info!("{}", if cage.paused { "Paused" } else { "Resumed" });
    }
    if cage.paused {
        return;
    }

    cage.time_ticks += 1;

    let rules = cage.rules;
    let mut contacts = 0;
    for ball in &mut cage.balls {
        if !ball.is_moving() {
            continue;
        }

        let end = ball.pos + ball.vel * dt;
        let end = match rules.contact_order {
            ContactOrder::Earliest => resolve_earliest(ball, end, &cage.walls, &rules, &mut contacts),
            ContactOrder::ScanOrder => resolve_scan_order(ball, end, &cage.walls, &rules, &mut contacts),
        };
        ball.pos = end;
    }
    cage.contacts += contacts;
}

/// Bounce off the first wall touched, then keep sweeping the remainder
fn resolve_earliest(
    ball: &mut Ball,
    mut end: Vec2,
    walls: &[Wall],
    rules: &CollisionRules,
    contacts: &mut u64,
) -> Vec2 {
    let mut start = ball.pos;
    let mut last_wall = None;

    for _ in 0..rules.max_contacts_per_tick {
        if end == start {
            break;
        }

        let circle = Circle::new(start, ball.radius);
        let earliest = walls
            .iter()
            .enumerate()
            .filter(|(i, wall)| last_wall != Some(*i) && wall.faces(ball.vel))
            .filter_map(|(i, wall)| {
                sweep(&circle, end, &wall.segment, rules.check_edges).map(|hit| (i, hit))
            })
            .min_by(|(_, a), (_, b)| a.time.total_cmp(&b.time));

        let Some((index, hit)) = earliest else {
            break;
        };

        log::debug!(
            "Ball {} hit wall {} at t={:.4} {}",
            ball.id,
            walls[index].id,
            hit.time,
            hit.point
        );
        end = bounce(ball, &hit, end);
        start = hit.point;
        last_wall = Some(index);
        *contacts += 1;
    }

    end
}

/// Scan walls in order from the original start; every hit redirects the end
/// point, so the last wall hit decides the outcome
fn resolve_scan_order(
    ball: &mut Ball,
    mut end: Vec2,
    walls: &[Wall],
    rules: &CollisionRules,
    contacts: &mut u64,
) -> Vec2 {
    let circle = ball.circle();

    for wall in walls {
        if !wall.faces(ball.vel) || end == circle.center {
            continue;
        }
        if let Some(hit) = sweep(&circle, end, &wall.segment, rules.check_edges) {
            log::debug!(
                "Ball {} hit wall {} at t={:.4} {}",
                ball.id,
                wall.id,
                hit.time,
                hit.point
            );
            end = bounce(ball, &hit, end);
            *contacts += 1;
        }
    }

    end
}

/// Reflect the ball at a contact; returns the corrected end point
fn bounce(ball: &mut Ball, hit: &HitRecord, end: Vec2) -> Vec2 {
    let reflection = reflect(hit.point, hit.normal, end);

    // Contact exactly at the end of the sweep leaves nothing to mirror
    let direction = if reflection.direction == Vec2::ZERO {
        reflect_velocity(ball.vel, hit.normal).normalize_or_zero()
    } else {
        reflection.direction
    };

    ball.vel = direction * ball.speed;
    reflection.end
}
