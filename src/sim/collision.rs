//! Swept collision detection and response for a moving ball against a wall
//!
//! The ball's center travels from `circle.center` to `end` during one tick.
//! Contact against the wall interior reduces to the center crossing one of
//! the two offset lines (the wall line pushed out by ±radius along its normal).
//! Contact against an endpoint reduces to the center entering a disk of the
//! ball's radius around that endpoint.

use glam::Vec2;

use super::segment::{Circle, LineSegment, rotate_cw};

/// First contact of a sweep with a wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Fraction of the tick at which contact happens, in [0, 1]
    pub time: f32,
    /// Ball center at contact
    pub point: Vec2,
    /// Unit normal at contact, pointing from the wall toward the ball center
    pub normal: Vec2,
}

/// Sweep a ball from `circle.center` to `end` against a wall.
///
/// A ball starting within its radius of the wall's line can only touch an
/// endpoint first, so that case always runs the endpoint test. Otherwise
/// `check_edges` decides whether a miss of the wall interior falls back to
/// the endpoints.
///
/// The caller is expected to only sweep balls moving against the wall normal.
pub fn sweep(
    circle: &Circle,
    end: Vec2,
    segment: &LineSegment,
    check_edges: bool,
) -> Option<HitRecord> {
    let start = circle.center;
    let radius = circle.radius;
    let normal = segment.normal;
    let velocity = end - start;

    let dist = segment.signed_distance(start);

    // -1 behind the wall, +1 in front of it
    let side = if dist <= -radius {
        -1.0
    } else if dist >= radius {
        1.0
    } else {
        // Already within reach of the infinite line: only an endpoint can be hit first
        return endpoint_sweep(true, circle, end, segment);
    };

    let offset = normal * (radius * side);
    let to_p0 = (segment.p0 + offset) - start;
    let to_p1 = (segment.p1 + offset) - start;
    let m = rotate_cw(velocity).normalize();

    // The sweep ray separates the offset endpoints iff it crosses the offset segment
    if m.dot(to_p0) * m.dot(to_p1) < 0.0 {
        let time = (normal.dot(segment.p0) - normal.dot(start) + radius * side)
            / normal.dot(velocity);
        if (0.0..=1.0).contains(&time) {
            // Starting exactly on the offset line divides out to -0.0
            let time = time + 0.0;
            return Some(HitRecord {
                time,
                point: start + velocity * time,
                normal: normal * side,
            });
        }
    }

    if check_edges {
        endpoint_sweep(false, circle, end, segment)
    } else {
        None
    }
}

/// Sweep a ball against the two endpoints of a wall.
///
/// `within_both_lines` is set when the ball starts closer than its radius to
/// the wall's infinite line; the endpoint is then picked by which end of the
/// wall the ball sits beyond. Otherwise the endpoint closest to the sweep ray
/// wins, and if both are within reach the one nearer along the ray is taken
/// (P0 on ties).
pub fn endpoint_sweep(
    within_both_lines: bool,
    circle: &Circle,
    end: Vec2,
    segment: &LineSegment,
) -> Option<HitRecord> {
    let start = circle.center;
    let radius = circle.radius;
    let to_p0 = segment.p0 - start;
    let to_p1 = segment.p1 - start;
    let velocity = end - start;
    let dir = velocity.normalize();
    let m = rotate_cw(velocity).normalize();

    let (endpoint, along, dist) = if within_both_lines {
        let (endpoint, to_end) = if to_p0.dot(segment.edge()) > 0.0 {
            (segment.p0, to_p0)
        } else {
            (segment.p1, to_p1)
        };

        let along = to_end.dot(dir);
        if along <= 0.0 {
            return None;
        }
        let dist = to_end.dot(m);
        if dist.abs() > radius {
            return None;
        }
        (endpoint, along, dist)
    } else {
        let dist0 = to_p0.dot(m);
        let dist1 = to_p1.dot(m);

        let use_p0 = match (dist0.abs() <= radius, dist1.abs() <= radius) {
            (false, false) => return None,
            // Compared on the raw velocity, not the unit direction
            (true, true) => to_p0.dot(velocity).abs() <= to_p1.dot(velocity).abs(),
            (near_p0, _) => near_p0,
        };

        let (endpoint, to_end, dist) = if use_p0 {
            (segment.p0, to_p0, dist0)
        } else {
            (segment.p1, to_p1, dist1)
        };

        let along = to_end.dot(dir);
        if along < 0.0 {
            return None;
        }
        (endpoint, along, dist)
    };

    // Clamped so last-bit negatives don't turn into NaN
    let chord = (radius * radius - dist * dist).max(0.0).sqrt();
    let time = (along - chord) / velocity.length();
    if time > 1.0 {
        return None;
    }

    // Starting already overlapping the endpoint disk counts as contact at the start
    let time = time.max(0.0);
    let point = start + velocity * time;
    Some(HitRecord {
        time,
        point,
        normal: (point - endpoint).normalize(),
    })
}

/// Result of reflecting the remainder of a sweep off a contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    /// Corrected end of the tick
    pub end: Vec2,
    /// Unit direction of travel after the bounce (zero if contact was at the very end)
    pub direction: Vec2,
}

/// Mirror the part of the sweep past the contact point across the contact normal
///
/// r = p - 2(p·n)n, where p = end - point
pub fn reflect(point: Vec2, normal: Vec2, end: Vec2) -> Reflection {
    let penetration = end - point;
    let reflected = penetration - 2.0 * penetration.dot(normal) * normal;
    Reflection {
        end: point + reflected,
        direction: reflected.normalize_or_zero(),
    }
}

/// Reflect a velocity off a surface with the given unit normal
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
