//! Wall and ball geometry
//!
//! A wall is an oriented line segment. Its cached normal is the segment
//! direction rotated -90°, so the endpoint order picks which side of the
//! wall faces the balls:
//! - P0 -> P1 running left to right gives a normal pointing down
//! - swapping the endpoints flips the normal

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rotate a vector by -90° (clockwise in a y-up frame)
#[inline]
pub fn rotate_cw(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// An oriented wall segment with its unit normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    /// Unit normal, derived from `p1 - p0`
    pub normal: Vec2,
}

/// Build a segment from two distinct endpoints.
///
/// Coincident endpoints produce a NaN normal; the level loader rejects them
/// before they get here.
pub fn build_segment(p0: Vec2, p1: Vec2) -> LineSegment {
    LineSegment {
        p0,
        p1,
        normal: rotate_cw(p1 - p0).normalize(),
    }
}

impl LineSegment {
    /// Direction vector `p1 - p0`
    #[inline]
    pub fn edge(&self) -> Vec2 {
        self.p1 - self.p0
    }

    /// Signed distance from a point to the infinite line, positive on the normal side
    #[inline]
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        point.dot(self.normal) - self.p0.dot(self.normal)
    }
}

/// A ball's collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}
