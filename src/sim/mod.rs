//! Deterministic simulation module
//!
//! All cage logic lives here. The collision kernel (`segment`, `collision`)
//! is pure: no logging, no allocation, no state between calls.
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)

pub mod collision;
pub mod segment;
pub mod state;
pub mod tick;

pub use collision::{HitRecord, Reflection, endpoint_sweep, reflect, reflect_velocity, sweep};
pub use segment::{Circle, LineSegment, build_segment};
pub use state::{Ball, Cage, Wall};
pub use tick::{TickInput, tick};
